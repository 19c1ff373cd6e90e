//! Show animation information.

use std::path::PathBuf;

use apngkit_compositor::KEYFRAME_INTERVAL;

use crate::source::load_sequence;

pub fn run(path: PathBuf, json: bool) -> anyhow::Result<()> {
    let sequence =
        load_sequence(&path).map_err(|e| anyhow::anyhow!("Failed to load animation: {e}"))?;
    let summary = sequence.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Animation: {}", path.display());
    println!("  Canvas: {}x{}", summary.width, summary.height);
    println!("  Frames: {}", summary.frame_count);
    println!("  Loop duration: {:.1} ms", summary.total_duration_ms);
    println!(
        "  Keyframe slots: {} (every {KEYFRAME_INTERVAL} frames)",
        summary.frame_count.div_ceil(KEYFRAME_INTERVAL)
    );
    println!();

    println!("Frames:");
    for (index, frame) in summary.frames.iter().enumerate() {
        println!(
            "  {:>4}: {}x{} at ({}, {})  {:>8.1} ms  dispose={:?} blend={:?}",
            index,
            frame.rect.width,
            frame.rect.height,
            frame.rect.left,
            frame.rect.top,
            frame.duration_ms,
            frame.dispose_op,
            frame.blend_op
        );
    }

    Ok(())
}
