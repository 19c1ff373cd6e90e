//! Render a list of frames in order, exercising the seek paths.

use std::path::{Path, PathBuf};

use apngkit_compositor::{CompositorStats, SeekPlan};

use super::{clamp_frame, open_compositor};

pub async fn run(
    path: PathBuf,
    frames: Vec<usize>,
    output_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    if frames.is_empty() {
        anyhow::bail!("No frames requested");
    }
    if let Some(dir) = &output_dir {
        std::fs::create_dir_all(dir)?;
    }

    let mut compositor = open_compositor(&path).await?;
    println!(
        "Scrubbing {} ({} frames)",
        path.display(),
        compositor.frame_count()
    );

    for (step, &requested) in frames.iter().enumerate() {
        let target = clamp_frame(&compositor, requested);
        let plan = compositor.plan(target);
        compositor.render_frame(target);

        match &output_dir {
            Some(dir) => {
                let file = frame_file(dir, step, target);
                compositor.surface().save(&file)?;
                println!("  {:>4}: {} -> {}", target, describe(plan), file.display());
            }
            None => println!("  {:>4}: {}", target, describe(plan)),
        }
    }

    println!();
    print_stats(compositor.stats());
    Ok(())
}

fn frame_file(dir: &Path, step: usize, frame: usize) -> PathBuf {
    dir.join(format!("{step:03}-frame-{frame:04}.png"))
}

fn describe(plan: SeekPlan) -> String {
    match plan {
        SeekPlan::Stay => "already shown".to_string(),
        SeekPlan::Continue { from, target } => format!("applied {from}..={target}"),
        SeekPlan::Restore { slot, target } => format!(
            "restored keyframe {slot}, applied {}..={target}",
            apngkit_compositor::KeyframeCache::frame_for_slot(slot)
        ),
        SeekPlan::Reset { target } => format!("cleared, applied 0..={target}"),
    }
}

fn print_stats(stats: CompositorStats) {
    println!("Stats:");
    println!("  Frames applied: {}", stats.frames_applied);
    println!("  Keyframe restores: {}", stats.keyframe_restores);
    println!("  Full resets: {}", stats.full_resets);
    println!("  Keyframes captured: {}", stats.keyframes_captured);
}
