//! Render a single frame to an image file.

use std::path::PathBuf;

use super::{clamp_frame, open_compositor};

pub async fn run(path: PathBuf, frame: usize, output: PathBuf) -> anyhow::Result<()> {
    let mut compositor = open_compositor(&path).await?;
    let target = clamp_frame(&compositor, frame);

    compositor.render_frame(target);
    compositor.surface().save(&output)?;

    println!(
        "Rendered frame {} / {} to {}",
        target + 1,
        compositor.frame_count(),
        output.display()
    );
    Ok(())
}
