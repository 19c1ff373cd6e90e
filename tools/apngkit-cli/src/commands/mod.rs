//! Subcommand implementations.

use std::path::Path;

use apngkit_compositor::{Compositor, PreparedSequence};

use crate::source::load_sequence;

pub mod config;
pub mod info;
pub mod play;
pub mod render;
pub mod scrub;

/// Decode `path` and prepare a compositor drawing onto an in-memory surface.
pub(crate) async fn open_compositor(path: &Path) -> anyhow::Result<Compositor> {
    let sequence =
        load_sequence(path).map_err(|e| anyhow::anyhow!("Failed to load animation: {e}"))?;
    let prepared = PreparedSequence::prepare(&sequence)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to prepare frames: {e}"))?;
    Ok(Compositor::with_raster(prepared))
}

/// Clamp a user-supplied frame index, warning when it is out of range.
pub(crate) fn clamp_frame(compositor: &Compositor, frame: usize) -> usize {
    let last = compositor.frame_count().saturating_sub(1);
    if frame > last {
        tracing::warn!(requested = frame, last, "Frame index out of range, clamping");
    }
    frame.min(last)
}
