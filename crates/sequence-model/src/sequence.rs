//! Frame sequences and the duration policy.

use serde::{Deserialize, Serialize};

use apngkit_common::error::{ApngkitError, ApngkitResult};

use crate::frame::{Frame, FrameInfo};

/// Shortest duration a frame may have, in milliseconds.
///
/// Zero, negative, and non-finite durations are raised to this floor so a
/// playback clock always consumes time when it advances.
pub const MIN_FRAME_DURATION_MS: f64 = 10.0;

/// Apply the duration floor to a raw frame duration.
pub fn effective_duration(duration_ms: f64) -> f64 {
    // Short but positive delays are honored as-is.
    if duration_ms.is_finite() && duration_ms > 0.0 {
        duration_ms
    } else {
        MIN_FRAME_DURATION_MS
    }
}

/// An ordered, immutable sequence of decoded frames.
pub trait FrameSource {
    /// Canvas width in pixels.
    fn canvas_width(&self) -> u32;

    /// Canvas height in pixels.
    fn canvas_height(&self) -> u32;

    /// All frames in display order.
    fn frames(&self) -> &[Frame];

    fn frame_count(&self) -> usize {
        self.frames().len()
    }

    /// Per-frame durations with the duration floor applied.
    fn durations(&self) -> Vec<f64> {
        self.frames()
            .iter()
            .map(|f| effective_duration(f.duration_ms))
            .collect()
    }
}

/// In-memory animation produced by a decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSequence {
    width: u32,
    height: u32,
    frames: Vec<Frame>,
}

impl AnimationSequence {
    /// Build a sequence, validating every frame against the canvas.
    pub fn new(width: u32, height: u32, frames: Vec<Frame>) -> ApngkitResult<Self> {
        let sequence = Self {
            width,
            height,
            frames,
        };
        sequence.validate()?;
        Ok(sequence)
    }

    /// Check canvas dimensions and every frame.
    pub fn validate(&self) -> ApngkitResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ApngkitError::sequence(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.frames.is_empty() {
            return Err(ApngkitError::sequence("sequence has no frames"));
        }
        for (index, frame) in self.frames.iter().enumerate() {
            frame
                .validate(self.width, self.height)
                .map_err(|e| ApngkitError::sequence(format!("frame {index}: {e}")))?;
        }
        Ok(())
    }

    /// Total duration of one loop, with the duration floor applied.
    pub fn total_duration_ms(&self) -> f64 {
        self.durations().iter().sum()
    }

    pub fn summary(&self) -> SequenceSummary {
        SequenceSummary {
            width: self.width,
            height: self.height,
            frame_count: self.frames.len(),
            total_duration_ms: self.total_duration_ms(),
            frames: self.frames.iter().map(Frame::info).collect(),
        }
    }
}

impl FrameSource for AnimationSequence {
    fn canvas_width(&self) -> u32 {
        self.width
    }

    fn canvas_height(&self) -> u32 {
        self.height
    }

    fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

/// Serializable description of a sequence without pixel data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceSummary {
    pub width: u32,
    pub height: u32,
    pub frame_count: usize,
    pub total_duration_ms: f64,
    pub frames: Vec<FrameInfo>,
}
