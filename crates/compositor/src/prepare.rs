//! Frame preparation: turning decoded frames into drawable bitmaps.
//!
//! A [`PreparedSequence`] is the barrier between decoding and rendering.
//! It only exists once every frame has been validated and converted, so a
//! compositor built from one can never observe a half-prepared sequence.

use std::sync::Arc;

use image::RgbaImage;
use tokio::task::JoinSet;

use apngkit_common::error::{ApngkitError, ApngkitResult};
use apngkit_sequence_model::frame::{BlendOp, DisposeOp, Frame, Rect};
use apngkit_sequence_model::sequence::FrameSource;

/// A frame ready to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedFrame {
    pub rect: Rect,
    pub bitmap: RgbaImage,
    pub dispose_op: DisposeOp,
    pub blend_op: BlendOp,
}

#[derive(Debug)]
struct PreparedInner {
    width: u32,
    height: u32,
    frames: Vec<PreparedFrame>,
    durations: Vec<f64>,
}

/// An immutable, fully prepared sequence. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PreparedSequence {
    inner: Arc<PreparedInner>,
}

impl PreparedSequence {
    /// Prepare every frame on the calling thread.
    pub fn from_sequence<S: FrameSource + ?Sized>(source: &S) -> ApngkitResult<Self> {
        validate_source(source)?;
        let frames = source
            .frames()
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, frame)| prepare_frame(index, frame))
            .collect::<ApngkitResult<Vec<_>>>()?;
        Ok(Self::assemble(source, frames))
    }

    /// Prepare every frame as an independent blocking task.
    ///
    /// Resolves only after all frames are ready; the first failure is
    /// returned and the remaining tasks are aborted.
    pub async fn prepare<S: FrameSource + ?Sized>(source: &S) -> ApngkitResult<Self> {
        validate_source(source)?;

        let mut tasks = JoinSet::new();
        for (index, frame) in source.frames().iter().cloned().enumerate() {
            tasks.spawn_blocking(move || prepare_frame(index, frame).map(|f| (index, f)));
        }

        let mut slots: Vec<Option<PreparedFrame>> = vec![None; source.frame_count()];
        while let Some(joined) = tasks.join_next().await {
            let (index, frame) = joined
                .map_err(|e| ApngkitError::render(format!("frame preparation task failed: {e}")))??;
            slots[index] = Some(frame);
        }

        let frames = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| ApngkitError::render(format!("frame {index} was not prepared")))
            })
            .collect::<ApngkitResult<Vec<_>>>()?;

        tracing::debug!(frames = frames.len(), "Prepared frame sequence");
        Ok(Self::assemble(source, frames))
    }

    fn assemble<S: FrameSource + ?Sized>(source: &S, frames: Vec<PreparedFrame>) -> Self {
        Self {
            inner: Arc::new(PreparedInner {
                width: source.canvas_width(),
                height: source.canvas_height(),
                frames,
                durations: source.durations(),
            }),
        }
    }

    pub fn width(&self) -> u32 {
        self.inner.width
    }

    pub fn height(&self) -> u32 {
        self.inner.height
    }

    pub fn frames(&self) -> &[PreparedFrame] {
        &self.inner.frames
    }

    pub fn frame(&self, index: usize) -> Option<&PreparedFrame> {
        self.inner.frames.get(index)
    }

    pub fn len(&self) -> usize {
        self.inner.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.frames.is_empty()
    }

    /// Per-frame durations in milliseconds, duration floor applied.
    pub fn durations(&self) -> &[f64] {
        &self.inner.durations
    }
}

fn validate_source<S: FrameSource + ?Sized>(source: &S) -> ApngkitResult<()> {
    let (width, height) = (source.canvas_width(), source.canvas_height());
    if width == 0 || height == 0 {
        return Err(ApngkitError::sequence(format!(
            "canvas must be non-empty, got {width}x{height}"
        )));
    }
    if source.frame_count() == 0 {
        return Err(ApngkitError::sequence("sequence has no frames"));
    }
    for (index, frame) in source.frames().iter().enumerate() {
        frame
            .validate(width, height)
            .map_err(|e| ApngkitError::sequence(format!("frame {index}: {e}")))?;
    }
    Ok(())
}

fn prepare_frame(index: usize, frame: Frame) -> ApngkitResult<PreparedFrame> {
    let Frame {
        rect,
        pixels,
        dispose_op,
        blend_op,
        ..
    } = frame;
    let bitmap = RgbaImage::from_raw(rect.width, rect.height, pixels).ok_or_else(|| {
        ApngkitError::sequence(format!(
            "frame {index}: pixel buffer does not match {}x{}",
            rect.width, rect.height
        ))
    })?;
    Ok(PreparedFrame {
        rect,
        bitmap,
        dispose_op,
        blend_op,
    })
}
