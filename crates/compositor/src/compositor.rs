//! The incremental frame compositor.

use image::RgbaImage;

use apngkit_common::error::{ApngkitError, ApngkitResult};
use apngkit_sequence_model::frame::{BlendOp, DisposeOp, Rect};

use crate::keyframes::KeyframeCache;
use crate::prepare::{PreparedFrame, PreparedSequence};
use crate::surface::{RasterSurface, Surface};

/// Disposal owed by the most recently drawn frame.
///
/// Disposal runs after a frame has been visible and before the next frame
/// is drawn, so it is carried here for one step.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PendingDisposal {
    /// Nothing to undo.
    #[default]
    Keep,
    /// Clear the rectangle to transparent.
    Background(Rect),
    /// Write back the pixels that were under the rectangle.
    Previous { rect: Rect, pixels: RgbaImage },
}

impl PendingDisposal {
    /// The disposal `frame` will owe once drawn on `surface`.
    ///
    /// Must be called before the frame is drawn so `Previous` captures the
    /// pixels it covers.
    pub fn for_frame<S: Surface + ?Sized>(frame: &PreparedFrame, surface: &S) -> Self {
        match frame.dispose_op {
            DisposeOp::None => Self::Keep,
            DisposeOp::Background => Self::Background(frame.rect),
            DisposeOp::Previous => Self::Previous {
                rect: frame.rect,
                pixels: surface.read_rect(frame.rect),
            },
        }
    }

    /// Apply the disposal to `surface`.
    pub fn commit<S: Surface + ?Sized>(self, surface: &mut S) {
        match self {
            Self::Keep => {}
            Self::Background(rect) => surface.clear_rect(rect),
            Self::Previous { rect, pixels } => surface.write_image(&pixels, rect.left, rect.top),
        }
    }
}

/// How to get from the current surface to a target frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekPlan {
    /// Already showing the target.
    Stay,
    /// Apply frames `from..=target` on top of the current surface.
    Continue { from: usize, target: usize },
    /// Restore keyframe `slot`, then apply from its frame to `target`.
    Restore { slot: usize, target: usize },
    /// Clear the surface and apply `0..=target`.
    Reset { target: usize },
}

/// Work counters, useful for checking that seeks take the short path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompositorStats {
    /// Delta frames applied.
    pub frames_applied: u64,
    /// Keyframe snapshots restored.
    pub keyframe_restores: u64,
    /// Full clears followed by replay from frame 0.
    pub full_resets: u64,
    /// Keyframe snapshots taken.
    pub keyframes_captured: u64,
}

/// Renders any frame of a prepared sequence onto a surface.
#[derive(Debug)]
pub struct Compositor<S: Surface = RasterSurface> {
    sequence: PreparedSequence,
    surface: S,
    keyframes: KeyframeCache,
    current_frame: Option<usize>,
    pending: PendingDisposal,
    stats: CompositorStats,
}

impl Compositor<RasterSurface> {
    /// Compositor drawing onto a fresh transparent surface of canvas size.
    pub fn with_raster(sequence: PreparedSequence) -> Self {
        let surface = RasterSurface::new(sequence.width(), sequence.height());
        Self::build(sequence, surface)
    }
}

impl<S: Surface> Compositor<S> {
    /// Compositor drawing onto a caller-supplied surface.
    ///
    /// The surface must match the sequence's canvas size.
    pub fn new(sequence: PreparedSequence, surface: S) -> ApngkitResult<Self> {
        if (surface.width(), surface.height()) != (sequence.width(), sequence.height()) {
            return Err(ApngkitError::render(format!(
                "surface is {}x{} but the sequence canvas is {}x{}",
                surface.width(),
                surface.height(),
                sequence.width(),
                sequence.height()
            )));
        }
        Ok(Self::build(sequence, surface))
    }

    fn build(sequence: PreparedSequence, surface: S) -> Self {
        Self {
            keyframes: KeyframeCache::new(sequence.len()),
            sequence,
            surface,
            current_frame: None,
            pending: PendingDisposal::Keep,
            stats: CompositorStats::default(),
        }
    }

    pub fn sequence(&self) -> &PreparedSequence {
        &self.sequence
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn keyframes(&self) -> &KeyframeCache {
        &self.keyframes
    }

    pub fn stats(&self) -> CompositorStats {
        self.stats
    }

    pub fn frame_count(&self) -> usize {
        self.sequence.len()
    }

    /// Last frame fully drawn, or `None` before the first render.
    pub fn current_frame(&self) -> Option<usize> {
        self.current_frame
    }

    /// Decide how to reach `target`, clamped to the last frame.
    pub fn plan(&self, target: usize) -> SeekPlan {
        let Some(last) = self.sequence.len().checked_sub(1) else {
            return SeekPlan::Stay;
        };
        let target = target.min(last);

        match self.current_frame {
            Some(current) if current == target => SeekPlan::Stay,
            Some(current) if current < target => match self.keyframes.best_slot_for(target) {
                Some(slot) if KeyframeCache::frame_for_slot(slot) > current => {
                    SeekPlan::Restore { slot, target }
                }
                _ => SeekPlan::Continue {
                    from: current + 1,
                    target,
                },
            },
            _ => match self.keyframes.best_slot_for(target) {
                Some(slot) => SeekPlan::Restore { slot, target },
                None => SeekPlan::Reset { target },
            },
        }
    }

    /// Leave the surface showing frame `target` (clamped to the last frame).
    pub fn render_frame(&mut self, target: usize) {
        let plan = self.plan(target);
        tracing::trace!(?plan, current = ?self.current_frame, "Compositing");

        match plan {
            SeekPlan::Stay => {}
            SeekPlan::Continue { from, target } => self.apply_range(from, target),
            SeekPlan::Restore { slot, target } => {
                if let Some(snapshot) = self.keyframes.get(slot) {
                    self.surface.restore(snapshot);
                }
                self.pending = PendingDisposal::Keep;
                self.stats.keyframe_restores += 1;
                self.apply_range(KeyframeCache::frame_for_slot(slot), target);
            }
            SeekPlan::Reset { target } => {
                self.surface.clear();
                self.pending = PendingDisposal::Keep;
                self.stats.full_resets += 1;
                self.apply_range(0, target);
            }
        }
    }

    fn apply_range(&mut self, from: usize, target: usize) {
        for index in from..=target {
            self.apply_frame(index);
        }
    }

    fn apply_frame(&mut self, index: usize) {
        std::mem::take(&mut self.pending).commit(&mut self.surface);

        let surface = &self.surface;
        if self.keyframes.capture_if_empty(index, || surface.snapshot()) {
            self.stats.keyframes_captured += 1;
            tracing::debug!(
                frame = index,
                slot = KeyframeCache::slot_for(index),
                "Captured keyframe"
            );
        }

        let Some(frame) = self.sequence.frame(index) else {
            return;
        };
        self.pending = PendingDisposal::for_frame(frame, &self.surface);

        let (left, top) = (frame.rect.left, frame.rect.top);
        match frame.blend_op {
            // Clearing then compositing onto transparency is an overwrite.
            BlendOp::Source => self.surface.write_image(&frame.bitmap, left, top),
            BlendOp::Over => self.surface.draw_image(&frame.bitmap, left, top),
        }

        self.current_frame = Some(index);
        self.stats.frames_applied += 1;
    }
}
