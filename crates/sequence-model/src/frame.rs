//! Frame types: placement rectangles, disposal/blend modes, and pixel data.

use serde::{Deserialize, Serialize};

use apngkit_common::error::{ApngkitError, ApngkitResult};

/// Bytes per RGBA8 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// A pixel rectangle within the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Rect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Rectangle covering a whole `width x height` canvas.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Exclusive right edge, saturating on overflow.
    pub fn right(&self) -> u32 {
        self.left.saturating_add(self.width)
    }

    /// Exclusive bottom edge, saturating on overflow.
    pub fn bottom(&self) -> u32 {
        self.top.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels covered.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether the rectangle lies entirely inside a `width x height` canvas.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.left.checked_add(self.width).is_some_and(|r| r <= width)
            && self.top.checked_add(self.height).is_some_and(|b| b <= height)
    }

    /// The part of this rectangle inside a `width x height` canvas.
    pub fn clipped_to(&self, width: u32, height: u32) -> Rect {
        let left = self.left.min(width);
        let top = self.top.min(height);
        Rect {
            left,
            top,
            width: self.right().min(width) - left,
            height: self.bottom().min(height) - top,
        }
    }
}

/// What happens to a frame's region after it has been displayed, before the
/// next frame is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DisposeOp {
    /// Leave the canvas as-is.
    #[default]
    None,
    /// Clear the region to fully transparent black.
    Background,
    /// Restore the region to what it was before the frame was drawn.
    Previous,
}

/// How a frame's pixels combine with the canvas beneath them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BlendOp {
    /// Overwrite the region, alpha included.
    Source,
    /// Alpha-composite over the existing contents.
    #[default]
    Over,
}

/// One decoded frame of an animation.
///
/// `pixels` holds straight-alpha RGBA8 rows covering exactly `rect`.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Placement within the canvas.
    pub rect: Rect,

    /// Row-major RGBA8 pixels, `rect.width * rect.height * 4` bytes.
    pub pixels: Vec<u8>,

    /// Time until the next frame, in milliseconds.
    pub duration_ms: f64,

    /// Disposal applied after this frame was shown.
    pub dispose_op: DisposeOp,

    /// Blend applied when drawing this frame.
    pub blend_op: BlendOp,
}

impl Frame {
    pub fn new(
        rect: Rect,
        pixels: Vec<u8>,
        duration_ms: f64,
        dispose_op: DisposeOp,
        blend_op: BlendOp,
    ) -> Self {
        Self {
            rect,
            pixels,
            duration_ms,
            dispose_op,
            blend_op,
        }
    }

    /// A frame whose every pixel is the same RGBA color.
    pub fn solid(
        rect: Rect,
        rgba: [u8; 4],
        duration_ms: f64,
        dispose_op: DisposeOp,
        blend_op: BlendOp,
    ) -> Self {
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take(rect.area() * BYTES_PER_PIXEL)
            .collect();
        Self::new(rect, pixels, duration_ms, dispose_op, blend_op)
    }

    /// Expected pixel buffer length for this frame's rectangle.
    pub fn expected_len(&self) -> usize {
        self.rect.area() * BYTES_PER_PIXEL
    }

    /// Check the frame against the canvas it will be drawn on.
    pub fn validate(&self, canvas_width: u32, canvas_height: u32) -> ApngkitResult<()> {
        if !self.rect.fits_within(canvas_width, canvas_height) {
            return Err(ApngkitError::sequence(format!(
                "frame rectangle {:?} exceeds {}x{} canvas",
                self.rect, canvas_width, canvas_height
            )));
        }
        if self.pixels.len() != self.expected_len() {
            return Err(ApngkitError::sequence(format!(
                "frame pixel buffer is {} bytes, expected {} for {}x{}",
                self.pixels.len(),
                self.expected_len(),
                self.rect.width,
                self.rect.height
            )));
        }
        Ok(())
    }

    /// Metadata without pixel data.
    pub fn info(&self) -> FrameInfo {
        FrameInfo {
            rect: self.rect,
            duration_ms: self.duration_ms,
            dispose_op: self.dispose_op,
            blend_op: self.blend_op,
        }
    }
}

/// Frame metadata, serializable for inspection output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameInfo {
    pub rect: Rect,
    pub duration_ms: f64,
    pub dispose_op: DisposeOp,
    pub blend_op: BlendOp,
}
