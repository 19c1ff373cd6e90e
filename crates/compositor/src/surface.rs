//! Raster drawing surfaces.

use std::path::Path;

use image::{imageops, Rgba, RgbaImage};

use apngkit_common::error::{ApngkitError, ApngkitResult};
use apngkit_sequence_model::frame::Rect;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// The 2D drawing primitives a compositor needs.
///
/// Coordinates are canvas pixels. Writes that extend past the surface are
/// clipped.
pub trait Surface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Set every pixel in `rect` to transparent black.
    fn clear_rect(&mut self, rect: Rect);

    /// Copy the pixels under `rect`.
    fn read_rect(&self, rect: Rect) -> RgbaImage;

    /// Overwrite pixels with `image`, alpha included.
    fn write_image(&mut self, image: &RgbaImage, left: u32, top: u32);

    /// Alpha-composite `image` over the existing pixels (source-over).
    fn draw_image(&mut self, image: &RgbaImage, left: u32, top: u32);

    fn clear(&mut self) {
        self.clear_rect(Rect::full(self.width(), self.height()));
    }

    /// Copy of the whole surface.
    fn snapshot(&self) -> RgbaImage {
        self.read_rect(Rect::full(self.width(), self.height()))
    }

    /// Put back a whole-surface copy taken by [`Surface::snapshot`].
    fn restore(&mut self, snapshot: &RgbaImage) {
        self.write_image(snapshot, 0, 0);
    }
}

/// In-memory RGBA8 surface.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterSurface {
    pixels: RgbaImage,
}

impl RasterSurface {
    /// A fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_pixels(self) -> RgbaImage {
        self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Encode the surface to an image file; the format follows the extension.
    pub fn save(&self, path: &Path) -> ApngkitResult<()> {
        self.pixels.save(path).map_err(|e| {
            ApngkitError::image(format!("failed to write {}: {e}", path.display()))
        })
    }
}

impl Surface for RasterSurface {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn clear_rect(&mut self, rect: Rect) {
        let rect = rect.clipped_to(self.width(), self.height());
        for y in rect.top..rect.bottom() {
            for x in rect.left..rect.right() {
                self.pixels.put_pixel(x, y, TRANSPARENT);
            }
        }
    }

    fn read_rect(&self, rect: Rect) -> RgbaImage {
        let rect = rect.clipped_to(self.width(), self.height());
        imageops::crop_imm(&self.pixels, rect.left, rect.top, rect.width, rect.height).to_image()
    }

    fn write_image(&mut self, image: &RgbaImage, left: u32, top: u32) {
        imageops::replace(&mut self.pixels, image, left as i64, top as i64);
    }

    fn draw_image(&mut self, image: &RgbaImage, left: u32, top: u32) {
        imageops::overlay(&mut self.pixels, image, left as i64, top as i64);
    }
}
