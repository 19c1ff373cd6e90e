//! apngkit Sequence Model
//!
//! Defines the data contracts between an animated-image decoder and the
//! rendering core:
//! - **Frames:** RGBA8 delta images placed by a rectangle on the canvas
//! - **Operations:** disposal and blend modes applied around each frame
//! - **Sequences:** canvas dimensions plus an ordered, immutable frame list
//!
//! Frame durations are milliseconds. Zero or invalid durations are floored
//! to [`MIN_FRAME_DURATION_MS`] before any clock consumes them.

pub mod frame;
pub mod sequence;

pub use frame::*;
pub use sequence::*;
