//! apngkit Compositor
//!
//! Reproduces the canvas an animated image shows at any frame index by
//! applying delta frames with their disposal and blend rules.
//!
//! # Seek Strategy
//!
//! ```text
//! frames:     0 ─ 1 ─ ... ─ 16 ─ 17 ─ ... ─ 32 ─ ...
//! keyframes:  K0            K1              K2
//!                           │
//! seek 20 ────────────────── restore K1, apply 16..=20
//! ```
//!
//! A keyframe is the full surface captured just before its frame is
//! applied. Keyframes are filled lazily as playback passes them and are
//! never invalidated, so backward and long forward seeks cost at most
//! one restore plus `KEYFRAME_INTERVAL` delta frames once warm.

pub mod compositor;
pub mod keyframes;
pub mod prepare;
pub mod surface;

pub use compositor::*;
pub use keyframes::*;
pub use prepare::*;
pub use surface::*;
