//! apngkit Common Utilities
//!
//! Shared infrastructure for all apngkit crates:
//! - Error types and result aliases
//! - Tick timing for scheduler-driven playback
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
