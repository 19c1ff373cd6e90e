//! apngkit Playback
//!
//! Real-time transport for animated images:
//! - **Clock:** converts elapsed time and a speed multiplier into a frame index
//! - **Transport:** play, pause, step, seek, and speed changes
//! - **Groups:** one clock can drive several renderers in lockstep
//! - **Controller:** a registry of clocks fed by a scheduler tick
//!
//! ```text
//! scheduler tick ─► PlaybackController::tick(ts)
//!                        │ delta
//!                        ▼
//!                   PlaybackClock::update(delta)
//!                        │ frame index
//!                        ├─► renderer.render_frame(i)   (every group member)
//!                        └─► listeners(FrameChanged)
//! ```
//!
//! Everything here is single-threaded: clocks and renderers are shared with
//! `Rc<RefCell<_>>` and mutated only inside tick and transport calls.

pub mod clock;
pub mod controller;
pub mod events;
pub mod renderer;
pub mod speed;

pub use clock::*;
pub use controller::*;
pub use events::*;
pub use renderer::*;
pub use speed::*;
