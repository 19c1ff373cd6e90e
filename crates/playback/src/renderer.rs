//! The seam between a playback clock and whatever draws frames.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use apngkit_compositor::compositor::Compositor;
use apngkit_compositor::surface::Surface;

/// Something a clock can drive to a frame index.
pub trait FrameRenderer {
    /// Number of frames in the bound sequence.
    fn frame_count(&self) -> usize;

    /// Per-frame durations in milliseconds.
    fn frame_durations(&self) -> Vec<f64>;

    /// Show frame `index`.
    fn render_frame(&mut self, index: usize);
}

impl<S: Surface> FrameRenderer for Compositor<S> {
    fn frame_count(&self) -> usize {
        Compositor::frame_count(self)
    }

    fn frame_durations(&self) -> Vec<f64> {
        self.sequence().durations().to_vec()
    }

    fn render_frame(&mut self, index: usize) {
        Compositor::render_frame(self, index);
    }
}

impl fmt::Debug for dyn FrameRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FrameRenderer({} frames)", self.frame_count())
    }
}

/// Shared renderers stay readable by their owner while a clock drives them.
impl<R: FrameRenderer + ?Sized> FrameRenderer for Rc<RefCell<R>> {
    fn frame_count(&self) -> usize {
        self.borrow().frame_count()
    }

    fn frame_durations(&self) -> Vec<f64> {
        self.borrow().frame_durations()
    }

    fn render_frame(&mut self, index: usize) {
        self.borrow_mut().render_frame(index);
    }
}

impl<R: FrameRenderer + ?Sized> FrameRenderer for Box<R> {
    fn frame_count(&self) -> usize {
        (**self).frame_count()
    }

    fn frame_durations(&self) -> Vec<f64> {
        (**self).frame_durations()
    }

    fn render_frame(&mut self, index: usize) {
        (**self).render_frame(index);
    }
}
