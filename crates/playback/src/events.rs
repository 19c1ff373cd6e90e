//! Change notifications emitted by a playback clock.

use std::fmt;

/// What changed on a clock. Listeners read the new state from the
/// accompanying [`PlaybackStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackEvent {
    /// Playing/paused state was set.
    PlayingChanged,
    /// The displayed frame index was recomputed.
    FrameChanged,
    /// The speed multiplier was set.
    SpeedChanged,
}

/// Snapshot of a clock's transport state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackStatus {
    pub frame_number: usize,
    pub num_frames: usize,
    pub playing: bool,
    pub speed: f64,
}

/// Renders the one-based frame counter, e.g. `3 / 12`.
impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.num_frames == 0 {
            write!(f, "0 / 0")
        } else {
            write!(f, "{} / {}", self.frame_number + 1, self.num_frames)
        }
    }
}

/// Handle returned by [`EventListeners::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(PlaybackEvent, &PlaybackStatus)>;

/// Typed callback registry.
#[derive(Default)]
pub struct EventListeners {
    next_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
}

impl EventListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for every event.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(PlaybackEvent, &PlaybackStatus) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Register a callback for one kind of event.
    pub fn subscribe_to(
        &mut self,
        event: PlaybackEvent,
        mut listener: impl FnMut(&PlaybackStatus) + 'static,
    ) -> ListenerId {
        self.subscribe(move |fired, status| {
            if fired == event {
                listener(status);
            }
        })
    }

    /// Remove a callback. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Call every listener in registration order.
    pub fn emit(&mut self, event: PlaybackEvent, status: &PlaybackStatus) {
        for (_, listener) in &mut self.listeners {
            listener(event, status);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for EventListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListeners")
            .field("count", &self.listeners.len())
            .finish()
    }
}
