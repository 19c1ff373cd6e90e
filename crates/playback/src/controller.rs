//! Registry of playback clocks fed by a scheduler tick.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use apngkit_common::clock::TickTimer;
use apngkit_common::config::PlaybackDefaults;

use crate::clock::PlaybackClock;
use crate::renderer::FrameRenderer;

/// A clock shared between the controller and UI code.
pub type ClockHandle = Rc<RefCell<PlaybackClock>>;

/// Owns every independent timeline: one clock per ungrouped image and one
/// shared clock per named group.
#[derive(Debug, Default)]
pub struct PlaybackController {
    defaults: PlaybackDefaults,
    clocks: Vec<ClockHandle>,
    groups: HashMap<String, ClockHandle>,
    timer: TickTimer,
}

impl PlaybackController {
    pub fn new(defaults: PlaybackDefaults) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
    }

    /// Register a new standalone clock.
    pub fn create_clock(&mut self) -> ClockHandle {
        let clock = Rc::new(RefCell::new(PlaybackClock::with_defaults(&self.defaults)));
        self.clocks.push(clock.clone());
        clock
    }

    /// The clock for `name`, creating and registering it on first use.
    pub fn group_clock(&mut self, name: &str) -> ClockHandle {
        if let Some(clock) = self.groups.get(name) {
            return clock.clone();
        }
        let clock = self.create_clock();
        self.groups.insert(name.to_string(), clock.clone());
        tracing::debug!(group = name, "Registered group clock");
        clock
    }

    /// The clock for `name`, if that group exists.
    pub fn group(&self, name: &str) -> Option<ClockHandle> {
        self.groups.get(name).cloned()
    }

    /// Deregister `clock` and any group name bound to it.
    ///
    /// The controller stops updating it and drops its reference, so the
    /// renderers it drives are freed once callers release their handles.
    /// Returns whether the clock was registered.
    pub fn remove_clock(&mut self, clock: &ClockHandle) -> bool {
        let before = self.clocks.len();
        self.clocks.retain(|registered| !Rc::ptr_eq(registered, clock));
        self.groups.retain(|_, grouped| !Rc::ptr_eq(grouped, clock));
        let removed = self.clocks.len() != before;
        if removed {
            tracing::debug!(remaining = self.clocks.len(), "Removed clock");
        }
        removed
    }

    /// Attach a renderer to the existing clock of `group`, or to a new
    /// standalone clock when no such group has been registered.
    pub fn attach<R: FrameRenderer + 'static>(
        &mut self,
        renderer: R,
        group: Option<&str>,
    ) -> ClockHandle {
        let clock = match group.and_then(|name| self.group(name)) {
            Some(clock) => clock,
            None => self.create_clock(),
        };
        clock.borrow_mut().attach(renderer);
        clock
    }

    /// Feed an absolute scheduler timestamp in milliseconds.
    ///
    /// The first tick only primes the timer. Returns whether clocks were
    /// updated.
    pub fn tick(&mut self, timestamp_ms: f64) -> bool {
        match self.timer.tick(timestamp_ms) {
            Some(delta) => {
                self.update(delta);
                true
            }
            None => false,
        }
    }

    /// Advance every registered clock by `delta_ms`.
    pub fn update(&mut self, delta_ms: f64) {
        for clock in &self.clocks {
            clock.borrow_mut().update(delta_ms);
        }
    }

    pub fn clocks(&self) -> &[ClockHandle] {
        &self.clocks
    }

    pub fn clock_count(&self) -> usize {
        self.clocks.len()
    }

    pub fn defaults(&self) -> &PlaybackDefaults {
        &self.defaults
    }
}
