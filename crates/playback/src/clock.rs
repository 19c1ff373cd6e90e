//! The playback clock: transport state machine for one animation timeline.

use apngkit_common::config::PlaybackDefaults;
use apngkit_common::error::ApngkitResult;
use apngkit_sequence_model::sequence::effective_duration;

use crate::events::{EventListeners, ListenerId, PlaybackEvent, PlaybackStatus};
use crate::renderer::FrameRenderer;
use crate::speed::validate_speed;

/// Transport state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Paused,
}

/// Drives one or more renderers through a looping frame sequence.
///
/// Until a non-empty sequence is attached the clock is unready and every
/// transport call is a no-op, so controls can be wired up before data
/// arrives.
#[derive(Debug)]
pub struct PlaybackClock {
    renderers: Vec<Box<dyn FrameRenderer>>,
    durations: Vec<f64>,
    loop_duration: f64,
    frame_number: usize,
    state: PlaybackState,
    speed: f64,
    delay_accumulator: f64,
    listeners: EventListeners,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackClock {
    /// An unready clock that will start playing at normal speed.
    pub fn new() -> Self {
        Self {
            renderers: Vec::new(),
            durations: Vec::new(),
            loop_duration: 0.0,
            frame_number: 0,
            state: PlaybackState::Playing,
            speed: 1.0,
            delay_accumulator: 0.0,
            listeners: EventListeners::new(),
        }
    }

    /// An unready clock using configured defaults.
    pub fn with_defaults(defaults: &PlaybackDefaults) -> Self {
        let mut clock = Self::new();
        clock.speed = validate_speed(defaults.speed).unwrap_or(1.0);
        if !defaults.autoplay {
            clock.state = PlaybackState::Paused;
        }
        clock
    }

    /// Add a renderer to this clock's group and show it the current frame.
    ///
    /// The first non-empty renderer fixes the frame count and durations;
    /// later renderers are assumed to share them.
    pub fn attach<R: FrameRenderer + 'static>(&mut self, renderer: R) {
        let mut renderer: Box<dyn FrameRenderer> = Box::new(renderer);

        if self.durations.is_empty() && renderer.frame_count() > 0 {
            self.durations = renderer
                .frame_durations()
                .into_iter()
                .map(effective_duration)
                .collect();
            self.loop_duration = self.durations.iter().sum();
            tracing::debug!(
                frames = self.durations.len(),
                loop_ms = self.loop_duration,
                "Clock initialized from first sequence"
            );
        } else if !self.durations.is_empty() && renderer.frame_count() != self.durations.len() {
            tracing::warn!(
                expected = self.durations.len(),
                actual = renderer.frame_count(),
                "Grouped sequence frame count differs from the clock's"
            );
        }

        if self.is_ready() {
            renderer.render_frame(self.frame_number);
        }
        self.renderers.push(renderer);
    }

    /// Advance by `delta_ms` of wall time.
    ///
    /// Every renderer ends on the final frame reached; intermediate frames
    /// skipped during a large delta are not drawn. One `FrameChanged` is
    /// emitted per call.
    pub fn update(&mut self, delta_ms: f64) {
        if !self.is_ready() || self.state == PlaybackState::Paused {
            return;
        }
        if !delta_ms.is_finite() || delta_ms < 0.0 {
            tracing::warn!(delta_ms, "Ignoring invalid clock delta");
            return;
        }

        let scaled = delta_ms * self.speed;
        if !scaled.is_finite() {
            tracing::warn!(delta_ms, speed = self.speed, "Ignoring clock delta that overflows");
            return;
        }

        self.delay_accumulator += scaled;
        if self.loop_duration > 0.0 && self.delay_accumulator >= self.loop_duration {
            // Whole loops land back on the same frame.
            self.delay_accumulator %= self.loop_duration;
        }

        let num_frames = self.durations.len();
        let mut frame = self.frame_number;
        while self.delay_accumulator >= self.durations[frame] {
            self.delay_accumulator -= self.durations[frame];
            frame = (frame + 1) % num_frames;
        }

        tracing::trace!(
            from = self.frame_number,
            to = frame,
            remainder_ms = self.delay_accumulator,
            "Clock advanced"
        );
        self.frame_number = frame;
        self.render_all();
        self.emit(PlaybackEvent::FrameChanged);
    }

    /// Stop advancing; time spent paused never counts.
    pub fn pause(&mut self) {
        if !self.is_ready() {
            return;
        }
        self.state = PlaybackState::Paused;
        self.delay_accumulator = 0.0;
        tracing::debug!(frame = self.frame_number, "Playback paused");
        self.emit(PlaybackEvent::PlayingChanged);
    }

    /// Continue advancing from the current frame.
    pub fn resume(&mut self) {
        if !self.is_ready() {
            return;
        }
        self.state = PlaybackState::Playing;
        tracing::debug!(frame = self.frame_number, "Playback resumed");
        self.emit(PlaybackEvent::PlayingChanged);
    }

    /// Pause when playing, resume when paused.
    pub fn toggle(&mut self) {
        match self.state {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused => self.resume(),
        }
    }

    /// Set the speed multiplier; applies from the next update.
    ///
    /// An invalid speed is rejected even before a sequence is attached;
    /// a valid one is ignored until then.
    pub fn set_speed(&mut self, speed: f64) -> ApngkitResult<()> {
        let speed = validate_speed(speed)?;
        if !self.is_ready() {
            return Ok(());
        }
        self.speed = speed;
        tracing::debug!(speed, "Playback speed changed");
        self.emit(PlaybackEvent::SpeedChanged);
        Ok(())
    }

    /// Pause and show the next frame, wrapping to the first.
    pub fn step_forward(&mut self) {
        if !self.is_ready() {
            return;
        }
        let next = (self.frame_number + 1) % self.durations.len();
        self.jump_paused(next);
    }

    /// Pause and show the previous frame, wrapping to the last.
    pub fn step_backward(&mut self) {
        if !self.is_ready() {
            return;
        }
        let num_frames = self.durations.len();
        let previous = (self.frame_number + num_frames - 1) % num_frames;
        self.jump_paused(previous);
    }

    /// Pause and show `index`, clamped to the last frame.
    pub fn seek(&mut self, index: usize) {
        if !self.is_ready() {
            return;
        }
        let target = index.min(self.durations.len() - 1);
        self.jump_paused(target);
    }

    fn jump_paused(&mut self, target: usize) {
        self.state = PlaybackState::Paused;
        self.delay_accumulator = 0.0;
        self.emit(PlaybackEvent::PlayingChanged);

        self.frame_number = target;
        self.render_all();
        self.emit(PlaybackEvent::FrameChanged);
    }

    fn render_all(&mut self) {
        let frame = self.frame_number;
        for renderer in &mut self.renderers {
            renderer.render_frame(frame);
        }
    }

    fn emit(&mut self, event: PlaybackEvent) {
        let status = self.status();
        self.listeners.emit(event, &status);
    }

    /// Register a callback for every change notification.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(PlaybackEvent, &PlaybackStatus) + 'static,
    ) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    /// Register a callback for one kind of change notification.
    pub fn subscribe_to(
        &mut self,
        event: PlaybackEvent,
        listener: impl FnMut(&PlaybackStatus) + 'static,
    ) -> ListenerId {
        self.listeners.subscribe_to(event, listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Whether a non-empty sequence has been attached.
    pub fn is_ready(&self) -> bool {
        !self.durations.is_empty()
    }

    pub fn frame_number(&self) -> usize {
        self.frame_number
    }

    pub fn num_frames(&self) -> usize {
        self.durations.len()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Elapsed time not yet consumed by a frame advance, in milliseconds.
    pub fn delay_accumulator(&self) -> f64 {
        self.delay_accumulator
    }

    /// Floored per-frame durations in milliseconds.
    pub fn durations(&self) -> &[f64] {
        &self.durations
    }

    pub fn renderer_count(&self) -> usize {
        self.renderers.len()
    }

    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            frame_number: self.frame_number,
            num_frames: self.num_frames(),
            playing: self.is_playing(),
            speed: self.speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Renderer that records every frame it is asked to show.
    struct Recorder {
        durations: Vec<f64>,
        rendered: Rc<RefCell<Vec<usize>>>,
    }

    impl FrameRenderer for Recorder {
        fn frame_count(&self) -> usize {
            self.durations.len()
        }

        fn frame_durations(&self) -> Vec<f64> {
            self.durations.clone()
        }

        fn render_frame(&mut self, index: usize) {
            self.rendered.borrow_mut().push(index);
        }
    }

    fn clock_with(durations: &[f64]) -> (PlaybackClock, Rc<RefCell<Vec<usize>>>) {
        let rendered = Rc::new(RefCell::new(Vec::new()));
        let mut clock = PlaybackClock::new();
        clock.attach(Recorder {
            durations: durations.to_vec(),
            rendered: rendered.clone(),
        });
        (clock, rendered)
    }

    fn event_log(clock: &mut PlaybackClock) -> Rc<RefCell<Vec<PlaybackEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        clock.subscribe(move |event, _| sink.borrow_mut().push(event));
        log
    }

    #[test]
    fn test_attach_renders_frame_zero() {
        let (clock, rendered) = clock_with(&[10.0, 10.0]);
        assert!(clock.is_ready());
        assert_eq!(clock.num_frames(), 2);
        assert_eq!(*rendered.borrow(), vec![0]);
    }

    #[test]
    fn test_update_scenario() {
        let (mut clock, rendered) = clock_with(&[10.0, 10.0, 10.0]);

        clock.update(25.0);
        assert_eq!(clock.frame_number(), 2);
        assert_eq!(clock.delay_accumulator(), 5.0);

        clock.update(10.0);
        assert_eq!(clock.frame_number(), 0);
        assert_eq!(clock.delay_accumulator(), 5.0);

        // Intermediate frame 1 was skipped, not drawn.
        assert_eq!(*rendered.borrow(), vec![0, 2, 0]);
    }

    #[test]
    fn test_update_emits_one_frame_event() {
        let (mut clock, _) = clock_with(&[10.0, 10.0, 10.0]);
        let log = event_log(&mut clock);
        clock.update(1000.0);
        assert_eq!(*log.borrow(), vec![PlaybackEvent::FrameChanged]);
    }

    #[test]
    fn test_speed_scales_time() {
        let (mut clock, _) = clock_with(&[10.0, 10.0, 10.0, 10.0]);
        clock.set_speed(2.0).unwrap();
        clock.update(10.0);
        assert_eq!(clock.frame_number(), 2);
        assert_eq!(clock.delay_accumulator(), 0.0);
    }

    #[test]
    fn test_large_delta_wraps_whole_loops() {
        let (mut clock, _) = clock_with(&[10.0, 20.0, 30.0]);
        clock.update(60.0 * 1000.0 + 15.0);
        assert_eq!(clock.frame_number(), 1);
        assert_eq!(clock.delay_accumulator(), 5.0);
    }

    #[test]
    fn test_overflowing_scaled_delta_is_ignored() {
        let (mut clock, _) = clock_with(&[10.0, 10.0, 10.0]);
        clock.set_speed(2.0).unwrap();

        clock.update(f64::MAX);
        assert_eq!(clock.frame_number(), 0);
        assert_eq!(clock.delay_accumulator(), 0.0);

        clock.update(15.0);
        clock.update(15.0);
        assert_eq!(clock.frame_number(), 0);
        assert_eq!(clock.delay_accumulator(), 0.0);
        assert!(clock.delay_accumulator() < clock.durations()[clock.frame_number()]);
    }

    #[test]
    fn test_zero_durations_are_floored() {
        let (mut clock, _) = clock_with(&[0.0, 0.0]);
        assert!(clock.durations().iter().all(|&d| d > 0.0));
        clock.update(15.0);
        assert_eq!(clock.frame_number(), 1);
    }

    #[test]
    fn test_pause_freezes_and_resume_does_not_catch_up() {
        let (mut clock, _) = clock_with(&[10.0, 10.0, 10.0, 10.0, 10.0]);
        clock.update(7.0);
        clock.pause();
        assert!(!clock.is_playing());
        assert_eq!(clock.delay_accumulator(), 0.0);

        clock.update(500.0);
        assert_eq!(clock.frame_number(), 0);

        clock.resume();
        clock.update(5.0);
        assert_eq!(clock.frame_number(), 0);
        clock.update(5.0);
        assert_eq!(clock.frame_number(), 1);
    }

    #[test]
    fn test_resume_keeps_accumulator() {
        let (mut clock, _) = clock_with(&[10.0, 10.0]);
        clock.update(4.0);
        clock.resume();
        assert_eq!(clock.delay_accumulator(), 4.0);
    }

    #[test]
    fn test_step_backward_wraps_and_pauses() {
        let (mut clock, rendered) = clock_with(&[10.0; 5]);
        let log = event_log(&mut clock);

        clock.step_backward();
        assert_eq!(clock.frame_number(), 4);
        assert_eq!(clock.state(), PlaybackState::Paused);
        assert_eq!(rendered.borrow().last(), Some(&4));
        assert_eq!(
            *log.borrow(),
            vec![PlaybackEvent::PlayingChanged, PlaybackEvent::FrameChanged]
        );
    }

    #[test]
    fn test_step_forward_wraps_and_resets_accumulator() {
        let (mut clock, _) = clock_with(&[10.0; 3]);
        clock.update(27.0);
        assert_eq!(clock.frame_number(), 2);

        clock.step_forward();
        assert_eq!(clock.frame_number(), 0);
        assert_eq!(clock.delay_accumulator(), 0.0);
        assert!(!clock.is_playing());
    }

    #[test]
    fn test_seek_clamps_and_pauses() {
        let (mut clock, rendered) = clock_with(&[10.0; 4]);
        clock.seek(99);
        assert_eq!(clock.frame_number(), 3);
        assert!(!clock.is_playing());
        assert_eq!(rendered.borrow().last(), Some(&3));
    }

    #[test]
    fn test_unready_clock_ignores_transport() {
        let mut clock = PlaybackClock::new();
        let log = event_log(&mut clock);

        clock.update(100.0);
        clock.step_forward();
        clock.step_backward();
        clock.seek(3);

        assert!(!clock.is_ready());
        assert_eq!(clock.frame_number(), 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_set_speed_rejects_invalid() {
        let (mut clock, _) = clock_with(&[10.0]);
        let log = event_log(&mut clock);
        assert!(clock.set_speed(0.0).is_err());
        assert_eq!(clock.speed(), 1.0);
        assert!(log.borrow().is_empty());

        clock.set_speed(0.25).unwrap();
        assert_eq!(clock.speed(), 0.25);
        assert_eq!(*log.borrow(), vec![PlaybackEvent::SpeedChanged]);
    }

    #[test]
    fn test_unready_clock_ignores_pause_resume_and_speed() {
        let mut clock = PlaybackClock::new();
        let log = event_log(&mut clock);

        clock.pause();
        clock.toggle();
        clock.resume();
        clock.set_speed(0.5).unwrap();
        assert!(clock.set_speed(-1.0).is_err());

        assert!(clock.is_playing());
        assert_eq!(clock.speed(), 1.0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_pause_and_resume_each_emit_one_event() {
        let (mut clock, _) = clock_with(&[10.0, 10.0]);
        let log = event_log(&mut clock);

        clock.pause();
        assert_eq!(*log.borrow(), vec![PlaybackEvent::PlayingChanged]);

        clock.resume();
        assert_eq!(
            *log.borrow(),
            vec![PlaybackEvent::PlayingChanged, PlaybackEvent::PlayingChanged]
        );
    }

    #[test]
    fn test_toggle() {
        let (mut clock, _) = clock_with(&[10.0]);
        clock.toggle();
        assert!(!clock.is_playing());
        clock.toggle();
        assert!(clock.is_playing());
    }

    #[test]
    fn test_group_renderers_stay_in_lockstep() {
        let (mut clock, first) = clock_with(&[10.0, 10.0, 10.0]);
        clock.update(10.0);

        let second = Rc::new(RefCell::new(Vec::new()));
        clock.attach(Recorder {
            durations: vec![10.0, 10.0, 10.0],
            rendered: second.clone(),
        });
        // A late joiner is brought to the group's current frame.
        assert_eq!(*second.borrow(), vec![1]);

        clock.update(10.0);
        assert_eq!(first.borrow().last(), Some(&2));
        assert_eq!(second.borrow().last(), Some(&2));
        assert_eq!(clock.renderer_count(), 2);
    }

    #[test]
    fn test_defaults_apply() {
        let defaults = PlaybackDefaults {
            speed: 1.5,
            tick_rate_hz: 30,
            autoplay: false,
        };
        let clock = PlaybackClock::with_defaults(&defaults);
        assert_eq!(clock.speed(), 1.5);
        assert!(!clock.is_playing());
    }

    #[test]
    fn test_status_snapshot() {
        let (mut clock, _) = clock_with(&[10.0; 3]);
        clock.update(10.0);
        let status = clock.status();
        assert_eq!(status.frame_number, 1);
        assert_eq!(status.to_string(), "2 / 3");
    }
}
