use std::cell::RefCell;
use std::rc::Rc;

use apngkit_compositor::{Compositor, PreparedSequence};
use apngkit_playback::{FrameRenderer, PlaybackClock, PlaybackController, PlaybackEvent};
use apngkit_sequence_model::frame::{BlendOp, DisposeOp, Frame, Rect};
use apngkit_sequence_model::sequence::AnimationSequence;
use proptest::prelude::*;

/// Three 2x1 frames painting the left pixel red, green, blue in turn.
fn traffic_light(durations: [f64; 3]) -> PreparedSequence {
    let colors = [[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255]];
    let frames = colors
        .iter()
        .zip(durations)
        .map(|(&rgba, duration)| {
            Frame::solid(
                Rect::new(0, 0, 1, 1),
                rgba,
                duration,
                DisposeOp::None,
                BlendOp::Source,
            )
        })
        .collect();
    let sequence = AnimationSequence::new(2, 1, frames).unwrap();
    PreparedSequence::from_sequence(&sequence).unwrap()
}

fn left_pixel(compositor: &Rc<RefCell<Compositor>>) -> [u8; 4] {
    compositor.borrow().surface().pixel(0, 0).unwrap()
}

#[test]
fn grouped_compositors_advance_together() {
    let mut controller = PlaybackController::default();
    controller.group_clock("lights");

    let a = Rc::new(RefCell::new(Compositor::with_raster(traffic_light([
        100.0, 100.0, 100.0,
    ]))));
    let b = Rc::new(RefCell::new(Compositor::with_raster(traffic_light([
        100.0, 100.0, 100.0,
    ]))));
    let clock = controller.attach(a.clone(), Some("lights"));
    controller.attach(b.clone(), Some("lights"));

    assert_eq!(left_pixel(&a), [255, 0, 0, 255]);
    assert_eq!(left_pixel(&b), [255, 0, 0, 255]);

    controller.tick(0.0);
    controller.tick(150.0);
    assert_eq!(clock.borrow().frame_number(), 1);
    assert_eq!(left_pixel(&a), [0, 255, 0, 255]);
    assert_eq!(left_pixel(&b), [0, 255, 0, 255]);

    clock.borrow_mut().step_backward();
    clock.borrow_mut().step_backward();
    assert_eq!(clock.borrow().frame_number(), 2);
    assert_eq!(left_pixel(&a), [0, 0, 255, 255]);
    assert_eq!(a.borrow().current_frame(), b.borrow().current_frame());
}

#[test]
fn frame_counter_listener_tracks_updates() {
    let compositor = Compositor::with_raster(traffic_light([40.0, 40.0, 40.0]));
    let mut clock = PlaybackClock::new();
    let labels = Rc::new(RefCell::new(Vec::new()));
    let sink = labels.clone();
    clock.subscribe_to(PlaybackEvent::FrameChanged, move |status| {
        sink.borrow_mut().push(status.to_string())
    });

    clock.attach(compositor);
    clock.update(40.0);
    clock.update(40.0);
    clock.update(40.0);
    assert_eq!(*labels.borrow(), vec!["2 / 3", "3 / 3", "1 / 3"]);
}

#[test]
fn compositor_reports_sequence_timing() {
    let compositor = Compositor::with_raster(traffic_light([0.0, 20.0, 30.0]));
    assert_eq!(FrameRenderer::frame_count(&compositor), 3);
    assert_eq!(compositor.frame_durations(), vec![10.0, 20.0, 30.0]);
}

#[derive(Debug)]
struct Timing(Vec<f64>);

impl FrameRenderer for Timing {
    fn frame_count(&self) -> usize {
        self.0.len()
    }

    fn frame_durations(&self) -> Vec<f64> {
        self.0.clone()
    }

    fn render_frame(&mut self, _index: usize) {}
}

proptest! {
    #[test]
    fn split_updates_equal_one_summed_update(
        durations in prop::collection::vec(1u32..50, 1..12),
        deltas in prop::collection::vec(0u32..200, 1..20),
        speed_index in 0usize..5,
    ) {
        let durations: Vec<f64> = durations.into_iter().map(f64::from).collect();
        let speed = apngkit_playback::SPEED_PRESETS[speed_index];

        let mut split = PlaybackClock::new();
        split.attach(Timing(durations.clone()));
        split.set_speed(speed).unwrap();

        let mut summed = PlaybackClock::new();
        summed.attach(Timing(durations));
        summed.set_speed(speed).unwrap();

        let total: u32 = deltas.iter().sum();
        for delta in deltas {
            split.update(f64::from(delta));
        }
        summed.update(f64::from(total));

        prop_assert_eq!(split.frame_number(), summed.frame_number());
        prop_assert!(split.delay_accumulator() < split.durations()[split.frame_number()]);
    }

    #[test]
    fn paused_clock_never_moves(
        delta in 0.0f64..1.0e6,
        start in 0usize..8,
    ) {
        let mut clock = PlaybackClock::new();
        clock.attach(Timing(vec![16.0; 8]));
        clock.seek(start);
        clock.update(delta);
        prop_assert_eq!(clock.frame_number(), start);
    }
}
