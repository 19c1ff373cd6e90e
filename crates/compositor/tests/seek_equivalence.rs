use apngkit_compositor::{Compositor, PreparedSequence, RasterSurface, KEYFRAME_INTERVAL};
use apngkit_sequence_model::frame::{BlendOp, DisposeOp, Frame, Rect};
use apngkit_sequence_model::sequence::AnimationSequence;
use proptest::prelude::*;

const WIDTH: u32 = 6;
const HEIGHT: u32 = 5;

fn dispose_strategy() -> impl Strategy<Value = DisposeOp> {
    prop_oneof![
        Just(DisposeOp::None),
        Just(DisposeOp::Background),
        Just(DisposeOp::Previous),
    ]
}

fn blend_strategy() -> impl Strategy<Value = BlendOp> {
    prop_oneof![Just(BlendOp::Source), Just(BlendOp::Over)]
}

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (0..WIDTH, 0..HEIGHT).prop_flat_map(|(left, top)| {
        (1..=WIDTH - left, 1..=HEIGHT - top)
            .prop_map(move |(width, height)| Rect::new(left, top, width, height))
    })
}

fn frame_strategy() -> impl Strategy<Value = Frame> {
    (
        rect_strategy(),
        any::<[u8; 3]>(),
        prop_oneof![Just(0u8), Just(96u8), Just(255u8)],
        dispose_strategy(),
        blend_strategy(),
    )
        .prop_map(|(rect, [r, g, b], a, dispose, blend)| {
            Frame::solid(rect, [r, g, b, a], 40.0, dispose, blend)
        })
}

fn prepared_strategy() -> impl Strategy<Value = PreparedSequence> {
    prop::collection::vec(frame_strategy(), 1..(KEYFRAME_INTERVAL * 3 + 4)).prop_map(|frames| {
        let sequence = AnimationSequence::new(WIDTH, HEIGHT, frames).unwrap();
        PreparedSequence::from_sequence(&sequence).unwrap()
    })
}

/// Render `target` by replaying from frame 0 on a fresh compositor.
fn replay(sequence: &PreparedSequence, target: usize) -> RasterSurface {
    let mut fresh = Compositor::with_raster(sequence.clone());
    fresh.render_frame(target);
    assert_eq!(fresh.stats().keyframe_restores, 0);
    fresh.into_surface()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn seeking_matches_full_replay(
        (sequence, seeks) in prepared_strategy().prop_flat_map(|sequence| {
            let len = sequence.len();
            (Just(sequence), prop::collection::vec(0..len, 1..12))
        })
    ) {
        let mut compositor = Compositor::with_raster(sequence.clone());
        compositor.render_frame(0);
        prop_assert_eq!(compositor.surface(), &replay(&sequence, 0));

        for target in seeks {
            compositor.render_frame(target);
            prop_assert_eq!(compositor.current_frame(), Some(target));
            prop_assert_eq!(compositor.surface(), &replay(&sequence, target));
        }
    }

    #[test]
    fn rendering_twice_is_a_no_op(
        (sequence, target) in prepared_strategy().prop_flat_map(|sequence| {
            let len = sequence.len();
            (Just(sequence), 0..len)
        })
    ) {
        let mut compositor = Compositor::with_raster(sequence);
        compositor.render_frame(target);
        let surface = compositor.surface().clone();
        let stats = compositor.stats();

        compositor.render_frame(target);
        prop_assert_eq!(compositor.surface(), &surface);
        prop_assert_eq!(compositor.stats(), stats);
    }
}

#[test]
fn keyframes_are_captured_once_and_never_change() {
    let frames = (0..(KEYFRAME_INTERVAL * 2 + 3))
        .map(|i| {
            Frame::solid(
                Rect::new((i % 3) as u32, 0, 2, 2),
                [(i * 7) as u8, 40, 200, 255],
                40.0,
                if i % 2 == 0 {
                    DisposeOp::Previous
                } else {
                    DisposeOp::Background
                },
                BlendOp::Over,
            )
        })
        .collect();
    let sequence = AnimationSequence::new(WIDTH, HEIGHT, frames).unwrap();
    let prepared = PreparedSequence::from_sequence(&sequence).unwrap();
    let last = prepared.len() - 1;

    let mut compositor = Compositor::with_raster(prepared);
    compositor.render_frame(last);
    assert_eq!(compositor.keyframes().captured_count(), 3);

    let cached: Vec<_> = (0..compositor.keyframes().slot_count())
        .map(|slot| compositor.keyframes().get(slot).cloned())
        .collect();

    // Sweep across every slot boundary repeatedly, in both directions.
    for _ in 0..3 {
        for target in [0, KEYFRAME_INTERVAL, last, 1, KEYFRAME_INTERVAL * 2, 5, last] {
            compositor.render_frame(target);
        }
    }

    assert_eq!(compositor.keyframes().captured_count(), 3);
    for (slot, snapshot) in cached.iter().enumerate() {
        assert_eq!(compositor.keyframes().get(slot), snapshot.as_ref());
    }
}

#[tokio::test]
async fn async_prepared_sequence_renders_like_sync() {
    let frames = vec![
        Frame::solid(
            Rect::full(WIDTH, HEIGHT),
            [10, 20, 30, 255],
            40.0,
            DisposeOp::None,
            BlendOp::Source,
        ),
        Frame::solid(
            Rect::new(1, 1, 2, 2),
            [200, 0, 0, 96],
            40.0,
            DisposeOp::Previous,
            BlendOp::Over,
        ),
        Frame::solid(
            Rect::new(2, 2, 3, 3),
            [0, 200, 0, 255],
            40.0,
            DisposeOp::Background,
            BlendOp::Over,
        ),
    ];
    let sequence = AnimationSequence::new(WIDTH, HEIGHT, frames).unwrap();

    let mut a = Compositor::with_raster(PreparedSequence::prepare(&sequence).await.unwrap());
    let mut b = Compositor::with_raster(PreparedSequence::from_sequence(&sequence).unwrap());
    for target in [2, 0, 1, 2] {
        a.render_frame(target);
        b.render_frame(target);
        assert_eq!(a.surface(), b.surface());
    }
}
