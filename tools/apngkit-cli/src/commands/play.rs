//! Headless real-time playback driven by a tokio interval.

use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use apngkit_common::clock::{MonotonicTimestamps, RateController};
use apngkit_common::config::PlaybackDefaults;
use apngkit_playback::{speed_label, validate_speed, PlaybackController, PlaybackEvent};
use tokio::time::MissedTickBehavior;

use super::open_compositor;

/// Status lines printed per second while playing.
const STATUS_HZ: u32 = 4;

pub struct PlayOptions {
    pub speed: Option<f64>,
    pub seconds: f64,
    pub fps: Option<u32>,
    pub output: Option<PathBuf>,
}

pub async fn run(
    path: PathBuf,
    options: PlayOptions,
    defaults: PlaybackDefaults,
) -> anyhow::Result<()> {
    if !options.seconds.is_finite() || options.seconds < 0.0 {
        anyhow::bail!("--seconds must be a non-negative number");
    }

    let mut defaults = defaults;
    if let Some(speed) = options.speed {
        defaults.speed = validate_speed(speed)?;
    }
    if let Some(fps) = options.fps {
        defaults.tick_rate_hz = fps.max(1);
    }

    let compositor = Rc::new(RefCell::new(open_compositor(&path).await?));
    let mut controller = PlaybackController::new(defaults.clone());
    let clock = controller.attach(compositor.clone(), None);

    let frame_changes = Rc::new(Cell::new(0u64));
    {
        let frame_changes = frame_changes.clone();
        clock
            .borrow_mut()
            .subscribe_to(PlaybackEvent::FrameChanged, move |status| {
                frame_changes.set(frame_changes.get() + 1);
                tracing::trace!(frame = %status, "Frame changed");
            });
    }
    if !clock.borrow().is_playing() {
        clock.borrow_mut().resume();
    }

    println!(
        "Playing {} at {} for {:.1}s ({} Hz ticks, Ctrl+C to stop)",
        path.display(),
        speed_label(defaults.speed),
        options.seconds,
        defaults.tick_rate_hz
    );

    let mut interval = tokio::time::interval(Duration::from_secs_f64(
        1.0 / f64::from(defaults.tick_rate_hz.max(1)),
    ));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let timestamps = MonotonicTimestamps::start();
    let mut status_rate = RateController::new(STATUS_HZ);
    let deadline_ms = options.seconds * 1000.0;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now = timestamps.now_ms();
                controller.tick(now);
                if status_rate.should_tick(now) {
                    tracing::info!(status = %clock.borrow().status(), "Playing");
                }
                if now >= deadline_ms {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                println!();
                break;
            }
        }
    }

    let status = clock.borrow().status();
    let stats = compositor.borrow().stats();
    println!("Stopped at frame {status}");
    println!("  Frame changes: {}", frame_changes.get());
    println!("  Frames applied: {}", stats.frames_applied);
    println!("  Keyframe restores: {}", stats.keyframe_restores);
    println!("  Full resets: {}", stats.full_resets);
    println!("  Keyframes captured: {}", stats.keyframes_captured);

    if let Some(output) = options.output {
        compositor.borrow().surface().save(&output)?;
        println!("Saved final frame to {}", output.display());
    }
    Ok(())
}
