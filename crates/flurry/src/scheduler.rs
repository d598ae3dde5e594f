//! Throttled per-refresh frame loop

use crate::config::SchedulerConfig;
use flurry_runtime::{FrameClock, FrameTime};

/// The engine's single cooperative frame callback.
///
/// The host offers every display refresh; only refreshes that clear the frame
/// budget come back as a [`FrameTime`] and do any work. Once deregistered
/// (teardown) every offer is refused.
pub struct AnimationScheduler {
    clock: FrameClock,
    registered: bool,
    /// Host time during which overlays were frozen
    frozen: f64,
    last_now: Option<f64>,
}

impl AnimationScheduler {
    pub fn new(config: &SchedulerConfig) -> Self {
        let mut clock = FrameClock::with_max_fps(config.max_fps);
        clock.max_delta = config.max_delta;
        Self {
            clock,
            registered: false,
            frozen: 0.0,
            last_now: None,
        }
    }

    pub fn register(&mut self) {
        self.registered = true;
    }

    pub fn deregister(&mut self) {
        self.registered = false;
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Offer a host refresh at `now`
    pub fn offer(&mut self, now: f64) -> Option<FrameTime> {
        if !self.registered {
            return None;
        }
        let frame = self.clock.try_tick(now);
        if frame.is_none() {
            tracing::trace!(now, "frame throttled");
        }
        frame
    }

    /// Animation time handed to the overlays for `frame`.
    ///
    /// Follows the frame's elapsed time, minus every stretch spent frozen.
    pub fn overlay_time(&mut self, frame: &FrameTime, running: bool) -> f64 {
        let gap = self.last_now.map_or(0.0, |last| (frame.now - last).max(0.0));
        self.last_now = Some(frame.now);
        if !running {
            self.frozen += gap;
        }
        (frame.elapsed - self.frozen).max(0.0)
    }

    pub fn frames_run(&self) -> u64 {
        self.clock.frames_run()
    }

    pub fn frames_skipped(&self) -> u64 {
        self.clock.frames_skipped()
    }
}
