//! Throttled frame clock

/// Slack allowed when comparing against the frame budget, so a 60Hz display
/// throttled to 30fps does not drop every other eligible frame to rounding.
const BUDGET_SLACK: f64 = 0.001;

/// Timing for one executed frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Host timestamp of this frame in seconds
    pub now: f64,
    /// Time since the previous executed frame, clamped to `max_delta`
    pub dt: f64,
    /// Unclamped time since the clock started; drives stateless animations
    pub elapsed: f64,
    /// Number of executed frames before this one
    pub frame: u64,
}

/// Decides which host refresh callbacks do work and how much time they cover.
///
/// Timestamps come from the host (`requestAnimationFrame` style) so the clock
/// is fully deterministic under test.
pub struct FrameClock {
    /// Minimum time between executed frames (1 / max fps)
    pub min_interval: f64,
    /// Upper bound for `dt` (avoids huge jumps after a stall)
    pub max_delta: f64,
    start: Option<f64>,
    last_tick: f64,
    frames: u64,
    skipped: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            min_interval: 1.0 / 30.0,
            max_delta: 0.25,
            start: None,
            last_tick: 0.0,
            frames: 0,
            skipped: 0,
        }
    }
}

impl FrameClock {
    /// Create a clock throttled to 30 fps
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock throttled to `fps`
    pub fn with_max_fps(fps: f64) -> Self {
        Self {
            min_interval: 1.0 / fps,
            ..Self::default()
        }
    }

    /// Offer a host refresh at `now`. Returns the frame timing when the frame
    /// budget has elapsed, or `None` when this refresh should do no work.
    ///
    /// The first offered refresh always executes with `dt == 0`.
    pub fn try_tick(&mut self, now: f64) -> Option<FrameTime> {
        let Some(start) = self.start else {
            self.start = Some(now);
            self.last_tick = now;
            self.frames = 1;
            return Some(FrameTime {
                now,
                dt: 0.0,
                elapsed: 0.0,
                frame: 0,
            });
        };

        let since_last = now - self.last_tick;
        if since_last + BUDGET_SLACK < self.min_interval {
            self.skipped += 1;
            return None;
        }

        self.last_tick = now;
        let frame = self.frames;
        self.frames += 1;
        Some(FrameTime {
            now,
            dt: since_last.clamp(0.0, self.max_delta),
            elapsed: (now - start).max(0.0),
            frame,
        })
    }

    /// Frames that actually executed
    pub fn frames_run(&self) -> u64 {
        self.frames
    }

    /// Refresh callbacks rejected by the frame budget
    pub fn frames_skipped(&self) -> u64 {
        self.skipped
    }

    /// Forget all timing; the next offered refresh starts a new timeline
    pub fn reset(&mut self) {
        self.start = None;
        self.last_tick = 0.0;
        self.frames = 0;
        self.skipped = 0;
    }
}
