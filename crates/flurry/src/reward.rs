//! Randomly timed interactive reward
//!
//! `Idle -> Scheduled -> Displayed -> (resolved) -> Scheduled`. Resolution is
//! either a click, which pays out and fires a burst, or expiry, which only
//! cleans up. Expiry yields while another screen holds rewards.

use crate::config::RewardConfig;
use flurry_particles::ParticleRng;
use flurry_runtime::{EngineEvent, EventBus, TimerId, TimerQueue};

/// Tags carried by the engine's timer queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineTimer {
    IntensityRecalc,
    RewardAppear,
    RewardExpire,
}

/// A reward currently on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingReward {
    pub shown_at: f64,
    pub expires_at: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RewardPhase {
    #[default]
    Idle,
    Scheduled {
        fire_at: f64,
    },
    Displayed(PendingReward),
}

/// Burst requested by a clicked reward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardBurst {
    pub count: usize,
    pub speed: f32,
}

pub struct EventTimer {
    config: RewardConfig,
    phase: RewardPhase,
    timer: Option<TimerId>,
    rng: ParticleRng,
}

impl EventTimer {
    pub fn new(config: RewardConfig, seed: u32) -> Self {
        Self {
            config,
            phase: RewardPhase::Idle,
            timer: None,
            rng: ParticleRng::new(seed),
        }
    }

    pub fn phase(&self) -> RewardPhase {
        self.phase
    }

    pub fn is_displayed(&self) -> bool {
        matches!(self.phase, RewardPhase::Displayed(_))
    }

    /// Arm the appearance timer with a delay drawn from
    /// `[min_delay, min_delay + delay_range]`
    pub fn schedule(
        &mut self,
        now: f64,
        timers: &mut TimerQueue<EngineTimer>,
        events: &mut EventBus,
    ) {
        self.cancel(timers);
        let delay = self.config.min_delay + self.rng.next_f64() * self.config.delay_range;
        self.timer = Some(timers.set_timeout(now, delay, EngineTimer::RewardAppear));
        let fire_at = now + delay;
        self.phase = RewardPhase::Scheduled { fire_at };
        events.push(EngineEvent::RewardScheduled { fire_at });
        tracing::info!(delay, fire_at, "reward scheduled");
    }

    /// The appearance timer fired
    pub fn on_appear(
        &mut self,
        now: f64,
        timers: &mut TimerQueue<EngineTimer>,
        events: &mut EventBus,
    ) {
        if !matches!(self.phase, RewardPhase::Scheduled { .. }) {
            return;
        }
        let lifetime = self.config.lifetime;
        let expires_at = now + lifetime;
        self.timer = Some(timers.set_timeout(now, lifetime, EngineTimer::RewardExpire));
        self.phase = RewardPhase::Displayed(PendingReward {
            shown_at: now,
            expires_at,
        });
        events.push(EngineEvent::RewardShown { expires_at });
        tracing::info!(expires_at, "reward shown");
    }

    /// The expiry timer fired. While `screen_held` the check is retried after
    /// `yield_retry` instead of expiring the reward.
    pub fn on_expire(
        &mut self,
        now: f64,
        screen_held: bool,
        timers: &mut TimerQueue<EngineTimer>,
        events: &mut EventBus,
    ) {
        let RewardPhase::Displayed(pending) = self.phase else {
            return;
        };
        if screen_held {
            let retry_at = now + self.config.yield_retry;
            self.timer = Some(timers.set_timeout(
                now,
                self.config.yield_retry,
                EngineTimer::RewardExpire,
            ));
            self.phase = RewardPhase::Displayed(PendingReward {
                expires_at: retry_at,
                ..pending
            });
            events.push(EngineEvent::RewardDeferred { retry_at });
            tracing::debug!(retry_at, "reward expiry deferred");
            return;
        }
        self.timer = None;
        events.push(EngineEvent::RewardExpired);
        tracing::info!("reward expired");
        self.schedule(now, timers, events);
    }

    /// The user clicked the reward. Returns the burst to fire, or `None` when
    /// no reward is on screen.
    pub fn click(
        &mut self,
        now: f64,
        timers: &mut TimerQueue<EngineTimer>,
        events: &mut EventBus,
    ) -> Option<RewardBurst> {
        if !self.is_displayed() {
            return None;
        }
        self.schedule(now, timers, events);
        Some(RewardBurst {
            count: self.config.burst_count,
            speed: self.config.burst_speed,
        })
    }

    /// Disarm any pending timer and go idle
    pub fn cancel(&mut self, timers: &mut TimerQueue<EngineTimer>) {
        if let Some(id) = self.timer.take() {
            timers.cancel(id);
        }
        self.phase = RewardPhase::Idle;
    }
}
