//! Notifications the engine reports to its host

/// Engine-side happenings the host UI may want to react to
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A timed reward was armed to appear at `fire_at`
    RewardScheduled { fire_at: f64 },
    /// The reward is now on screen until `expires_at`
    RewardShown { expires_at: f64 },
    /// Expiry was due but a modal owns the screen; retried at `retry_at`
    RewardDeferred { retry_at: f64 },
    /// The player collected the reward and the economy paid out `amount`
    RewardCollected { amount: f64 },
    /// The reward timed out without being collected
    RewardExpired,
    /// Ambient intensity was recalculated
    IntensityChanged {
        target_count: usize,
        speed_multiplier: f32,
    },
}
