//! Engine configuration
//!
//! Every section is `#[serde(default)]`, so a config file only needs the
//! values it changes:
//!
//! ```toml
//! [intensity]
//! base_count = 30
//!
//! [scheduler]
//! max_fps = 60.0
//! ```

use flurry_core::{FlurryError, Result};
use flurry_overlay::OverlayConfig;
use flurry_particles::{IntensityConfig, ParticleConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Frame throttling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Executed frames per second at most; the frame budget is `1 / max_fps`
    pub max_fps: f64,
    /// Largest `dt` a single frame may advance by
    pub max_delta: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_fps: 30.0,
            max_delta: 0.25,
        }
    }
}

/// Timing and payoff of the random interactive reward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Shortest wait before a reward appears (seconds)
    pub min_delay: f64,
    /// Random extra wait on top of `min_delay`
    pub delay_range: f64,
    /// How long a shown reward stays clickable
    pub lifetime: f64,
    /// Retry delay while another screen holds rewards
    pub yield_retry: f64,
    pub burst_count: usize,
    pub burst_speed: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            min_delay: 300.0,
            delay_range: 600.0,
            lifetime: 13.0,
            yield_retry: 1.0,
            burst_count: 60,
            burst_speed: 2.5,
        }
    }
}

/// Top-level config file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub particles: ParticleConfig,
    #[serde(default)]
    pub intensity: IntensityConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub reward: RewardConfig,
    #[serde(default)]
    pub overlays: OverlayConfig,
}

impl EngineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        let p = &self.particles;
        let i = &self.intensity;
        let s = &self.scheduler;
        let r = &self.reward;
        let o = &self.overlays;

        if p.burst_capacity == 0 {
            return Err(FlurryError::InvalidConfig(
                "particles.burst_capacity must be at least 1".into(),
            ));
        }
        check_range("particles.min_size", p.min_size as f64, 0.0, f64::MAX)?;
        check_range("particles.min_speed", p.min_speed as f64, 0.0, f64::MAX)?;
        check_range("particles.min_opacity", p.min_opacity as f64, 0.0, 1.0)?;
        check_range("particles.max_size", p.max_size as f64, p.min_size as f64, f64::MAX)?;
        check_range("particles.max_speed", p.max_speed as f64, p.min_speed as f64, f64::MAX)?;
        check_range(
            "particles.max_opacity",
            p.max_opacity as f64,
            p.min_opacity as f64,
            1.0,
        )?;
        check_range("particles.wobble_amplitude", p.wobble_amplitude as f64, 0.0, f64::MAX)?;
        check_range("particles.wobble_speed", p.wobble_speed as f64, 0.0, f64::MAX)?;
        check_range("particles.spin_speed", p.spin_speed as f64, 0.0, f64::MAX)?;
        check_range("particles.margin", p.margin as f64, 0.0, f64::MAX)?;
        check_range(
            "particles.burst_speed_multiplier",
            p.burst_speed_multiplier as f64,
            0.0,
            f64::MAX,
        )?;
        check_range("particles.sprite_size", p.sprite_size as f64, 1e-3, f64::MAX)?;
        if p.rotation_buckets == 0 {
            return Err(FlurryError::InvalidConfig(
                "particles.rotation_buckets must be positive".into(),
            ));
        }
        if i.base_count > i.max_count {
            return Err(FlurryError::InvalidConfig(format!(
                "intensity.base_count ({}) exceeds max_count ({})",
                i.base_count, i.max_count
            )));
        }
        check_range(
            "intensity.max_speed_multiplier",
            i.max_speed_multiplier as f64,
            1.0,
            f64::MAX,
        )?;
        check_range("intensity.count_scale", i.count_scale as f64, 0.0, f64::MAX)?;
        check_range("intensity.speed_scale", i.speed_scale as f64, 0.0, f64::MAX)?;
        for boost in &i.frenzy {
            let factor = boost.speed_factor as f64;
            check_range("intensity.frenzy.speed_factor", factor, 0.0, f64::MAX)?;
        }
        check_range("intensity.recalc_interval", i.recalc_interval, 1e-3, f64::MAX)?;
        check_range("scheduler.max_fps", s.max_fps, 1e-3, f64::MAX)?;
        check_range("scheduler.max_delta", s.max_delta, 0.0, f64::MAX)?;
        check_range("reward.min_delay", r.min_delay, 0.0, f64::MAX)?;
        check_range("reward.delay_range", r.delay_range, 0.0, f64::MAX)?;
        check_range("reward.lifetime", r.lifetime, 1e-3, f64::MAX)?;
        check_range("reward.yield_retry", r.yield_retry, 1e-3, f64::MAX)?;
        check_range("overlays.sparkle.speed", o.sparkle.speed as f64, 0.0, f64::MAX)?;
        check_range("overlays.orbit.period", o.orbit.period as f64, 1e-3, f64::MAX)?;
        check_range("overlays.pulse.period", o.pulse.period as f64, 1e-3, f64::MAX)?;
        check_range("overlays.steam.rise_speed", o.steam.rise_speed as f64, 0.0, f64::MAX)?;
        Ok(())
    }
}

fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<()> {
    // NaN fails both comparisons, so test the accepted range positively
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(FlurryError::ValueOutOfRange {
            field: field.to_string(),
            min,
            max,
            value,
        })
    }
}
