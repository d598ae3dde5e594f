//! Particle and intensity tuning, deserialized from the engine's TOML config

use flurry_core::FrenzyKind;
use serde::{Deserialize, Serialize};

/// Physical attributes of ambient and burst particles. Sizes and distances
/// are logical pixels, speeds are per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Fixed number of burst slots
    pub burst_capacity: usize,
    pub min_size: f32,
    pub max_size: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    /// Peak horizontal drift from wobble
    pub wobble_amplitude: f32,
    /// Peak wobble angular speed (rad/s)
    pub wobble_speed: f32,
    /// Peak rotation speed (rad/s)
    pub spin_speed: f32,
    pub min_opacity: f32,
    pub max_opacity: f32,
    /// Distance past the bottom edge before a particle recycles
    pub margin: f32,
    /// Fixed speed multiplier applied to every burst particle
    pub burst_speed_multiplier: f32,
    /// Most ambient particles added by a single resize
    pub max_growth_per_step: usize,
    /// Logical size the shared sprite is pre-rendered at
    pub sprite_size: f32,
    /// Rotation quantization used to batch sprites
    pub rotation_buckets: u16,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            burst_capacity: 200,
            min_size: 14.0,
            max_size: 32.0,
            min_speed: 40.0,
            max_speed: 110.0,
            wobble_amplitude: 12.0,
            wobble_speed: 1.5,
            spin_speed: 1.2,
            min_opacity: 0.35,
            max_opacity: 0.9,
            margin: 40.0,
            burst_speed_multiplier: 2.0,
            max_growth_per_step: 8,
            sprite_size: 32.0,
            rotation_buckets: 16,
        }
    }
}

/// Extra visual intensity while a frenzy of `kind` is active
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrenzyBoost {
    pub kind: FrenzyKind,
    pub extra_count: usize,
    pub speed_factor: f32,
}

/// Mapping from production rate to ambient density and speed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntensityConfig {
    pub base_count: usize,
    pub max_count: usize,
    /// Particles added per order of magnitude of production
    pub count_scale: f32,
    /// Speed multiplier added per order of magnitude of production
    pub speed_scale: f32,
    pub max_speed_multiplier: f32,
    /// Seconds between recalculations
    pub recalc_interval: f64,
    pub frenzy: Vec<FrenzyBoost>,
}

impl Default for IntensityConfig {
    fn default() -> Self {
        Self {
            base_count: 40,
            max_count: 160,
            count_scale: 8.0,
            speed_scale: 0.15,
            max_speed_multiplier: 3.0,
            recalc_interval: 1.0,
            frenzy: vec![
                FrenzyBoost {
                    kind: FrenzyKind::Production,
                    extra_count: 20,
                    speed_factor: 1.5,
                },
                FrenzyBoost {
                    kind: FrenzyKind::Click,
                    extra_count: 40,
                    speed_factor: 2.0,
                },
                FrenzyBoost {
                    kind: FrenzyKind::Building,
                    extra_count: 15,
                    speed_factor: 1.3,
                },
                FrenzyBoost {
                    kind: FrenzyKind::Elder,
                    extra_count: 10,
                    speed_factor: 1.0,
                },
            ],
        }
    }
}

impl IntensityConfig {
    /// Boost configured for `kind`, if any
    pub fn boost_for(&self, kind: FrenzyKind) -> Option<&FrenzyBoost> {
        self.frenzy.iter().find(|b| b.kind == kind)
    }
}
