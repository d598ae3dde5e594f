//! Flurry Particles - pooled ambient and burst particles
//!
//! Provides the falling-particle layer of the engine:
//! - Ambient store that recycles particles in place forever
//! - Fixed-capacity burst store with swap-remove for O(1) kill
//! - Production-rate driven intensity mapping
//! - Sprite cache and rotation/scale batched software rendering

pub mod config;
pub mod intensity;
pub mod particle;
pub mod pool;
pub mod rand;
pub mod render;
pub mod sprite;

pub use config::{FrenzyBoost, IntensityConfig, ParticleConfig};
pub use intensity::{IntensityController, IntensityState};
pub use particle::{BurstStore, Particle};
pub use pool::ParticlePool;
pub use rand::ParticleRng;
pub use render::Batcher;
pub use sprite::{SpriteCache, SpriteKey, SpriteKind};
