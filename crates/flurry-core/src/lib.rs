//! Flurry Core - Foundational types for the Flurry engine
//!
//! This crate provides the core types that all other Flurry crates depend on:
//! - `EntityId` - Identifiers for host entities that carry overlays
//! - `Surface` - RGBA drawing target shared by particles and overlays
//! - `feature_hash` - Deterministic per-feature pseudo-randomness
//! - `EconomySnapshot`, `FrenzyState` - Read-only view of the game economy
//! - Error types and Result alias

mod economy;
mod error;
mod hash;
mod id;
mod surface;
mod types;

pub use economy::{EconomySnapshot, FrenzyKind, FrenzyState};
pub use error::{FlurryError, Result};
pub use hash::{feature_hash, feature_range, feature_unit};
pub use id::EntityId;
pub use surface::{Rgba8, SpriteTransform, Surface};
pub use types::{Color, LayoutBox};
