//! Flurry Overlay - per-entity looping animations
//!
//! Each visible host entity (a building row, a store tile) gets its own
//! transparent surface and a draw routine chosen by the entity's kind.
//! Draw routines are pure functions of `(surface, width, height, elapsed)`,
//! so entries can be dropped and recreated at any time without a visible
//! seam.

pub mod animator;
pub mod config;
pub mod drawers;
pub mod registry;

pub use animator::{OverlayAnimator, OverlayEntry, RefreshStats, VisibleEntity};
pub use config::OverlayConfig;
pub use drawers::{Orbit, Pulse, Sparkle, Steam};
pub use registry::{DrawerRegistry, OverlayDraw};
