//! Flurry - production-driven particle and overlay animation
//!
//! The engine renders three layers of decorative feedback for an idle game:
//! ambient falling particles whose density and speed track the production
//! rate, one-shot bursts for discrete events, and looping per-entity
//! overlays. The host supplies timestamps, layout and an [`Economy`]; the
//! engine never reads a clock or mutates game state itself.
//!
//! ```no_run
//! use flurry::{Economy, Engine, EngineConfig};
//! use flurry_core::{EconomySnapshot, LayoutBox};
//!
//! struct Game;
//! impl Economy for Game {
//!     fn snapshot(&self) -> EconomySnapshot {
//!         EconomySnapshot::new(1_250.0)
//!     }
//!     fn collect_reward(&mut self) -> f64 {
//!         0.0
//!     }
//! }
//!
//! let mut game = Game;
//! let mut engine = Engine::new(EngineConfig::default(), LayoutBox::new(800.0, 600.0, 2.0))?;
//! engine.start(0.0, &game);
//! let now = 1.0 / 60.0;
//! engine.poll_timers(now, &mut game);
//! engine.frame(now);
//! let _rgba = engine.surface().as_bytes();
//! # Ok::<(), flurry_core::FlurryError>(())
//! ```

pub mod config;
pub mod display;
pub mod economy;
pub mod engine;
pub mod reward;
pub mod scheduler;

pub use config::{EngineConfig, RewardConfig, SchedulerConfig};
pub use display::RateDisplay;
pub use economy::Economy;
pub use engine::Engine;
pub use reward::{EngineTimer, EventTimer, PendingReward, RewardBurst, RewardPhase};
pub use scheduler::AnimationScheduler;
