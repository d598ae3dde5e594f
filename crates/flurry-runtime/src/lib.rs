//! Flurry Runtime - Frame loop infrastructure
//!
//! Provides the building blocks the engine's scheduler is made of:
//! - `FrameClock`: frame-budget throttling over host timestamps
//! - `TimerQueue`: cancellable one-shot and interval timers
//! - `EngineEvent` / `EventBus`: notifications drained by the host
//! - `ScreenStack`: modal layers over normal play and who owns the screen
//! - `FrameSystem`: trait for systems ticked by the scheduler

mod clock;
mod event;
mod event_bus;
mod screen;
mod system;
mod timers;

pub use clock::{FrameClock, FrameTime};
pub use event::EngineEvent;
pub use event_bus::{EventBus, DEFAULT_EVENT_CAPACITY};
pub use screen::{LayerMode, Screen, ScreenPolicy, ScreenStack};
pub use system::FrameSystem;
pub use timers::{TimerId, TimerQueue};
