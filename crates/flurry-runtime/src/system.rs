//! Frame system trait

use crate::clock::FrameTime;
use flurry_core::Surface;

/// A system driven by the animation scheduler
///
/// Systems are called in registration order on every executed frame:
/// `update` advances state (skipped while paused), then `render` draws.
/// Systems that own their own surfaces ignore the shared one.
pub trait FrameSystem {
    /// Advance simulation state by `frame.dt`
    fn update(&mut self, frame: &FrameTime);

    /// Draw the current state
    fn render(&mut self, frame: &FrameTime, surface: &mut Surface);

    /// Release anything tied to host surfaces
    fn shutdown(&mut self);

    /// Human-readable name for this system
    fn name(&self) -> &str;
}
