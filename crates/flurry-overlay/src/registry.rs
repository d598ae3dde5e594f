//! Entity kind to draw routine mapping

use crate::config::OverlayConfig;
use flurry_core::Surface;
use std::collections::HashMap;

/// A pure overlay draw routine.
///
/// Implementations must derive every pixel from the arguments alone: any
/// animation phase comes from `elapsed`, any per-feature variation from
/// [`flurry_core::feature_hash`] with a fixed seed. The surface has already
/// been cleared; `width`/`height` are logical pixels.
pub trait OverlayDraw {
    fn draw(&self, surface: &mut Surface, width: f32, height: f32, elapsed: f64);
}

/// Draw routines keyed by entity kind
#[derive(Default)]
pub struct DrawerRegistry {
    drawers: HashMap<String, Box<dyn OverlayDraw>>,
}

impl DrawerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in drawers under their own names:
    /// `sparkle`, `orbit`, `pulse`, `steam`
    pub fn with_builtins() -> Self {
        Self::from_config(&OverlayConfig::default())
    }

    /// Built-in drawers tuned by `config`
    pub fn from_config(config: &OverlayConfig) -> Self {
        let mut registry = Self::new();
        registry.register("sparkle", Box::new(config.sparkle.clone()));
        registry.register("orbit", Box::new(config.orbit.clone()));
        registry.register("pulse", Box::new(config.pulse.clone()));
        registry.register("steam", Box::new(config.steam.clone()));
        registry
    }

    /// Register (or replace) the routine for `kind`
    pub fn register(&mut self, kind: impl Into<String>, drawer: Box<dyn OverlayDraw>) {
        self.drawers.insert(kind.into(), drawer);
    }

    pub fn get(&self, kind: &str) -> Option<&dyn OverlayDraw> {
        self.drawers.get(kind).map(|d| d.as_ref())
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.drawers.contains_key(kind)
    }

    /// Registered kinds, sorted
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.drawers.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    pub fn len(&self) -> usize {
        self.drawers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawers.is_empty()
    }
}
