//! Registry of per-entity overlay surfaces

use crate::registry::DrawerRegistry;
use flurry_core::{EntityId, LayoutBox, Surface};
use flurry_runtime::{FrameSystem, FrameTime};
use std::collections::BTreeMap;

/// An entity the layout collaborator reports as visible
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleEntity {
    pub id: EntityId,
    /// Drawer kind looked up in the [`DrawerRegistry`]
    pub kind: String,
    pub layout: LayoutBox,
}

impl VisibleEntity {
    pub fn new(id: EntityId, kind: impl Into<String>, layout: LayoutBox) -> Self {
        Self {
            id,
            kind: kind.into(),
            layout,
        }
    }
}

/// One overlay: a transparent surface sized to the entity's box
pub struct OverlayEntry {
    pub kind: String,
    pub layout: LayoutBox,
    pub surface: Surface,
    /// Refresh generation that last saw this entity
    seen: u64,
}

/// What a `refresh` changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshStats {
    pub created: usize,
    pub resized: usize,
    pub removed: usize,
    /// Entities ignored for an empty box or an unregistered kind
    pub skipped: usize,
}

/// Keeps one overlay per visible entity and redraws them all from the shared
/// elapsed time.
///
/// Entries hold no animation state, so `refresh` may drop and recreate them
/// freely.
pub struct OverlayAnimator {
    registry: DrawerRegistry,
    entries: BTreeMap<EntityId, OverlayEntry>,
    generation: u64,
    torn_down: bool,
}

impl OverlayAnimator {
    pub fn new(registry: DrawerRegistry) -> Self {
        Self {
            registry,
            entries: BTreeMap::new(),
            generation: 0,
            torn_down: false,
        }
    }

    pub fn registry(&self) -> &DrawerRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut DrawerRegistry {
        &mut self.registry
    }

    /// Sync the registry with the currently visible entities.
    ///
    /// Creates missing entries, resizes entries whose box changed, replaces
    /// entries whose kind changed and removes entries no longer listed.
    /// Entities with an empty box or an unknown kind are treated as not
    /// visible. Call on layout changes, not every frame.
    pub fn refresh(&mut self, visible: &[VisibleEntity]) -> RefreshStats {
        let mut stats = RefreshStats::default();
        if self.torn_down {
            return stats;
        }
        self.generation += 1;
        let generation = self.generation;

        for entity in visible {
            if entity.layout.is_empty() || !self.registry.contains(&entity.kind) {
                stats.skipped += 1;
                continue;
            }
            match self.entries.get_mut(&entity.id) {
                Some(entry) if entry.kind == entity.kind => {
                    entry.seen = generation;
                    if entry.layout != entity.layout {
                        let (w, h) = entity.layout.physical_size();
                        entry.surface.resize(w, h, entity.layout.pixel_density);
                        entry.layout = entity.layout;
                        stats.resized += 1;
                    }
                }
                _ => {
                    let entry = OverlayEntry {
                        kind: entity.kind.clone(),
                        layout: entity.layout,
                        surface: Surface::from_layout(&entity.layout),
                        seen: generation,
                    };
                    if self.entries.insert(entity.id, entry).is_some() {
                        stats.removed += 1;
                    }
                    stats.created += 1;
                }
            }
        }

        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.seen == generation);
        stats.removed += before - self.entries.len();

        tracing::debug!(
            created = stats.created,
            resized = stats.resized,
            removed = stats.removed,
            skipped = stats.skipped,
            total = self.entries.len(),
            "overlays refreshed"
        );
        stats
    }

    /// Clear and redraw every overlay for `elapsed` seconds
    pub fn tick_all(&mut self, elapsed: f64) {
        if self.torn_down {
            return;
        }
        for entry in self.entries.values_mut() {
            entry.surface.clear();
            if let Some(drawer) = self.registry.get(&entry.kind) {
                drawer.draw(
                    &mut entry.surface,
                    entry.layout.width,
                    entry.layout.height,
                    elapsed,
                );
            }
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&OverlayEntry> {
        self.entries.get(&id)
    }

    pub fn surface(&self, id: EntityId) -> Option<&Surface> {
        self.entries.get(&id).map(|e| &e.surface)
    }

    /// Entries in id order
    pub fn entries(&self) -> impl Iterator<Item = (EntityId, &OverlayEntry)> {
        self.entries.iter().map(|(id, e)| (*id, e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Release every surface. Later `refresh`/`tick_all` calls do nothing.
    pub fn teardown(&mut self) {
        for entry in self.entries.values_mut() {
            entry.surface.tear_down();
        }
        self.entries.clear();
        self.torn_down = true;
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

impl FrameSystem for OverlayAnimator {
    fn update(&mut self, _frame: &FrameTime) {}

    /// Overlays draw into their own surfaces, not the shared one
    fn render(&mut self, frame: &FrameTime, _surface: &mut Surface) {
        self.tick_all(frame.elapsed);
    }

    fn shutdown(&mut self) {
        self.teardown();
    }

    fn name(&self) -> &str {
        "overlays"
    }
}
