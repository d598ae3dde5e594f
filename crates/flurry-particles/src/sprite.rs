//! Pre-rendered particle sprites
//!
//! Sprites are rendered once per (kind, physical size) and reused for every
//! particle. The cache is an explicit object owned by whoever owns the
//! particle pool; call [`SpriteCache::clear`] when the pixel density changes
//! so the next frame re-renders at the new resolution.

use flurry_core::{feature_range, Color, Surface};
use std::collections::HashMap;

/// Which artwork a sprite shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    /// Round baked good with darker chips
    Chip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteKey {
    pub kind: SpriteKind,
    /// Edge length in physical pixels
    pub size_px: u16,
}

impl SpriteKey {
    /// Key for `kind` drawn at `logical_size` on a surface of `pixel_density`
    pub fn for_density(kind: SpriteKind, logical_size: f32, pixel_density: f32) -> Self {
        let px = (logical_size * pixel_density).round().clamp(1.0, u16::MAX as f32);
        Self {
            kind,
            size_px: px as u16,
        }
    }
}

const CHIP_SEED: u32 = 0x0C00_C1E5;

/// Cache of pre-rendered sprites keyed by kind and size
#[derive(Default)]
pub struct SpriteCache {
    sprites: HashMap<SpriteKey, Surface>,
    renders: usize,
}

impl SpriteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a sprite, rendering it on first use
    pub fn get_or_render(&mut self, key: SpriteKey) -> &Surface {
        let renders = &mut self.renders;
        self.sprites.entry(key).or_insert_with(|| {
            *renders += 1;
            render_sprite(key)
        })
    }

    pub fn contains(&self, key: &SpriteKey) -> bool {
        self.sprites.contains_key(key)
    }

    /// Drop every sprite (e.g. after a pixel density change)
    pub fn clear(&mut self) {
        self.sprites.clear();
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Total sprites rendered over the cache's lifetime
    pub fn renders(&self) -> usize {
        self.renders
    }
}

fn render_sprite(key: SpriteKey) -> Surface {
    let size = key.size_px as u32;
    let mut sprite = Surface::new(size, size, 1.0);
    let s = size as f32;
    let c = s * 0.5;

    match key.kind {
        SpriteKind::Chip => {
            let crust = Color::from_hex(0xB8783A);
            let dough = Color::from_hex(0xE0A85C);
            sprite.fill_circle(c, c, c - 0.5, crust);
            sprite.fill_circle(c, c, c * 0.82, crust.lerp(dough, 0.6));
            for i in 0..6 {
                let angle = feature_range(i, CHIP_SEED, 0.0, std::f32::consts::TAU);
                let dist = feature_range(i + 100, CHIP_SEED, 0.1, 0.6) * c;
                let r = feature_range(i + 200, CHIP_SEED, 0.07, 0.12) * s;
                sprite.fill_circle(
                    c + angle.cos() * dist,
                    c + angle.sin() * dist,
                    r,
                    Color::from_hex(0x4A2A14),
                );
            }
        }
    }

    sprite
}
