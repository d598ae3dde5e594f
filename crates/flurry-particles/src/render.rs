//! Batched sprite rendering for both particle stores
//!
//! Particles are grouped by quantized rotation and scale so that each group
//! shares one [`SpriteTransform`]. The draw list is a scratch buffer reused
//! across frames; once it has grown to the peak particle count, rendering
//! does not allocate.

use crate::particle::Particle;
use flurry_core::{SpriteTransform, Surface};
use std::f32::consts::TAU;

/// Scale steps per unit of sprite scale
const SCALE_STEPS: f32 = 8.0;

#[derive(Clone, Copy)]
struct DrawItem {
    key: u32,
    burst: bool,
    index: u32,
}

/// Reusable draw-list builder
pub struct Batcher {
    items: Vec<DrawItem>,
    rotation_buckets: u16,
    last_batches: usize,
}

impl Batcher {
    pub fn new(rotation_buckets: u16) -> Self {
        Self {
            items: Vec::new(),
            rotation_buckets: rotation_buckets.max(1),
            last_batches: 0,
        }
    }

    /// Reserve room for `n` draw items up front
    pub fn reserve(&mut self, n: usize) {
        self.items.reserve(n.saturating_sub(self.items.len()));
    }

    /// Transform groups issued by the last `draw`
    pub fn last_batch_count(&self) -> usize {
        self.last_batches
    }

    fn key(&self, angle: f32, scale: f32) -> u32 {
        let buckets = self.rotation_buckets as u32;
        let rot = ((angle.rem_euclid(TAU) / TAU) * buckets as f32) as u32 % buckets;
        let scale = (scale * SCALE_STEPS).round().clamp(1.0, u16::MAX as f32) as u32;
        (scale << 16) | rot
    }

    fn transform(&self, key: u32) -> SpriteTransform {
        let rot = (key & 0xFFFF) as f32;
        let scale = (key >> 16) as f32 / SCALE_STEPS;
        SpriteTransform::new(rot / self.rotation_buckets as f32 * TAU, scale)
    }

    /// Draw every particle of both stores with `sprite`, whose logical edge
    /// length is `sprite_size`.
    pub fn draw(
        &mut self,
        surface: &mut Surface,
        sprite: &Surface,
        sprite_size: f32,
        ambient: &[Particle],
        burst: &[Particle],
    ) {
        self.items.clear();
        self.last_batches = 0;
        if !surface.is_live() || sprite_size <= 0.0 {
            return;
        }

        for (i, p) in ambient.iter().enumerate() {
            let key = self.key(p.angle, p.size / sprite_size);
            self.items.push(DrawItem {
                key,
                burst: false,
                index: i as u32,
            });
        }
        for (i, p) in burst.iter().enumerate() {
            let key = self.key(p.angle, p.size / sprite_size);
            self.items.push(DrawItem {
                key,
                burst: true,
                index: i as u32,
            });
        }
        self.items.sort_unstable_by_key(|item| item.key);

        let mut current: Option<(u32, SpriteTransform)> = None;
        for item in &self.items {
            let xf = match current {
                Some((key, xf)) if key == item.key => xf,
                _ => {
                    let xf = self.transform(item.key);
                    current = Some((item.key, xf));
                    self.last_batches += 1;
                    xf
                }
            };
            let p = if item.burst {
                &burst[item.index as usize]
            } else {
                &ambient[item.index as usize]
            };
            surface.draw_sprite(sprite, p.x, p.y, &xf, p.opacity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flurry_core::Color;

    fn dot_sprite() -> Surface {
        let mut s = Surface::new(4, 4, 1.0);
        s.fill_rect(0.0, 0.0, 4.0, 4.0, Color::WHITE);
        s
    }

    fn particle(x: f32, y: f32, angle: f32, size: f32) -> Particle {
        Particle {
            x,
            y,
            angle,
            size,
            opacity: 1.0,
            ..Particle::inert()
        }
    }

    #[test]
    fn groups_by_rotation_and_scale() {
        let mut batcher = Batcher::new(16);
        let mut surface = Surface::new(64, 64, 1.0);
        let ambient = [
            particle(10.0, 10.0, 0.0, 4.0),
            particle(30.0, 10.0, 0.01, 4.0),
            particle(50.0, 10.0, 3.0, 4.0),
        ];
        let burst = [particle(10.0, 40.0, 0.0, 8.0)];
        batcher.draw(&mut surface, &dot_sprite(), 4.0, &ambient, &burst);
        // (rot 0, scale 1) x2, (rot 7, scale 1), (rot 0, scale 2)
        assert_eq!(batcher.last_batch_count(), 3);
        assert!(surface.covered_pixels() > 0);
    }

    #[test]
    fn draws_nothing_on_dead_surface() {
        let mut batcher = Batcher::new(16);
        let mut surface = Surface::new(16, 16, 1.0);
        surface.tear_down();
        batcher.draw(
            &mut surface,
            &dot_sprite(),
            4.0,
            &[particle(8.0, 8.0, 0.0, 4.0)],
            &[],
        );
        assert_eq!(batcher.last_batch_count(), 0);
    }

    #[test]
    fn scratch_capacity_is_reused() {
        let mut batcher = Batcher::new(8);
        let mut surface = Surface::new(32, 32, 1.0);
        let ambient: Vec<Particle> = (0..20)
            .map(|i| particle(i as f32, 5.0, i as f32 * 0.3, 4.0))
            .collect();
        batcher.draw(&mut surface, &dot_sprite(), 4.0, &ambient, &[]);
        let cap = batcher.items.capacity();
        for _ in 0..10 {
            batcher.draw(&mut surface, &dot_sprite(), 4.0, &ambient, &[]);
        }
        assert_eq!(batcher.items.capacity(), cap);
    }

    #[test]
    fn key_roundtrips_to_bucket_transform() {
        let batcher = Batcher::new(4);
        let key = batcher.key(std::f32::consts::PI, 1.5);
        let xf = batcher.transform(key);
        assert!((xf.cos + 1.0).abs() < 1e-5);
        assert!((xf.scale - 1.5).abs() < 1e-6);
    }
}
