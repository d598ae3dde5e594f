//! Ambient and burst particle stores with their physics and recycling rules

use crate::config::ParticleConfig;
use crate::particle::{BurstStore, Particle};
use crate::rand::ParticleRng;
use crate::render::Batcher;
use crate::sprite::{SpriteCache, SpriteKey, SpriteKind};
use flurry_core::Surface;
use flurry_runtime::{FrameSystem, FrameTime};

/// Owns the ambient store (recycled forever, resized by the intensity
/// controller) and the burst store (fixed capacity, one-shot).
///
/// Only `tick` removes particles. Everything a collaborator can reach from
/// outside a frame (`spawn_burst`, `resize_ambient_to`) either appends or
/// truncates, so a burst fired from any callback is always safe.
pub struct ParticlePool {
    config: ParticleConfig,
    ambient: Vec<Particle>,
    burst: BurstStore,
    rng: ParticleRng,
    /// Logical width/height of the shared surface
    bounds: (f32, f32),
    /// Global ambient speed multiplier set by the intensity controller
    ambient_speed: f32,
    sprites: SpriteCache,
    batcher: Batcher,
}

impl ParticlePool {
    pub fn new(config: ParticleConfig, seed: u32) -> Self {
        let burst = BurstStore::new(config.burst_capacity);
        let batcher = Batcher::new(config.rotation_buckets);
        Self {
            config,
            ambient: Vec::new(),
            burst,
            rng: ParticleRng::new(seed),
            bounds: (0.0, 0.0),
            ambient_speed: 1.0,
            sprites: SpriteCache::new(),
            batcher,
        }
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    /// Pre-size the ambient store (and the draw list) so that steady-state
    /// play never reallocates.
    pub fn reserve_ambient(&mut self, max_count: usize) {
        self.ambient
            .reserve(max_count.saturating_sub(self.ambient.len()));
        self.batcher.reserve(max_count + self.burst.capacity());
    }

    /// Logical size of the area particles fall through
    pub fn set_bounds(&mut self, width: f32, height: f32) {
        self.bounds = (width.max(0.0), height.max(0.0));
    }

    pub fn bounds(&self) -> (f32, f32) {
        self.bounds
    }

    pub fn set_ambient_speed(&mut self, multiplier: f32) {
        self.ambient_speed = if multiplier.is_finite() {
            multiplier.max(0.0)
        } else {
            1.0
        };
    }

    pub fn ambient_speed(&self) -> f32 {
        self.ambient_speed
    }

    /// Fill the ambient store with `n` particles scattered over the whole
    /// visible height, so the first frame is not empty.
    pub fn seed(&mut self, n: usize) {
        self.ambient.clear();
        let (width, height) = self.bounds;
        for _ in 0..n {
            let mut p = Particle::inert();
            p.randomize(&self.config, &mut self.rng, width);
            p.y = self.rng.range(0.0, height.max(1.0));
            self.ambient.push(p);
        }
    }

    /// Move the ambient store toward `target`.
    ///
    /// Shrinking truncates immediately. Growing adds at most
    /// `max_growth_per_step` particles, spawned above the top edge, so the
    /// density ramps up over successive calls instead of popping in.
    pub fn resize_ambient_to(&mut self, target: usize) {
        let len = self.ambient.len();
        if target <= len {
            self.ambient.truncate(target);
            return;
        }
        let grow = (target - len).min(self.config.max_growth_per_step.max(1));
        let (width, height) = self.bounds;
        for _ in 0..grow {
            let mut p = Particle::inert();
            p.randomize(&self.config, &mut self.rng, width);
            p.y = -p.size - self.rng.range(0.0, height * 0.5 + self.config.margin);
            self.ambient.push(p);
        }
    }

    /// Append up to `count` burst particles falling `speed_multiplier` times
    /// faster than normal. Requests beyond the free capacity are dropped.
    /// Returns how many particles were spawned.
    pub fn spawn_burst(&mut self, count: usize, speed_multiplier: f32) -> usize {
        let speed_multiplier = if speed_multiplier.is_finite() && speed_multiplier > 0.0 {
            speed_multiplier
        } else {
            1.0
        };
        let n = count.min(self.burst.remaining());
        let (width, height) = self.bounds;
        for _ in 0..n {
            let lift = self.rng.range(0.0, height * 0.5 + self.config.margin);
            let Some(p) = self.burst.spawn() else {
                break;
            };
            p.randomize(&self.config, &mut self.rng, width);
            p.speed *= speed_multiplier;
            p.y = -p.size - lift;
        }
        n
    }

    /// Advance both stores by `dt` seconds.
    ///
    /// Ambient particles that fall past `bounds_height + margin` are recycled
    /// in place; burst particles are swap-removed.
    pub fn tick(&mut self, dt: f32, bounds_height: f32) {
        let limit = bounds_height + self.config.margin;
        let width = self.bounds.0;

        for p in self.ambient.iter_mut() {
            p.step(dt, self.ambient_speed);
            if p.y > limit {
                p.randomize(&self.config, &mut self.rng, width);
                p.y = -p.size - self.rng.range(0.0, self.config.margin);
            }
        }

        let burst_speed = self.config.burst_speed_multiplier;
        for p in self.burst.active_slice_mut() {
            p.step(dt, burst_speed);
        }
        self.burst.remove_below(limit);
    }

    /// Draw every live particle onto `surface` with the shared sprite.
    pub fn render(&mut self, surface: &mut Surface) {
        if !surface.is_live() {
            return;
        }
        let key = SpriteKey::for_density(
            SpriteKind::Chip,
            self.config.sprite_size,
            surface.pixel_density(),
        );
        let sprite = self.sprites.get_or_render(key);
        self.batcher.draw(
            surface,
            sprite,
            self.config.sprite_size,
            &self.ambient,
            self.burst.active_slice(),
        );
    }

    /// Drop cached sprites; they re-render lazily on the next frame
    pub fn clear_sprites(&mut self) {
        self.sprites.clear();
    }

    pub fn sprites(&self) -> &SpriteCache {
        &self.sprites
    }

    /// Remove every particle from both stores
    pub fn clear(&mut self) {
        self.ambient.clear();
        self.burst.clear();
    }

    pub fn ambient(&self) -> &[Particle] {
        &self.ambient
    }

    pub fn ambient_len(&self) -> usize {
        self.ambient.len()
    }

    /// Allocated ambient slots (for checking the store never reallocates)
    pub fn ambient_capacity(&self) -> usize {
        self.ambient.capacity()
    }

    pub fn burst(&self) -> &[Particle] {
        self.burst.active_slice()
    }

    pub fn burst_active(&self) -> usize {
        self.burst.active_count()
    }

    pub fn burst_capacity(&self) -> usize {
        self.burst.capacity()
    }

    /// Transform groups used by the last render
    pub fn last_batch_count(&self) -> usize {
        self.batcher.last_batch_count()
    }
}

impl FrameSystem for ParticlePool {
    fn update(&mut self, frame: &FrameTime) {
        let height = self.bounds.1;
        self.tick(frame.dt as f32, height);
    }

    fn render(&mut self, _frame: &FrameTime, surface: &mut Surface) {
        ParticlePool::render(self, surface);
    }

    fn shutdown(&mut self) {
        self.clear();
        self.clear_sprites();
    }

    fn name(&self) -> &str {
        "particles"
    }
}
