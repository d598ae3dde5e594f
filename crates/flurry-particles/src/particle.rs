//! Particle state and the fixed-capacity burst store

use crate::config::ParticleConfig;
use crate::rand::ParticleRng;
use std::f32::consts::TAU;

/// One falling particle. Identity is its slot; it is mutated in place.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    /// Rendered edge length (logical pixels)
    pub size: f32,
    /// Fall speed before any global multiplier
    pub speed: f32,
    pub wobble_amplitude: f32,
    pub wobble_speed: f32,
    pub wobble_phase: f32,
    pub angle: f32,
    pub spin: f32,
    pub opacity: f32,
}

impl Particle {
    /// An inert slot
    pub fn inert() -> Self {
        Self::default()
    }

    /// Give the particle fresh random attributes. `y` is left to the caller.
    pub fn randomize(&mut self, config: &ParticleConfig, rng: &mut ParticleRng, width: f32) {
        self.x = rng.range(0.0, width.max(1.0));
        self.size = rng.range(config.min_size, config.max_size);
        self.speed = rng.range(config.min_speed, config.max_speed);
        self.wobble_amplitude = rng.range(0.0, config.wobble_amplitude);
        self.wobble_speed = rng.range(0.2, 1.0) * config.wobble_speed;
        self.wobble_phase = rng.range(0.0, TAU);
        self.angle = rng.range(0.0, TAU);
        self.spin = rng.signed(config.spin_speed);
        self.opacity = rng.range(config.min_opacity, config.max_opacity);
    }

    /// Advance physics by `dt` seconds with a global speed multiplier
    #[inline]
    pub fn step(&mut self, dt: f32, speed_multiplier: f32) {
        self.y += self.speed * dt * speed_multiplier;
        self.wobble_phase = (self.wobble_phase + self.wobble_speed * dt).rem_euclid(TAU);
        self.x += self.wobble_phase.sin() * self.wobble_amplitude * dt;
        self.angle = (self.angle + self.spin * dt).rem_euclid(TAU);
    }
}

/// Fixed-capacity store with swap-remove for O(1) kill.
///
/// Slots `[0, active)` are live; the rest are scratch. Order of live
/// particles is not preserved across removals.
pub struct BurstStore {
    slots: Vec<Particle>,
    active: usize,
}

impl BurstStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Particle::inert(); capacity],
            active: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.active
    }

    /// Free slots left
    pub fn remaining(&self) -> usize {
        self.slots.len() - self.active
    }

    /// Claim the next slot, returning a mutable ref to initialize it.
    /// Returns None if the store is full.
    pub fn spawn(&mut self) -> Option<&mut Particle> {
        if self.active >= self.slots.len() {
            return None;
        }
        let idx = self.active;
        self.active += 1;
        Some(&mut self.slots[idx])
    }

    /// Kill the particle in slot `i` by swapping the last live one into it.
    pub fn remove(&mut self, i: usize) {
        if i >= self.active {
            return;
        }
        self.active -= 1;
        self.slots.swap(i, self.active);
    }

    /// Kill every live particle below `limit`.
    pub fn remove_below(&mut self, limit: f32) {
        let mut i = 0;
        while i < self.active {
            if self.slots[i].y > limit {
                self.remove(i);
                // Re-check slot i, it now holds the swapped-in particle
            } else {
                i += 1;
            }
        }
    }

    pub fn clear(&mut self) {
        self.active = 0;
    }

    /// Live particles
    pub fn active_slice(&self) -> &[Particle] {
        &self.slots[..self.active]
    }

    /// Live particles, mutably
    pub fn active_slice_mut(&mut self) -> &mut [Particle] {
        &mut self.slots[..self.active]
    }
}
