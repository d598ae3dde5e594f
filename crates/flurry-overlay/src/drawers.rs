//! Built-in overlay draw routines
//!
//! Every routine takes its phase from `elapsed` and its per-feature variation
//! from `feature_hash`, never from stored state.

use crate::registry::OverlayDraw;
use flurry_core::{feature_range, feature_unit, Color, Surface};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Phase `elapsed * speed + offset` wrapped to one turn, computed in f64 so
/// long sessions keep full precision before the narrowing cast.
#[inline]
fn phase(elapsed: f64, speed: f32, offset: f32) -> f32 {
    (elapsed * speed as f64 + offset as f64).rem_euclid(TAU) as f32
}

/// Twinkling glints scattered over the box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sparkle {
    pub count: u32,
    pub seed: u32,
    /// Twinkle angular speed (rad/s)
    pub speed: f32,
    pub max_radius: f32,
    pub color: Color,
}

impl Default for Sparkle {
    fn default() -> Self {
        Self {
            count: 6,
            seed: 0x5BA2_C1E0,
            speed: 2.5,
            max_radius: 3.0,
            color: Color::from_hex(0xFFF4C8),
        }
    }
}

impl OverlayDraw for Sparkle {
    fn draw(&self, surface: &mut Surface, width: f32, height: f32, elapsed: f64) {
        for i in 0..self.count {
            let base = i * 4;
            let x = feature_range(base, self.seed, 0.0, width);
            let y = feature_range(base + 1, self.seed, 0.0, height);
            let offset = feature_range(base + 2, self.seed, 0.0, std::f32::consts::TAU);
            let speed = self.speed * feature_range(base + 3, self.seed, 0.6, 1.4);
            let twinkle = phase(elapsed, speed, offset).sin() * 0.5 + 0.5;
            if twinkle < 0.05 {
                continue;
            }
            let r = self.max_radius * (0.4 + 0.6 * twinkle);
            surface.fill_circle(x, y, r, self.color.with_alpha(twinkle));
        }
    }
}

/// Small items circling the centre of the box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Orbit {
    pub count: u32,
    pub seed: u32,
    /// Seconds per revolution
    pub period: f32,
    /// Orbit radius as a fraction of the smaller box side
    pub radius_fraction: f32,
    pub item_radius: f32,
    pub color: Color,
}

impl Default for Orbit {
    fn default() -> Self {
        Self {
            count: 5,
            seed: 0x0AB1_7000,
            period: 6.0,
            radius_fraction: 0.35,
            item_radius: 2.5,
            color: Color::from_hex(0xC88A4A),
        }
    }
}

impl OverlayDraw for Orbit {
    fn draw(&self, surface: &mut Surface, width: f32, height: f32, elapsed: f64) {
        if self.count == 0 || self.period <= 0.0 {
            return;
        }
        let (cx, cy) = (width * 0.5, height * 0.5);
        let radius = width.min(height) * self.radius_fraction;
        let speed = std::f32::consts::TAU / self.period;
        let spacing = std::f32::consts::TAU / self.count as f32;
        for i in 0..self.count {
            let jitter = feature_range(i, self.seed, -0.2, 0.2);
            let a = phase(elapsed, speed, i as f32 * spacing + jitter);
            let r = radius * (0.85 + 0.3 * feature_unit(i + self.count, self.seed));
            surface.fill_circle(cx + a.cos() * r, cy + a.sin() * r, self.item_radius, self.color);
        }
    }
}

/// A breathing glow in the middle of the box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pulse {
    /// Seconds per breath
    pub period: f32,
    pub min_alpha: f32,
    pub max_alpha: f32,
    pub color: Color,
}

impl Default for Pulse {
    fn default() -> Self {
        Self {
            period: 2.4,
            min_alpha: 0.05,
            max_alpha: 0.3,
            color: Color::from_hex(0xFFE08A),
        }
    }
}

impl OverlayDraw for Pulse {
    fn draw(&self, surface: &mut Surface, width: f32, height: f32, elapsed: f64) {
        if self.period <= 0.0 {
            return;
        }
        let s = phase(elapsed, std::f32::consts::TAU / self.period, 0.0).sin() * 0.5 + 0.5;
        let alpha = self.min_alpha + (self.max_alpha - self.min_alpha) * s;
        let radius = width.min(height) * 0.45 * (0.9 + 0.1 * s);
        // Soft edge from three stacked discs
        for (k, scale) in [1.0f32, 0.75, 0.5].into_iter().enumerate() {
            let a = alpha * (k as f32 + 1.0) / 3.0;
            let color = self.color.with_alpha(a);
            surface.fill_circle(width * 0.5, height * 0.5, radius * scale, color);
        }
    }
}

/// Wisps rising from the bottom edge and fading out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Steam {
    pub count: u32,
    pub seed: u32,
    /// Logical pixels per second
    pub rise_speed: f32,
    pub sway: f32,
    pub color: Color,
}

impl Default for Steam {
    fn default() -> Self {
        Self {
            count: 4,
            seed: 0x57EA_0001,
            rise_speed: 14.0,
            sway: 3.0,
            color: Color::new(1.0, 1.0, 1.0, 0.35),
        }
    }
}

impl OverlayDraw for Steam {
    fn draw(&self, surface: &mut Surface, width: f32, height: f32, elapsed: f64) {
        if height <= 0.0 {
            return;
        }
        for i in 0..self.count {
            let base = i * 3;
            let x0 = feature_range(base, self.seed, width * 0.15, width * 0.85);
            let offset = feature_unit(base + 1, self.seed) as f64;
            let speed = self.rise_speed * feature_range(base + 2, self.seed, 0.7, 1.3);

            // Progress through one rise, 0 at the bottom edge, 1 at the top
            let travel = elapsed * speed as f64 / height as f64 + offset;
            let progress = travel.rem_euclid(1.0) as f32;
            let y = height * (1.0 - progress);
            let x = x0 + phase(elapsed, 1.3, offset as f32 * 6.0).sin() * self.sway;
            let alpha = self.color.a * (1.0 - progress);
            let r = 2.0 + 3.0 * progress;
            surface.fill_circle(x, y, r, self.color.with_alpha(alpha));
        }
    }
}
