//! Common value types

use serde::{Deserialize, Serialize};

/// RGBA color, straight (non-premultiplied) alpha
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
            a: 1.0,
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Channel-wise blend toward `other`; `t` is not clamped
    pub fn lerp(self, other: Color, t: f32) -> Self {
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Quantize to 8-bit channels, clamping out-of-range values
    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Size of an entity's layout box as reported by the host
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutBox {
    /// Logical (CSS) width
    pub width: f32,
    /// Logical (CSS) height
    pub height: f32,
    /// Physical pixels per logical pixel
    pub pixel_density: f32,
}

impl LayoutBox {
    pub fn new(width: f32, height: f32, pixel_density: f32) -> Self {
        Self {
            width,
            height,
            pixel_density,
        }
    }

    /// True when the box has no drawable area (or garbage dimensions)
    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.pixel_density.is_finite())
            || self.width < 1.0
            || self.height < 1.0
            || self.pixel_density <= 0.0
    }

    /// Backing store size in physical pixels
    pub fn physical_size(&self) -> (u32, u32) {
        (
            (self.width * self.pixel_density).round() as u32,
            (self.height * self.pixel_density).round() as u32,
        )
    }
}
