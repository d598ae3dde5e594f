//! Software RGBA drawing surface
//!
//! Every visible layer (the shared particle layer and each entity overlay) is a
//! `Surface`. Drawing calls take logical coordinates and scale them by the
//! surface's pixel density, so callers never deal with physical pixels.
//!
//! A torn-down surface keeps its dimensions but drops its pixels; every
//! drawing operation on it is a no-op.

use crate::types::{Color, LayoutBox};
use bytemuck::{Pod, Zeroable};

/// One RGBA8 pixel, straight alpha. Matches the byte order of `ImageData`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Rotation and scale shared by every sprite in a render batch.
///
/// Computing the trig once per batch instead of once per particle is the
/// whole point of batching.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpriteTransform {
    pub cos: f32,
    pub sin: f32,
    pub scale: f32,
}

impl SpriteTransform {
    pub fn new(angle: f32, scale: f32) -> Self {
        Self {
            cos: angle.cos(),
            sin: angle.sin(),
            scale: scale.max(1e-3),
        }
    }

    pub const IDENTITY: Self = Self {
        cos: 1.0,
        sin: 0.0,
        scale: 1.0,
    };
}

/// RGBA8 pixel buffer with a pixel density
pub struct Surface {
    pixels: Vec<Rgba8>,
    width: u32,
    height: u32,
    pixel_density: f32,
    live: bool,
}

impl Surface {
    /// Create a transparent surface of `width` x `height` physical pixels
    pub fn new(width: u32, height: u32, pixel_density: f32) -> Self {
        Self {
            pixels: vec![Rgba8::TRANSPARENT; (width as usize) * (height as usize)],
            width,
            height,
            pixel_density: sanitize_density(pixel_density),
            live: true,
        }
    }

    /// Create a surface backing a host layout box
    pub fn from_layout(layout: &LayoutBox) -> Self {
        let (w, h) = layout.physical_size();
        Self::new(w, h, layout.pixel_density)
    }

    /// Physical width
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Physical height
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_density(&self) -> f32 {
        self.pixel_density
    }

    pub fn logical_width(&self) -> f32 {
        self.width as f32 / self.pixel_density
    }

    pub fn logical_height(&self) -> f32 {
        self.height as f32 / self.pixel_density
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Resize the backing store. Contents are cleared. Ignored once torn down.
    pub fn resize(&mut self, width: u32, height: u32, pixel_density: f32) {
        if !self.live {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixel_density = sanitize_density(pixel_density);
        self.pixels.clear();
        self.pixels
            .resize((width as usize) * (height as usize), Rgba8::TRANSPARENT);
    }

    /// Release the pixel memory. All later operations are no-ops.
    pub fn tear_down(&mut self) {
        self.live = false;
        self.pixels = Vec::new();
    }

    /// Reset every pixel to transparent
    pub fn clear(&mut self) {
        self.pixels.fill(Rgba8::TRANSPARENT);
    }

    /// Read a physical pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if !self.live || x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    /// Overwrite a physical pixel (no blending)
    pub fn put(&mut self, x: u32, y: u32, px: Rgba8) {
        if self.live && x < self.width && y < self.height {
            let idx = (y * self.width + x) as usize;
            self.pixels[idx] = px;
        }
    }

    /// All pixels as raw RGBA bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Number of pixels with non-zero alpha
    pub fn covered_pixels(&self) -> usize {
        self.pixels.iter().filter(|p| p.a > 0).count()
    }

    /// Source-over blend `color` at physical pixel (x, y) with extra coverage
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color, coverage: f32) {
        if (x as u32) >= self.width || (y as u32) >= self.height || x < 0 || y < 0 {
            return;
        }
        let idx = (y as u32 * self.width + x as u32) as usize;
        if let Some(dst) = self.pixels.get_mut(idx) {
            blend_over(dst, color.to_array(), coverage);
        }
    }

    /// Filled anti-aliased circle in logical coordinates
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        if !self.live || radius <= 0.0 || color.a <= 0.0 {
            return;
        }
        let d = self.pixel_density;
        let (pcx, pcy, pr) = (cx * d, cy * d, radius * d);
        let x0 = (pcx - pr - 1.0).floor().max(0.0) as i32;
        let y0 = (pcy - pr - 1.0).floor().max(0.0) as i32;
        let x1 = ((pcx + pr + 1.0).ceil() as i32).min(self.width as i32 - 1);
        let y1 = ((pcy + pr + 1.0).ceil() as i32).min(self.height as i32 - 1);
        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f32 + 0.5 - pcx;
                let dy = py as f32 + 0.5 - pcy;
                let dist = (dx * dx + dy * dy).sqrt();
                let coverage = (pr - dist + 0.5).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend_pixel(px, py, color, coverage);
                }
            }
        }
    }

    /// Filled axis-aligned rectangle in logical coordinates
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        if !self.live || w <= 0.0 || h <= 0.0 || color.a <= 0.0 {
            return;
        }
        let d = self.pixel_density;
        let x0 = (x * d).round().max(0.0) as i32;
        let y0 = (y * d).round().max(0.0) as i32;
        let x1 = (((x + w) * d).round() as i32).min(self.width as i32);
        let y1 = (((y + h) * d).round() as i32).min(self.height as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend_pixel(px, py, color, 1.0);
            }
        }
    }

    /// Draw `sprite` centred at logical (cx, cy) under `xf`, multiplied by `opacity`.
    ///
    /// The sprite is expected to be rendered at this surface's pixel density;
    /// `xf.scale` is relative to the sprite's own size. Sampling is nearest
    /// neighbour through the inverse transform.
    pub fn draw_sprite(
        &mut self,
        sprite: &Surface,
        cx: f32,
        cy: f32,
        xf: &SpriteTransform,
        opacity: f32,
    ) {
        if !self.live || !sprite.live || opacity <= 0.0 || sprite.width == 0 || sprite.height == 0
        {
            return;
        }
        let d = self.pixel_density;
        let (pcx, pcy) = (cx * d, cy * d);
        let (sw, sh) = (sprite.width as f32, sprite.height as f32);
        let half_extent = 0.5 * (sw * sw + sh * sh).sqrt() * xf.scale;

        let x0 = (pcx - half_extent).floor().max(0.0) as i32;
        let y0 = (pcy - half_extent).floor().max(0.0) as i32;
        let x1 = ((pcx + half_extent).ceil() as i32).min(self.width as i32 - 1);
        let y1 = ((pcy + half_extent).ceil() as i32).min(self.height as i32 - 1);
        if x1 < x0 || y1 < y0 {
            return;
        }

        let inv_scale = 1.0 / xf.scale;
        for py in y0..=y1 {
            let dy = py as f32 + 0.5 - pcy;
            for px in x0..=x1 {
                let dx = px as f32 + 0.5 - pcx;
                let u = (dx * xf.cos + dy * xf.sin) * inv_scale + sw * 0.5;
                let v = (-dx * xf.sin + dy * xf.cos) * inv_scale + sh * 0.5;
                if u < 0.0 || v < 0.0 || u >= sw || v >= sh {
                    continue;
                }
                let src = sprite.pixels[(v as u32 * sprite.width + u as u32) as usize];
                if src.a == 0 {
                    continue;
                }
                let color = [
                    src.r as f32 / 255.0,
                    src.g as f32 / 255.0,
                    src.b as f32 / 255.0,
                    src.a as f32 / 255.0,
                ];
                let idx = (py as u32 * self.width + px as u32) as usize;
                blend_over(&mut self.pixels[idx], color, opacity);
            }
        }
    }
}

fn sanitize_density(d: f32) -> f32 {
    if d.is_finite() && d > 0.0 { d } else { 1.0 }
}

/// Straight-alpha source-over
#[inline]
fn blend_over(dst: &mut Rgba8, src: [f32; 4], coverage: f32) {
    let sa = (src[3] * coverage).clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let da = dst.a as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        *dst = Rgba8::TRANSPARENT;
        return;
    }
    let mix = |s: f32, d: u8| {
        let d = d as f32 / 255.0;
        let c = (s * sa + d * da * (1.0 - sa)) / out_a;
        (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
    };
    *dst = Rgba8 {
        r: mix(src[0], dst.r),
        g: mix(src[1], dst.g),
        b: mix(src[2], dst.b),
        a: (out_a * 255.0 + 0.5) as u8,
    };
}
