//! Deterministic per-feature pseudo-randomness
//!
//! Overlay draw routines must reproduce the same pixels for the same inputs,
//! so anything that looks random (where a glint sits, how fast a wisp rises)
//! is derived from a stable feature index and a fixed seed instead of an RNG.
//! None of these functions touch global state.

/// Hash a feature index with a seed into a well-mixed 32-bit value.
///
/// This is a pure function: identical `(index, seed)` pairs always produce
/// identical output on every platform.
#[inline]
pub fn feature_hash(index: u32, seed: u32) -> u32 {
    let mut x = index.wrapping_mul(0x9E37_79B9) ^ seed.wrapping_mul(0x85EB_CA6B);
    x ^= x >> 16;
    x = x.wrapping_mul(0x7FEB_352D);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846C_A68B);
    x ^= x >> 16;
    x
}

/// Hash to a float in [0, 1)
#[inline]
pub fn feature_unit(index: u32, seed: u32) -> f32 {
    (feature_hash(index, seed) >> 8) as f32 * (1.0 / 16_777_216.0)
}

/// Hash to a float in [min, max)
#[inline]
pub fn feature_range(index: u32, seed: u32, min: f32, max: f32) -> f32 {
    min + feature_unit(index, seed) * (max - min)
}
