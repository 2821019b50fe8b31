//! Vector helpers shared by the spatial, steering and integration layers.
//!
//! All vectors are single-precision `glam::Vec3`.  Every helper here is
//! total: zero-length or non-finite input yields `Vec3::ZERO`, never NaN.

pub use glam::Vec3;

/// Squared lengths at or below this are treated as zero by [`safe_normalize`].
pub const NORMALIZE_EPSILON: f32 = 1.0e-12;

/// Unit vector in the direction of `v`, or `Vec3::ZERO` for a degenerate `v`.
#[inline]
pub fn safe_normalize(v: Vec3) -> Vec3 {
    let len_sq = v.length_squared();
    if !len_sq.is_finite() || len_sq <= NORMALIZE_EPSILON {
        return Vec3::ZERO;
    }
    v * len_sq.sqrt().recip()
}

/// Rescale `v` to at most `max` length, preserving direction.
///
/// `max <= 0` (or NaN) collapses the vector to zero.
#[inline]
pub fn clamp_length_to(v: Vec3, max: f32) -> Vec3 {
    if !(max > 0.0) {
        return Vec3::ZERO;
    }
    let len_sq = v.length_squared();
    if len_sq <= max * max {
        return v;
    }
    safe_normalize(v) * max
}
