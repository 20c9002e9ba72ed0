#![forbid(unsafe_code)]

//! Scalar helpers shared by the integrator and the render mapper.
//!
//! All functions are total: NaN inputs clamp to 0 instead of propagating.

/// Clamp `t` to `[0, 1]`, mapping NaN to 0.
#[inline]
#[must_use]
pub fn clamp01(t: f64) -> f64 {
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}

/// Clamp `value` to `[lo, hi]`, mapping NaN to `lo`.
#[inline]
#[must_use]
pub fn clamp_finite(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() { lo } else { value.clamp(lo, hi) }
}

/// Cubic ease-out: `1 - (1 - t)^3`, with `t` clamped to `[0, 1]`.
///
/// Fast initial rise, gentle approach to 1.
#[inline]
#[must_use]
pub fn ease_out_cubic(t: f64) -> f64 {
    let inv = 1.0 - clamp01(t);
    1.0 - inv * inv * inv
}

/// Move `current` a `factor` fraction of the way toward `target`.
#[inline]
#[must_use]
pub fn approach(current: f64, target: f64, factor: f64) -> f64 {
    current + (target - current) * factor
}
