//! Math helpers shared across the workspace.
//!
//! Everything here is allocation-free and `no_std`-safe; transcendental
//! functions go through `libm`.

use libm::{expf, logf, tanhf};

/// Converts decibels to linear gain (0 dB is 1.0, -6 dB is ~0.5).
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Converts linear gain to decibels. Inputs at or below zero clamp to the
/// floor of -200 dB.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Smooth tanh saturation, output in (-1, 1).
#[inline]
pub fn soft_clip(x: f32) -> f32 {
    tanhf(x)
}

/// Flushes values in the subnormal range to zero.
///
/// Subnormal floats cost 10-100x on most CPUs; decaying feedback paths
/// produce them endlessly unless flushed.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}
