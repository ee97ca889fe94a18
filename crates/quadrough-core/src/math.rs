//! Mathematical utility functions for DSP.
//!
//! Small, allocation-free helpers shared by the filter bank, the distortion
//! engine and the output stage. All functions are `no_std` friendly.
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//!
//! # Mixing
//!
//! - [`wet_dry_mix`] - Blend a processed sample with its unprocessed source
//!
//! # Utilities
//!
//! - [`hz_to_omega`] - Frequency to angular frequency
//! - [`clamp_below_nyquist`] - Keep a corner frequency inside the valid band

use libm::{expf, logf};

/// Highest fraction of the sample rate a filter corner may sit at.
pub const NYQUIST_GUARD: f32 = 0.499;

/// Convert decibels to linear gain.
///
/// # Arguments
/// * `db` - Value in decibels
///
/// # Returns
/// Linear gain value (e.g., 0 dB → 1.0, -6 dB → 0.5, +6 dB → 2.0)
///
/// # Example
/// ```rust
/// use quadrough_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// Values at or below `1e-10` are treated as `1e-10` (-200 dB).
///
/// # Example
/// ```rust
/// use quadrough_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    // 20 * log10(linear) = 20 * ln(linear) / ln(10)
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Crossfade between dry and wet signals.
///
/// Computed as `dry * (1 - mix) + wet * mix`. With `mix == 0.0` the dry
/// sample comes back bit-for-bit whenever `wet` is finite.
///
/// # Arguments
///
/// * `dry` - Unprocessed signal
/// * `wet` - Processed signal
/// * `mix` - Blend factor in \[0.0, 1.0\]: 0.0 = all dry, 1.0 = all wet
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry * (1.0 - mix) + wet * mix
}

/// Convert frequency in Hz to angular frequency (radians/sample).
#[inline]
pub fn hz_to_omega(freq_hz: f32, sample_rate: f32) -> f32 {
    core::f32::consts::TAU * freq_hz / sample_rate
}

/// Limit a corner frequency to just below Nyquist.
///
/// The 22 kHz safety low-pass would otherwise fold past Nyquist at sample
/// rates under 44.1 kHz and produce an unstable design.
#[inline]
pub fn clamp_below_nyquist(freq_hz: f32, sample_rate: f32) -> f32 {
    freq_hz.min(sample_rate * NYQUIST_GUARD)
}
