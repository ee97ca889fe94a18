//! Biquad (bi-quadratic) filter structure.
//!
//! Provides a generic second-order IIR filter plus the five coefficient
//! designs the tone filter bank is built from: low-pass, high-pass, low
//! shelf, high shelf and peaking bell.
//!
//! The pass filters use the bilinear-transform design (`n = 1/tan(πf/fs)`),
//! the shelves and the bell follow the RBJ Audio EQ Cookbook. Gain
//! arguments are linear factors, not decibels.

use crate::math::{clamp_below_nyquist, hz_to_omega};
use core::f32::consts::PI;
use libm::{cosf, sinf, sqrtf, tanf};

/// Unnormalized coefficient set `(b0, b1, b2, a0, a1, a2)`.
pub type Coefficients = (f32, f32, f32, f32, f32, f32);

/// Generic biquad filter coefficients and state.
///
/// Implements the Direct Form I biquad structure:
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
///
/// Coefficients and history are independent: changing one never touches
/// the other, so a filter can be retuned every block without clicks.
#[derive(Debug, Clone)]
pub struct Biquad {
    /// Feedforward coefficients
    b0: f32,
    b1: f32,
    b2: f32,

    /// Feedback coefficients, normalized by a0
    a1: f32,
    a2: f32,

    /// Input delay line: x[n-1], x[n-2]
    x1: f32,
    x2: f32,

    /// Output delay line: y[n-1], y[n-2]
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Creates a new biquad with passthrough coefficients.
    ///
    /// Initial state: `y[n] = x[n]` (no filtering)
    pub fn new() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Sets the biquad coefficients.
    ///
    /// # Arguments
    ///
    /// * `b0, b1, b2` - Feedforward coefficients
    /// * `a0, a1, a2` - Feedback coefficients
    ///
    /// Note: This function normalizes by a0 internally and leaves the
    /// delay lines untouched.
    pub fn set_coefficients(&mut self, b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) {
        let a0_inv = 1.0 / a0;
        self.b0 = b0 * a0_inv;
        self.b1 = b1 * a0_inv;
        self.b2 = b2 * a0_inv;
        self.a1 = a1 * a0_inv;
        self.a2 = a2 * a0_inv;
    }

    /// Applies a coefficient tuple produced by one of the design functions.
    #[inline]
    pub fn apply(&mut self, coefficients: Coefficients) {
        let (b0, b1, b2, a0, a1, a2) = coefficients;
        self.set_coefficients(b0, b1, b2, a0, a1, a2);
    }

    /// Processes a single sample through the biquad filter.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Processes a slice of samples in place.
    #[inline]
    pub fn process_slice(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Clears the filter state (delay lines) without changing coefficients.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }

    /// Returns the delay-line contents `[x1, x2, y1, y2]`.
    pub fn history(&self) -> [f32; 4] {
        [self.x1, self.x2, self.y1, self.y2]
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

/// Calculates low-pass filter coefficients (bilinear design).
///
/// # Arguments
///
/// * `frequency` - Cutoff frequency in Hz, clamped below Nyquist
/// * `q` - Q factor
/// * `sample_rate` - Sample rate in Hz
pub fn lowpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> Coefficients {
    let frequency = clamp_below_nyquist(frequency, sample_rate);
    let n = 1.0 / tanf(PI * frequency / sample_rate);
    let n_squared = n * n;
    let inv_q = 1.0 / q;

    (
        1.0,
        2.0,
        1.0,
        1.0 + inv_q * n + n_squared,
        2.0 * (1.0 - n_squared),
        1.0 - inv_q * n + n_squared,
    )
}

/// Calculates high-pass filter coefficients (bilinear design).
///
/// # Arguments
///
/// * `frequency` - Cutoff frequency in Hz, clamped below Nyquist
/// * `q` - Q factor
/// * `sample_rate` - Sample rate in Hz
pub fn highpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> Coefficients {
    let frequency = clamp_below_nyquist(frequency, sample_rate);
    let n = tanf(PI * frequency / sample_rate);
    let n_squared = n * n;
    let inv_q = 1.0 / q;

    (
        1.0,
        -2.0,
        1.0,
        1.0 + inv_q * n + n_squared,
        2.0 * (n_squared - 1.0),
        1.0 - inv_q * n + n_squared,
    )
}

/// Calculates low-shelf coefficients using the RBJ cookbook formula.
///
/// # Arguments
///
/// * `frequency` - Corner frequency in Hz
/// * `q` - Shelf slope expressed as Q
/// * `gain` - Linear gain of the shelf (1.0 = flat)
/// * `sample_rate` - Sample rate in Hz
pub fn low_shelf_coefficients(frequency: f32, q: f32, gain: f32, sample_rate: f32) -> Coefficients {
    let a = sqrtf(gain.max(0.0));
    let a_minus_1 = a - 1.0;
    let a_plus_1 = a + 1.0;
    let omega = hz_to_omega(clamp_below_nyquist(frequency, sample_rate), sample_rate);
    let cos_omega = cosf(omega);
    let beta = sinf(omega) * sqrtf(a) / q;
    let a_minus_1_cos = a_minus_1 * cos_omega;

    (
        a * (a_plus_1 - a_minus_1_cos + beta),
        a * 2.0 * (a_minus_1 - a_plus_1 * cos_omega),
        a * (a_plus_1 - a_minus_1_cos - beta),
        a_plus_1 + a_minus_1_cos + beta,
        -2.0 * (a_minus_1 + a_plus_1 * cos_omega),
        a_plus_1 + a_minus_1_cos - beta,
    )
}

/// Calculates high-shelf coefficients using the RBJ cookbook formula.
///
/// # Arguments
///
/// * `frequency` - Corner frequency in Hz
/// * `q` - Shelf slope expressed as Q
/// * `gain` - Linear gain of the shelf (1.0 = flat)
/// * `sample_rate` - Sample rate in Hz
pub fn high_shelf_coefficients(frequency: f32, q: f32, gain: f32, sample_rate: f32) -> Coefficients {
    let a = sqrtf(gain.max(0.0));
    let a_minus_1 = a - 1.0;
    let a_plus_1 = a + 1.0;
    let omega = hz_to_omega(clamp_below_nyquist(frequency, sample_rate), sample_rate);
    let cos_omega = cosf(omega);
    let beta = sinf(omega) * sqrtf(a) / q;
    let a_minus_1_cos = a_minus_1 * cos_omega;

    (
        a * (a_plus_1 + a_minus_1_cos + beta),
        a * -2.0 * (a_minus_1 + a_plus_1 * cos_omega),
        a * (a_plus_1 + a_minus_1_cos - beta),
        a_plus_1 - a_minus_1_cos + beta,
        2.0 * (a_minus_1 - a_plus_1 * cos_omega),
        a_plus_1 - a_minus_1_cos - beta,
    )
}

/// Calculates peaking (bell) coefficients using the RBJ cookbook formula.
///
/// # Arguments
///
/// * `frequency` - Center frequency in Hz
/// * `q` - Q factor (bandwidth = frequency / Q)
/// * `gain` - Linear gain at the center frequency (1.0 = flat)
/// * `sample_rate` - Sample rate in Hz
pub fn peaking_coefficients(frequency: f32, q: f32, gain: f32, sample_rate: f32) -> Coefficients {
    let a = sqrtf(gain.max(0.0));
    let omega = hz_to_omega(clamp_below_nyquist(frequency, sample_rate), sample_rate);
    let alpha = sinf(omega) / (2.0 * q);
    let c2 = -2.0 * cosf(omega);

    (
        1.0 + alpha * a,
        c2,
        1.0 - alpha * a,
        1.0 + alpha / a,
        c2,
        1.0 - alpha / a,
    )
}
