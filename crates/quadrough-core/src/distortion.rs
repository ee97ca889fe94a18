//! Four-mode distortion engine.
//!
//! Each mode is a pure, stateless per-sample transfer function `f(x, g)`
//! where `g` is the linear drive. The engine blends it with the dry signal:
//!
//! ```text
//! y = x * (1 - w) + f(x, g) * w
//! ```
//!
//! | Mode | Transfer function | Character |
//! |------|-------------------|-----------|
//! | [`Classic`](DistortionMode::Classic) | `tanh(x·g) · tanh(4/g)` | Smooth, level-compensated |
//! | [`Pristine`](DistortionMode::Pristine) | `(u)/(1 - e^(-d·u)) + q/(1 - e^(d·q))`, `u = x·g - q` | Asymmetric, even harmonics |
//! | [`Hard`](DistortionMode::Hard) | `clamp(x·g, -1, 1)` | Flat tops, odd harmonics |
//! | [`Mad`](DistortionMode::Mad) | `(x + sin(k·x·g)) · 0.25` | Non-monotonic fold-back |

use crate::math::{db_to_linear, wet_dry_mix};
use crate::params::ParameterSnapshot;
use libm::{expf, sinf, tanhf};

/// Level compensation numerator for CLASSIC: `tanh(CLASSIC_COMPENSATION / g)`.
pub const CLASSIC_COMPENSATION: f32 = 4.0;

/// PRISTINE working point `q`.
pub const PRISTINE_Q: f32 = -0.05;

/// PRISTINE distortion character `d`.
pub const PRISTINE_D: f32 = 7.0;

/// Below this distance from the working point PRISTINE uses its limit `1/d`.
const PRISTINE_EPSILON: f32 = 1e-6;

/// HARD clipping threshold.
pub const HARD_THRESHOLD: f32 = 1.0;

/// MAD fold speed `k`.
pub const MAD_SPEED: f32 = 4.0;

/// MAD output scaling.
const MAD_SCALE: f32 = 0.25;

/// Transfer function selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DistortionMode {
    /// Level-compensated hyperbolic tangent.
    #[default]
    Classic,
    /// Asymmetric exponential soft clip.
    Pristine,
    /// Hard clip at ±1.
    Hard,
    /// Sinusoidal fold-back.
    Mad,
}

impl DistortionMode {
    /// All modes in index order.
    pub const ALL: [DistortionMode; 4] = [
        DistortionMode::Classic,
        DistortionMode::Pristine,
        DistortionMode::Hard,
        DistortionMode::Mad,
    ];

    /// Maps a mode index to a mode. Indices outside 0..=3 select CLASSIC.
    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_default()
    }

    /// Maps a raw control value to a mode.
    ///
    /// The value is rounded to the nearest index; negative, non-finite or
    /// out-of-range values select CLASSIC.
    pub fn from_value(value: f32) -> Self {
        if value.is_finite() && value >= 0.0 && value < Self::ALL.len() as f32 + 0.5 {
            Self::from_index(libm::roundf(value) as usize)
        } else {
            Self::Classic
        }
    }

    /// Parses a mode name, case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(name))
    }

    /// Index of this mode (0..=3).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Upper-case label.
    pub const fn name(self) -> &'static str {
        match self {
            DistortionMode::Classic => "CLASSIC",
            DistortionMode::Pristine => "PRISTINE",
            DistortionMode::Hard => "HARD",
            DistortionMode::Mad => "MAD",
        }
    }

    /// Evaluates this mode's transfer function.
    #[inline]
    pub fn shape(self, x: f32, drive: f32) -> f32 {
        match self {
            DistortionMode::Classic => classic(x, drive),
            DistortionMode::Pristine => pristine(x, drive),
            DistortionMode::Hard => hard(x, drive),
            DistortionMode::Mad => mad(x, drive),
        }
    }
}

/// Converts drive in dB to the linear gain fed to the transfer functions.
///
/// The floor is 0 dB, so the result is never below 1.0.
#[inline]
pub fn drive_gain(drive_db: f32) -> f32 {
    db_to_linear(drive_db.max(0.0))
}

/// CLASSIC: `tanh(x·g) · tanh(4/g)`.
#[inline]
pub fn classic(x: f32, drive: f32) -> f32 {
    tanhf(x * drive) * tanhf(CLASSIC_COMPENSATION / drive)
}

/// PRISTINE: asymmetric exponential soft clip around `q = -0.05`.
///
/// At `x·g = q` the quotient is `0/0`; its limit `1/d` is used instead.
#[inline]
pub fn pristine(x: f32, drive: f32) -> f32 {
    let u = x * drive - PRISTINE_Q;
    let quotient = if u.abs() < PRISTINE_EPSILON {
        1.0 / PRISTINE_D
    } else {
        u / (1.0 - expf(-PRISTINE_D * u))
    };
    quotient + PRISTINE_Q / (1.0 - expf(PRISTINE_D * PRISTINE_Q))
}

/// HARD: `clamp(x·g, -1, 1)`.
#[inline]
pub fn hard(x: f32, drive: f32) -> f32 {
    (x * drive).clamp(-HARD_THRESHOLD, HARD_THRESHOLD)
}

/// MAD: `(x + sin(4·x·g)) · 0.25`.
#[inline]
pub fn mad(x: f32, drive: f32) -> f32 {
    (x + sinf(MAD_SPEED * x * drive)) * MAD_SCALE
}

/// Applies one transfer function with wet/dry blending.
///
/// # Example
///
/// ```rust
/// use quadrough_core::{DistortionEngine, DistortionMode};
///
/// let engine = DistortionEngine::new(DistortionMode::Hard, 2.0, 1.0);
/// assert_eq!(engine.process(0.9), 1.0);
/// assert_eq!(engine.process(0.3), 0.6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistortionEngine {
    mode: DistortionMode,
    drive: f32,
    mix: f32,
}

impl Default for DistortionEngine {
    fn default() -> Self {
        Self::new(DistortionMode::Classic, 1.0, 1.0)
    }
}

impl DistortionEngine {
    /// Creates an engine.
    ///
    /// # Arguments
    /// * `mode` - Transfer function
    /// * `drive` - Linear drive gain, floored at 1.0
    /// * `mix` - Wet fraction, clamped to \[0, 1\]
    pub fn new(mode: DistortionMode, drive: f32, mix: f32) -> Self {
        let mut engine = Self {
            mode,
            drive: 1.0,
            mix: 1.0,
        };
        engine.set_drive(drive);
        engine.set_mix(mix);
        engine
    }

    /// Creates an engine configured from a block's parameters.
    pub fn from_snapshot(params: &ParameterSnapshot) -> Self {
        Self::new(
            params.distortion_mode,
            drive_gain(params.drive_db),
            params.dry_wet_fraction(),
        )
    }

    /// Selects the transfer function.
    pub fn set_mode(&mut self, mode: DistortionMode) {
        self.mode = mode;
    }

    /// Sets the linear drive. Values below 1.0 (or NaN) become 1.0.
    pub fn set_drive(&mut self, drive: f32) {
        self.drive = drive.max(1.0);
    }

    /// Sets the drive in dB (floored at 0 dB).
    pub fn set_drive_db(&mut self, drive_db: f32) {
        self.drive = drive_gain(drive_db);
    }

    /// Sets the wet fraction (clamped to \[0, 1\], NaN becomes fully wet).
    pub fn set_mix(&mut self, mix: f32) {
        self.mix = if mix.is_nan() { 1.0 } else { mix.clamp(0.0, 1.0) };
    }

    /// Current mode.
    pub fn mode(&self) -> DistortionMode {
        self.mode
    }

    /// Current linear drive.
    pub fn drive(&self) -> f32 {
        self.drive
    }

    /// Current wet fraction.
    pub fn mix(&self) -> f32 {
        self.mix
    }

    /// Processes one sample.
    #[inline]
    pub fn process(&self, x: f32) -> f32 {
        wet_dry_mix(x, self.mode.shape(x, self.drive), self.mix)
    }

    /// Processes a channel in place.
    pub fn process_slice(&self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }
}
