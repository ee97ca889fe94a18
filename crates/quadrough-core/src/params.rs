//! Control surface and per-block parameter snapshot.
//!
//! The chain exposes eight controls. Each one is identified by a [`ParamId`]
//! and described by a [`ParamDescriptor`] carrying its stable string id,
//! range, default and unit. A [`ParameterSnapshot`] is the immutable set of
//! values the pipeline reads for exactly one block.
//!
//! | id | range | default |
//! |----|-------|---------|
//! | `IN` | -12..12 dB | 0 |
//! | `OUT` | -12..12 dB | 0 |
//! | `DRIVE` | 0..20 dB | 0 |
//! | `DRYWET` | 0..100 % | 100 |
//! | `TONE` | -20..20 dB | 0 |
//! | `MIDSIDE` | off/on | off |
//! | `CLIPPER` | off/on | off |
//! | `DISTTYPE` | 0..3 | CLASSIC |
//!
//! # Example
//!
//! ```rust
//! use quadrough_core::{DistortionMode, ParamId, ParameterSnapshot};
//!
//! let mut params = ParameterSnapshot::default();
//! params.set(ParamId::Drive, 35.0);
//! params.set(ParamId::DistType, 7.0);
//!
//! let params = params.sanitized();
//! assert_eq!(params.drive_db, 20.0);
//! assert_eq!(params.distortion_mode, DistortionMode::Classic);
//! ```

use crate::distortion::DistortionMode;
use core::fmt;

/// Identifies one control of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    /// Input gain in dB.
    In,
    /// Output gain in dB.
    Out,
    /// Drive into the waveshaper in dB.
    Drive,
    /// Wet/dry blend in percent.
    DryWet,
    /// Tone tilt in dB.
    Tone,
    /// Mid/side routing toggle.
    MidSide,
    /// Output ceiling toggle.
    Clipper,
    /// Distortion mode index.
    DistType,
}

impl ParamId {
    /// Every control, in host display order.
    pub const ALL: [ParamId; 8] = [
        ParamId::In,
        ParamId::Out,
        ParamId::Drive,
        ParamId::DryWet,
        ParamId::Tone,
        ParamId::MidSide,
        ParamId::Clipper,
        ParamId::DistType,
    ];

    /// Stable string id used by hosts and automation.
    pub const fn string_id(self) -> &'static str {
        match self {
            ParamId::In => "IN",
            ParamId::Out => "OUT",
            ParamId::Drive => "DRIVE",
            ParamId::DryWet => "DRYWET",
            ParamId::Tone => "TONE",
            ParamId::MidSide => "MIDSIDE",
            ParamId::Clipper => "CLIPPER",
            ParamId::DistType => "DISTTYPE",
        }
    }

    /// Looks up a control by its string id (case-insensitive).
    pub fn from_string_id(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.string_id().eq_ignore_ascii_case(id))
    }

    /// Position in [`ParamId::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Full metadata for this control.
    pub const fn descriptor(self) -> ParamDescriptor {
        match self {
            ParamId::In => ParamDescriptor::new(self, "Input", ParamUnit::Decibels, -12.0, 12.0, 0.0),
            ParamId::Out => {
                ParamDescriptor::new(self, "Output", ParamUnit::Decibels, -12.0, 12.0, 0.0)
            }
            ParamId::Drive => {
                ParamDescriptor::new(self, "Drive", ParamUnit::Decibels, 0.0, 20.0, 0.0)
            }
            ParamId::DryWet => {
                ParamDescriptor::new(self, "Dry/Wet", ParamUnit::Percent, 0.0, 100.0, 100.0)
            }
            ParamId::Tone => ParamDescriptor::new(self, "Tone", ParamUnit::Decibels, -20.0, 20.0, 0.0),
            ParamId::MidSide => {
                ParamDescriptor::new(self, "Mid/Side", ParamUnit::Toggle, 0.0, 1.0, 0.0)
            }
            ParamId::Clipper => {
                ParamDescriptor::new(self, "Clipper", ParamUnit::Toggle, 0.0, 1.0, 0.0)
            }
            ParamId::DistType => {
                ParamDescriptor::new(self, "Distortion Type", ParamUnit::Choice, 0.0, 3.0, 0.0)
            }
        }
    }
}

/// Unit of a control value, used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamUnit {
    /// Decibels (dB).
    Decibels,
    /// Percentage (0-100).
    Percent,
    /// Boolean switch, `> 0.5` is on.
    Toggle,
    /// Index into a fixed list of choices.
    Choice,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Decibels => " dB",
            ParamUnit::Percent => "%",
            ParamUnit::Toggle | ParamUnit::Choice => "",
        }
    }
}

/// Metadata for one control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Which control this describes.
    pub id: ParamId,
    /// Display name.
    pub name: &'static str,
    /// Unit for formatting.
    pub unit: ParamUnit,
    /// Minimum allowed value.
    pub min: f32,
    /// Maximum allowed value.
    pub max: f32,
    /// Value at session load.
    pub default: f32,
}

impl ParamDescriptor {
    const fn new(
        id: ParamId,
        name: &'static str,
        unit: ParamUnit,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            id,
            name,
            unit,
            min,
            max,
            default,
        }
    }

    /// Stable string id of the described control.
    pub const fn string_id(&self) -> &'static str {
        self.id.string_id()
    }

    /// Clamps a value to the valid range; non-finite values become the default.
    pub fn clamp(&self, value: f32) -> f32 {
        if !value.is_finite() {
            self.default
        } else if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Converts a plain value to the normalized range (0.0 to 1.0).
    pub fn normalize(&self, value: f32) -> f32 {
        (self.clamp(value) - self.min) / (self.max - self.min)
    }

    /// Converts a normalized value (0.0 to 1.0) back to the plain range.
    pub fn denormalize(&self, normalized: f32) -> f32 {
        self.clamp(self.min + normalized.clamp(0.0, 1.0) * (self.max - self.min))
    }

    /// Wraps a value for display with this control's unit.
    ///
    /// ```rust
    /// use quadrough_core::ParamId;
    ///
    /// let desc = ParamId::DistType.descriptor();
    /// assert_eq!(desc.display(2.0).to_string(), "HARD");
    /// assert_eq!(ParamId::Drive.descriptor().display(6.0).to_string(), "6.0 dB");
    /// ```
    pub fn display(&self, value: f32) -> ParamValue {
        ParamValue { desc: *self, value }
    }
}

/// A control value formatted with its unit.
#[derive(Debug, Clone, Copy)]
pub struct ParamValue {
    desc: ParamDescriptor,
    value: f32,
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.desc.unit {
            ParamUnit::Toggle => f.write_str(if self.value > 0.5 { "on" } else { "off" }),
            ParamUnit::Choice => f.write_str(DistortionMode::from_value(self.value).name()),
            ParamUnit::Decibels | ParamUnit::Percent => {
                write!(f, "{:.1}{}", self.value, self.desc.unit.suffix())
            }
        }
    }
}

/// Control values for one processing block.
///
/// Built by the host layer (or [`SharedParameters::snapshot`]) once per
/// block and never mutated while the block is processed.
///
/// [`SharedParameters::snapshot`]: crate::SharedParameters::snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSnapshot {
    /// Input gain in dB, -12..12.
    pub input_gain_db: f32,
    /// Output gain in dB, -12..12.
    pub output_gain_db: f32,
    /// Drive in dB, 0..20.
    pub drive_db: f32,
    /// Wet/dry blend in percent, 0..100.
    pub dry_wet_percent: f32,
    /// Tone tilt in dB, -20..20.
    pub tone_db: f32,
    /// Route the distortion through the mid channel only.
    pub mid_side_enabled: bool,
    /// Replace over-unity samples with the output gain.
    pub ceiling_enabled: bool,
    /// Transfer function applied by the distortion engine.
    pub distortion_mode: DistortionMode,
}

impl Default for ParameterSnapshot {
    fn default() -> Self {
        Self {
            input_gain_db: ParamId::In.descriptor().default,
            output_gain_db: ParamId::Out.descriptor().default,
            drive_db: ParamId::Drive.descriptor().default,
            dry_wet_percent: ParamId::DryWet.descriptor().default,
            tone_db: ParamId::Tone.descriptor().default,
            mid_side_enabled: false,
            ceiling_enabled: false,
            distortion_mode: DistortionMode::default(),
        }
    }
}

impl ParameterSnapshot {
    /// Returns a copy with every value forced into its documented range.
    pub fn sanitized(&self) -> Self {
        Self {
            input_gain_db: ParamId::In.descriptor().clamp(self.input_gain_db),
            output_gain_db: ParamId::Out.descriptor().clamp(self.output_gain_db),
            drive_db: ParamId::Drive.descriptor().clamp(self.drive_db),
            dry_wet_percent: ParamId::DryWet.descriptor().clamp(self.dry_wet_percent),
            tone_db: ParamId::Tone.descriptor().clamp(self.tone_db),
            ..*self
        }
    }

    /// Wet/dry blend as a fraction in \[0, 1\].
    pub fn dry_wet_fraction(&self) -> f32 {
        ParamId::DryWet.descriptor().clamp(self.dry_wet_percent) / 100.0
    }

    /// Reads a control as a plain `f32` (toggles are 0/1, mode is its index).
    pub fn get(&self, id: ParamId) -> f32 {
        match id {
            ParamId::In => self.input_gain_db,
            ParamId::Out => self.output_gain_db,
            ParamId::Drive => self.drive_db,
            ParamId::DryWet => self.dry_wet_percent,
            ParamId::Tone => self.tone_db,
            ParamId::MidSide => f32::from(u8::from(self.mid_side_enabled)),
            ParamId::Clipper => f32::from(u8::from(self.ceiling_enabled)),
            ParamId::DistType => self.distortion_mode.index() as f32,
        }
    }

    /// Writes a control from a plain `f32`.
    ///
    /// Floats are stored as given (see [`sanitized`](Self::sanitized));
    /// toggles switch on above 0.5; an unknown mode index selects CLASSIC.
    pub fn set(&mut self, id: ParamId, value: f32) {
        match id {
            ParamId::In => self.input_gain_db = value,
            ParamId::Out => self.output_gain_db = value,
            ParamId::Drive => self.drive_db = value,
            ParamId::DryWet => self.dry_wet_percent = value,
            ParamId::Tone => self.tone_db = value,
            ParamId::MidSide => self.mid_side_enabled = value > 0.5,
            ParamId::Clipper => self.ceiling_enabled = value > 0.5,
            ParamId::DistType => self.distortion_mode = DistortionMode::from_value(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_control_surface() {
        let p = ParameterSnapshot::default();
        assert_eq!(p.input_gain_db, 0.0);
        assert_eq!(p.output_gain_db, 0.0);
        assert_eq!(p.drive_db, 0.0);
        assert_eq!(p.dry_wet_percent, 100.0);
        assert_eq!(p.tone_db, 0.0);
        assert!(!p.mid_side_enabled);
        assert!(!p.ceiling_enabled);
        assert_eq!(p.distortion_mode, DistortionMode::Classic);
    }

    #[test]
    fn sanitized_clamps_every_float() {
        let p = ParameterSnapshot {
            input_gain_db: -40.0,
            output_gain_db: 40.0,
            drive_db: -3.0,
            dry_wet_percent: 250.0,
            tone_db: f32::NAN,
            ..ParameterSnapshot::default()
        }
        .sanitized();

        assert_eq!(p.input_gain_db, -12.0);
        assert_eq!(p.output_gain_db, 12.0);
        assert_eq!(p.drive_db, 0.0);
        assert_eq!(p.dry_wet_percent, 100.0);
        assert_eq!(p.tone_db, 0.0);
    }

    #[test]
    fn sanitized_keeps_in_range_values() {
        let p = ParameterSnapshot {
            input_gain_db: 3.5,
            output_gain_db: -7.0,
            drive_db: 12.0,
            dry_wet_percent: 42.0,
            tone_db: -15.0,
            mid_side_enabled: true,
            ceiling_enabled: true,
            distortion_mode: DistortionMode::Mad,
        };
        assert_eq!(p.sanitized(), p);
    }

    #[test]
    fn get_set_roundtrip_for_every_control() {
        let mut p = ParameterSnapshot::default();
        let values = [3.0, -2.0, 9.0, 55.0, 4.0, 1.0, 1.0, 2.0];
        for (id, value) in ParamId::ALL.into_iter().zip(values) {
            p.set(id, value);
            assert_eq!(p.get(id), value, "{id:?}");
        }
    }

    #[test]
    fn unknown_mode_index_selects_classic() {
        let mut p = ParameterSnapshot {
            distortion_mode: DistortionMode::Hard,
            ..ParameterSnapshot::default()
        };
        p.set(ParamId::DistType, 9.0);
        assert_eq!(p.distortion_mode, DistortionMode::Classic);
    }

    #[test]
    fn string_ids_are_unique_and_resolvable() {
        for id in ParamId::ALL {
            assert_eq!(ParamId::from_string_id(id.string_id()), Some(id));
            assert_eq!(id.descriptor().id, id);
            assert_eq!(ParamId::ALL[id.index()], id);
        }
        assert_eq!(ParamId::from_string_id("drywet"), Some(ParamId::DryWet));
        assert_eq!(ParamId::from_string_id("RATE"), None);
    }

    #[test]
    fn descriptor_defaults_lie_in_range() {
        for id in ParamId::ALL {
            let d = id.descriptor();
            assert!(d.min <= d.default && d.default <= d.max, "{id:?}");
        }
    }

    #[test]
    fn normalize_roundtrip() {
        let d = ParamId::Tone.descriptor();
        assert_eq!(d.normalize(-20.0), 0.0);
        assert_eq!(d.normalize(0.0), 0.5);
        assert_eq!(d.normalize(20.0), 1.0);
        assert_eq!(d.denormalize(0.75), 10.0);
        assert_eq!(d.denormalize(3.0), 20.0);
    }

    #[test]
    fn dry_wet_fraction() {
        let p = ParameterSnapshot {
            dry_wet_percent: 25.0,
            ..ParameterSnapshot::default()
        };
        assert_eq!(p.dry_wet_fraction(), 0.25);
    }

    #[cfg(feature = "std")]
    #[test]
    fn display_formats_units() {
        assert_eq!(ParamId::DryWet.descriptor().display(50.0).to_string(), "50.0%");
        assert_eq!(ParamId::Tone.descriptor().display(-3.5).to_string(), "-3.5 dB");
        assert_eq!(ParamId::MidSide.descriptor().display(1.0).to_string(), "on");
        assert_eq!(ParamId::Clipper.descriptor().display(0.0).to_string(), "off");
        assert_eq!(ParamId::DistType.descriptor().display(3.0).to_string(), "MAD");
    }
}
