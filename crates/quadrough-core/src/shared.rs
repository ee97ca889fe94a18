//! Lock-free parameter store shared between a control thread and the audio thread.
//!
//! Every control lives in its own atomic: floats as `f32` bit patterns in
//! an `AtomicU32`, toggles in an `AtomicBool`, the distortion mode as its
//! index. Writers (UI, automation, session load) call [`SharedParameters::set`]
//! from any thread; the audio thread calls [`SharedParameters::snapshot`] once
//! per block. Fields are loaded independently with relaxed ordering, so a
//! snapshot taken while several controls move may mix old and new values.
//! No lock is ever taken.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::distortion::DistortionMode;
use crate::params::{ParamId, ParameterSnapshot};

/// Atomic backing store for the eight controls.
///
/// # Example
///
/// ```rust
/// use quadrough_core::{DistortionMode, ParamId, SharedParameters};
///
/// let shared = SharedParameters::new();
/// shared.set(ParamId::Drive, 12.0);
/// shared.set_distortion_mode(DistortionMode::Mad);
///
/// let params = shared.snapshot();
/// assert_eq!(params.drive_db, 12.0);
/// assert_eq!(params.distortion_mode, DistortionMode::Mad);
/// ```
#[derive(Debug)]
pub struct SharedParameters {
    input_gain_db: AtomicU32,
    output_gain_db: AtomicU32,
    drive_db: AtomicU32,
    dry_wet_percent: AtomicU32,
    tone_db: AtomicU32,
    mid_side_enabled: AtomicBool,
    ceiling_enabled: AtomicBool,
    distortion_mode: AtomicU32,
}

impl Default for SharedParameters {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedParameters {
    /// Creates a store holding the documented defaults.
    pub fn new() -> Self {
        Self::from_snapshot(&ParameterSnapshot::default())
    }

    /// Creates a store holding `params` (sanitized).
    pub fn from_snapshot(params: &ParameterSnapshot) -> Self {
        let p = params.sanitized();
        Self {
            input_gain_db: AtomicU32::new(p.input_gain_db.to_bits()),
            output_gain_db: AtomicU32::new(p.output_gain_db.to_bits()),
            drive_db: AtomicU32::new(p.drive_db.to_bits()),
            dry_wet_percent: AtomicU32::new(p.dry_wet_percent.to_bits()),
            tone_db: AtomicU32::new(p.tone_db.to_bits()),
            mid_side_enabled: AtomicBool::new(p.mid_side_enabled),
            ceiling_enabled: AtomicBool::new(p.ceiling_enabled),
            distortion_mode: AtomicU32::new(p.distortion_mode.index() as u32),
        }
    }

    fn float_slot(&self, id: ParamId) -> Option<&AtomicU32> {
        match id {
            ParamId::In => Some(&self.input_gain_db),
            ParamId::Out => Some(&self.output_gain_db),
            ParamId::Drive => Some(&self.drive_db),
            ParamId::DryWet => Some(&self.dry_wet_percent),
            ParamId::Tone => Some(&self.tone_db),
            ParamId::MidSide | ParamId::Clipper | ParamId::DistType => None,
        }
    }

    /// Writes one control from a plain value.
    ///
    /// Floats are clamped to their range (non-finite becomes the default),
    /// toggles switch on above 0.5, unknown mode values select CLASSIC.
    pub fn set(&self, id: ParamId, value: f32) {
        match id {
            ParamId::MidSide => self.set_mid_side(value > 0.5),
            ParamId::Clipper => self.set_ceiling(value > 0.5),
            ParamId::DistType => self.set_distortion_mode(DistortionMode::from_value(value)),
            _ => {
                if let Some(slot) = self.float_slot(id) {
                    let clamped = id.descriptor().clamp(value);
                    slot.store(clamped.to_bits(), Ordering::Relaxed);
                }
            }
        }
    }

    /// Reads one control as a plain value.
    pub fn get(&self, id: ParamId) -> f32 {
        match id {
            ParamId::MidSide => f32::from(u8::from(self.mid_side_enabled.load(Ordering::Relaxed))),
            ParamId::Clipper => f32::from(u8::from(self.ceiling_enabled.load(Ordering::Relaxed))),
            ParamId::DistType => self.distortion_mode().index() as f32,
            _ => self
                .float_slot(id)
                .map_or(0.0, |slot| f32::from_bits(slot.load(Ordering::Relaxed))),
        }
    }

    /// Enables or disables mid/side routing.
    pub fn set_mid_side(&self, enabled: bool) {
        self.mid_side_enabled.store(enabled, Ordering::Relaxed);
    }

    /// Enables or disables the output ceiling.
    pub fn set_ceiling(&self, enabled: bool) {
        self.ceiling_enabled.store(enabled, Ordering::Relaxed);
    }

    /// Selects the distortion mode.
    pub fn set_distortion_mode(&self, mode: DistortionMode) {
        self.distortion_mode
            .store(mode.index() as u32, Ordering::Relaxed);
    }

    /// Current distortion mode.
    pub fn distortion_mode(&self) -> DistortionMode {
        DistortionMode::from_index(self.distortion_mode.load(Ordering::Relaxed) as usize)
    }

    /// Stores every field of `params`.
    ///
    /// Each field is written independently; a concurrent snapshot may see
    /// part of the update.
    pub fn load(&self, params: &ParameterSnapshot) {
        for id in ParamId::ALL {
            self.set(id, params.get(id));
        }
    }

    /// Reads all controls for one block.
    pub fn snapshot(&self) -> ParameterSnapshot {
        let float = |slot: &AtomicU32| f32::from_bits(slot.load(Ordering::Relaxed));
        ParameterSnapshot {
            input_gain_db: float(&self.input_gain_db),
            output_gain_db: float(&self.output_gain_db),
            drive_db: float(&self.drive_db),
            dry_wet_percent: float(&self.dry_wet_percent),
            tone_db: float(&self.tone_db),
            mid_side_enabled: self.mid_side_enabled.load(Ordering::Relaxed),
            ceiling_enabled: self.ceiling_enabled.load(Ordering::Relaxed),
            distortion_mode: self.distortion_mode(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn starts_at_defaults() {
        assert_eq!(SharedParameters::new().snapshot(), ParameterSnapshot::default());
    }

    #[test]
    fn set_clamps_floats() {
        let shared = SharedParameters::new();
        shared.set(ParamId::Drive, 40.0);
        shared.set(ParamId::Tone, -30.0);
        shared.set(ParamId::In, f32::NAN);
        assert_eq!(shared.get(ParamId::Drive), 20.0);
        assert_eq!(shared.get(ParamId::Tone), -20.0);
        assert_eq!(shared.get(ParamId::In), 0.0);
    }

    #[test]
    fn toggles_and_mode() {
        let shared = SharedParameters::new();
        shared.set(ParamId::MidSide, 1.0);
        shared.set(ParamId::Clipper, 0.2);
        shared.set(ParamId::DistType, 1.0);
        let p = shared.snapshot();
        assert!(p.mid_side_enabled);
        assert!(!p.ceiling_enabled);
        assert_eq!(p.distortion_mode, DistortionMode::Pristine);

        shared.set(ParamId::DistType, 11.0);
        assert_eq!(shared.distortion_mode(), DistortionMode::Classic);
    }

    #[test]
    fn load_round_trips_a_snapshot() {
        let params = ParameterSnapshot {
            input_gain_db: -3.0,
            output_gain_db: 6.0,
            drive_db: 9.5,
            dry_wet_percent: 40.0,
            tone_db: 5.0,
            mid_side_enabled: true,
            ceiling_enabled: true,
            distortion_mode: DistortionMode::Hard,
        };
        let shared = SharedParameters::new();
        shared.load(&params);
        assert_eq!(shared.snapshot(), params);
        assert_eq!(SharedParameters::from_snapshot(&params).snapshot(), params);
    }

    #[test]
    fn writer_thread_updates_are_visible() {
        let shared = Arc::new(SharedParameters::new());
        let writer = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for i in 0..=100 {
                    shared.set(ParamId::DryWet, i as f32);
                    shared.set(ParamId::Drive, (i % 21) as f32);
                }
            })
        };

        for _ in 0..1000 {
            let p = shared.snapshot();
            assert!((0.0..=100.0).contains(&p.dry_wet_percent));
            assert!((0.0..=20.0).contains(&p.drive_db));
        }

        writer.join().unwrap();
        assert_eq!(shared.get(ParamId::DryWet), 100.0);
        assert_eq!(shared.get(ParamId::Drive), 16.0);
    }
}
