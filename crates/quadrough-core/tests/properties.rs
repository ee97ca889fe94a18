//! Property-based tests for quadrough-core.
//!
//! Covers the dry pass-through, mid/side reconstruction, ceiling replacement,
//! level bounds of the clipping modes and finiteness of the full chain under
//! arbitrary control values.

use proptest::prelude::*;
use quadrough_core::{
    BlockPipeline, ChannelRouter, DistortionEngine, DistortionMode, ParamId, ParameterSnapshot,
    ceiling, db_to_linear, drive_gain,
};

fn any_mode() -> impl Strategy<Value = DistortionMode> {
    (0usize..4).prop_map(DistortionMode::from_index)
}

fn any_snapshot() -> impl Strategy<Value = ParameterSnapshot> {
    (
        -12.0f32..=12.0,
        -12.0f32..=12.0,
        0.0f32..=20.0,
        0.0f32..=100.0,
        -20.0f32..=20.0,
        any::<bool>(),
        any::<bool>(),
        any_mode(),
    )
        .prop_map(
            |(input, output, drive, dry_wet, tone, mid_side, ceiling, mode)| ParameterSnapshot {
                input_gain_db: input,
                output_gain_db: output,
                drive_db: drive,
                dry_wet_percent: dry_wet,
                tone_db: tone,
                mid_side_enabled: mid_side,
                ceiling_enabled: ceiling,
                distortion_mode: mode,
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// With the mix fully dry every mode returns its input bit-for-bit.
    #[test]
    fn dry_mix_passes_input_through(
        mode in any_mode(),
        drive_db in 0.0f32..=20.0,
        input in prop::collection::vec(-4.0f32..=4.0, 1..256),
    ) {
        let engine = DistortionEngine::new(mode, drive_gain(drive_db), 0.0);
        let mut block = input.clone();
        engine.process_slice(&mut block);
        prop_assert_eq!(block, input);
    }

    /// Mid/side decomposition with an untouched mid reconstructs L and R.
    #[test]
    fn mid_side_round_trip(
        mode in any_mode(),
        left in prop::collection::vec(-1.0f32..=1.0, 64),
        right in prop::collection::vec(-1.0f32..=1.0, 64),
    ) {
        let engine = DistortionEngine::new(mode, 10.0, 0.0);
        let mut router = ChannelRouter::with_capacity(64);
        let (mut l, mut r) = (left.clone(), right.clone());
        router.route(&mut [&mut l[..], &mut r[..]], &engine, true);

        for i in 0..64 {
            prop_assert!((l[i] - left[i]).abs() <= 1e-6, "L[{}] {} vs {}", i, l[i], left[i]);
            prop_assert!((r[i] - right[i]).abs() <= 1e-6, "R[{}] {} vs {}", i, r[i], right[i]);
        }
    }

    /// Over-unity samples become exactly ±gain; the rest are scaled.
    #[test]
    fn ceiling_replaces_overs(
        x in -8.0f32..=8.0,
        out_db in -12.0f32..=12.0,
    ) {
        let gain = db_to_linear(out_db);
        let y = ceiling(x, gain);
        if x > 1.0 {
            prop_assert_eq!(y, gain);
        } else if x < -1.0 {
            prop_assert_eq!(y, -gain);
        } else {
            prop_assert_eq!(y, x * gain);
        }
    }

    /// CLASSIC at full wet never leaves [-1, 1] for full-scale input.
    #[test]
    fn classic_stays_within_unity(
        x in -1.0f32..=1.0,
        drive_db in 0.0f32..=20.0,
    ) {
        let engine = DistortionEngine::new(DistortionMode::Classic, drive_gain(drive_db), 1.0);
        prop_assert!(engine.process(x).abs() <= 1.0);
    }

    /// HARD at full wet is bounded by its threshold for any input.
    #[test]
    fn hard_stays_within_threshold(
        x in -100.0f32..=100.0,
        drive_db in 0.0f32..=20.0,
    ) {
        let engine = DistortionEngine::new(DistortionMode::Hard, drive_gain(drive_db), 1.0);
        prop_assert!(engine.process(x).abs() <= 1.0);
    }

    /// Any in-range snapshot keeps the whole chain finite.
    #[test]
    fn pipeline_output_is_finite(
        params in any_snapshot(),
        left in prop::collection::vec(-1.0f32..=1.0, 256),
        right in prop::collection::vec(-1.0f32..=1.0, 256),
    ) {
        let mut pipeline = BlockPipeline::new(48000.0, 256, 2);
        let (mut l, mut r) = (left, right);
        for _ in 0..4 {
            pipeline.process(&mut [&mut l[..], &mut r[..]], &params);
        }
        prop_assert!(l.iter().chain(&r).all(|s| s.is_finite()));
    }

    /// With the mix fully dry the mode cannot change the chain's output.
    #[test]
    fn dry_chain_ignores_mode(
        mut params in any_snapshot(),
        input in prop::collection::vec(-1.0f32..=1.0, 128),
    ) {
        params.dry_wet_percent = 0.0;
        let mut reference: Option<Vec<f32>> = None;
        for mode in DistortionMode::ALL {
            params.distortion_mode = mode;
            let mut block = input.clone();
            BlockPipeline::new(44100.0, 128, 1).process(&mut [&mut block[..]], &params);
            match &reference {
                Some(expected) => prop_assert_eq!(&block, expected),
                None => reference = Some(block),
            }
        }
    }

    /// Unknown mode control values play exactly like CLASSIC.
    #[test]
    fn unknown_mode_value_is_classic(
        value in prop_oneof![-1000.0f32..-0.5, 3.5f32..1000.0],
        x in -1.0f32..=1.0,
    ) {
        let mut params = ParameterSnapshot::default();
        params.set(ParamId::DistType, value);
        prop_assert_eq!(params.distortion_mode, DistortionMode::Classic);

        let engine = DistortionEngine::from_snapshot(&params);
        let classic = DistortionEngine::new(DistortionMode::Classic, 1.0, 1.0);
        prop_assert_eq!(engine.process(x), classic.process(x));
    }
}
