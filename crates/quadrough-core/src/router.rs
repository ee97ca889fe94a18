//! Joint or mid/side dispatch into the distortion engine.
//!
//! In joint mode every channel goes through the engine independently. With
//! mid/side enabled on a stereo block the engine only sees the mid signal;
//! the side signal passes through so the stereo width cues stay clean.
//!
//! ```text
//! mid  = (L + R) * 0.5        L' = mid' + side
//! side = (L - R) * 0.5        R' = mid' - side
//! ```

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::distortion::DistortionEngine;

/// How a block was routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routing {
    /// Every channel distorted independently.
    Joint,
    /// Only the mid signal of a stereo pair distorted.
    MidSide,
}

impl Routing {
    /// Picks the routing for a block. Mid/side needs exactly two channels.
    pub fn select(mid_side_enabled: bool, num_channels: usize) -> Self {
        if mid_side_enabled && num_channels == 2 {
            Routing::MidSide
        } else {
            Routing::Joint
        }
    }
}

/// Owns the mid/side scratch buffers.
///
/// Scratch is sized once in [`prepare`](Self::prepare); longer blocks are
/// handled in scratch-sized chunks, so routing never allocates.
#[derive(Debug, Clone)]
pub struct ChannelRouter {
    mid: Vec<f32>,
    side: Vec<f32>,
}

impl Default for ChannelRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelRouter {
    /// Scratch length used until [`prepare`](Self::prepare) is called.
    pub const DEFAULT_CAPACITY: usize = 512;

    /// Creates a router with default scratch capacity.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a router with scratch for `max_block_size` samples.
    pub fn with_capacity(max_block_size: usize) -> Self {
        let capacity = max_block_size.max(1);
        Self {
            mid: vec![0.0; capacity],
            side: vec![0.0; capacity],
        }
    }

    /// Resizes the scratch buffers. Call outside the audio callback.
    pub fn prepare(&mut self, max_block_size: usize) {
        let capacity = max_block_size.max(1);
        self.mid.clear();
        self.mid.resize(capacity, 0.0);
        self.side.clear();
        self.side.resize(capacity, 0.0);
    }

    /// Scratch length in samples.
    pub fn capacity(&self) -> usize {
        self.mid.len()
    }

    /// Runs the engine over a block in place, joint or mid/side.
    pub fn route(
        &mut self,
        channels: &mut [&mut [f32]],
        engine: &DistortionEngine,
        mid_side_enabled: bool,
    ) -> Routing {
        let routing = Routing::select(mid_side_enabled, channels.len());
        match routing {
            Routing::Joint => {
                for channel in channels.iter_mut() {
                    engine.process_slice(channel);
                }
            }
            Routing::MidSide => {
                let [left, right] = channels else {
                    unreachable!("mid/side routing requires two channels");
                };
                self.process_mid_side(left, right, engine);
            }
        }
        routing
    }

    fn process_mid_side(&mut self, left: &mut [f32], right: &mut [f32], engine: &DistortionEngine) {
        debug_assert_eq!(left.len(), right.len(), "stereo channels differ in length");
        let capacity = self.mid.len();

        for (left, right) in left.chunks_mut(capacity).zip(right.chunks_mut(capacity)) {
            let len = left.len().min(right.len());
            let mid = &mut self.mid[..len];
            let side = &mut self.side[..len];

            for i in 0..len {
                mid[i] = (left[i] + right[i]) * 0.5;
                side[i] = (left[i] - right[i]) * 0.5;
            }

            engine.process_slice(mid);

            for i in 0..len {
                left[i] = mid[i] + side[i];
                right[i] = mid[i] - side[i];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distortion::DistortionMode;

    fn stereo(len: usize) -> (Vec<f32>, Vec<f32>) {
        let left = (0..len).map(|i| ((i * 7) % 13) as f32 / 13.0 - 0.5).collect();
        let right = (0..len).map(|i| ((i * 5) % 11) as f32 / 11.0 - 0.5).collect();
        (left, right)
    }

    #[test]
    fn routing_selection() {
        assert_eq!(Routing::select(true, 2), Routing::MidSide);
        assert_eq!(Routing::select(false, 2), Routing::Joint);
        assert_eq!(Routing::select(true, 1), Routing::Joint);
        assert_eq!(Routing::select(true, 3), Routing::Joint);
    }

    #[test]
    fn joint_processes_channels_independently() {
        let engine = DistortionEngine::new(DistortionMode::Hard, 2.0, 1.0);
        let mut router = ChannelRouter::with_capacity(16);
        let mut left = [0.9f32, 0.3, -0.2];
        let mut right = [-0.9f32, 0.1, 0.6];
        let routing = router.route(&mut [&mut left[..], &mut right[..]], &engine, false);

        assert_eq!(routing, Routing::Joint);
        assert_eq!(left, [1.0, 0.6, -0.4]);
        assert_eq!(right, [-1.0, 0.2, 1.0]);
    }

    #[test]
    fn mid_side_with_dry_mix_reconstructs_input() {
        let engine = DistortionEngine::new(DistortionMode::Mad, 10.0, 0.0);
        let mut router = ChannelRouter::with_capacity(64);
        let (mut left, mut right) = stereo(64);
        let (orig_l, orig_r) = (left.clone(), right.clone());

        let routing = router.route(&mut [&mut left[..], &mut right[..]], &engine, true);
        assert_eq!(routing, Routing::MidSide);

        for i in 0..64 {
            assert!((left[i] - orig_l[i]).abs() < 1e-6);
            assert!((right[i] - orig_r[i]).abs() < 1e-6);
        }
    }

    #[test]
    fn mid_side_leaves_side_untouched() {
        let engine = DistortionEngine::new(DistortionMode::Hard, 10.0, 1.0);
        let mut router = ChannelRouter::with_capacity(8);
        let mut left = [0.8f32, -0.1];
        let mut right = [0.2f32, -0.5];
        router.route(&mut [&mut left[..], &mut right[..]], &engine, true);

        // side = (L - R) / 2 survives as (L' - R') / 2
        assert!(((left[0] - right[0]) * 0.5 - 0.3).abs() < 1e-6);
        assert!(((left[1] - right[1]) * 0.5 - 0.2).abs() < 1e-6);
        // mid = 0.5 and -0.3 driven by 10 and clipped
        assert!(((left[0] + right[0]) * 0.5 - 1.0).abs() < 1e-6);
        assert!(((left[1] + right[1]) * 0.5 + 1.0).abs() < 1e-6);
    }

    #[test]
    fn mono_ignores_mid_side_flag() {
        let engine = DistortionEngine::new(DistortionMode::Hard, 2.0, 1.0);
        let mut router = ChannelRouter::new();
        let mut mono = [0.3f32, 0.9];
        let routing = router.route(&mut [&mut mono[..]], &engine, true);
        assert_eq!(routing, Routing::Joint);
        assert_eq!(mono, [0.6, 1.0]);
    }

    #[test]
    fn blocks_longer_than_scratch_are_chunked() {
        let engine = DistortionEngine::new(DistortionMode::Classic, 4.0, 1.0);

        let (mut l1, mut r1) = stereo(100);
        let (mut l2, mut r2) = (l1.clone(), r1.clone());

        ChannelRouter::with_capacity(128).route(&mut [&mut l1[..], &mut r1[..]], &engine, true);
        ChannelRouter::with_capacity(7).route(&mut [&mut l2[..], &mut r2[..]], &engine, true);

        assert_eq!(l1, l2);
        assert_eq!(r1, r2);
    }

    #[test]
    fn prepare_resizes_scratch() {
        let mut router = ChannelRouter::new();
        assert_eq!(router.capacity(), ChannelRouter::DEFAULT_CAPACITY);
        router.prepare(2048);
        assert_eq!(router.capacity(), 2048);
        router.prepare(0);
        assert_eq!(router.capacity(), 1);
    }
}
