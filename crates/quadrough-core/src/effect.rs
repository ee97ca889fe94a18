//! Host-facing processing trait.
//!
//! The [`Effect`] trait is the seam between a host (plugin wrapper, offline
//! renderer, test harness) and a block processor. The host calls
//! [`prepare`](Effect::prepare) outside the audio callback, then
//! [`process`](Effect::process) once per block with that block's
//! [`ParameterSnapshot`].
//!
//! ## Design Decisions
//!
//! - **Planar in place**: one `&mut [f32]` per channel, all the same length.
//!   Interleaved hosts deinterleave first or use
//!   [`BlockPipeline::process_interleaved`](crate::BlockPipeline::process_interleaved).
//!
//! - **Object-safe**: `dyn Effect` works for hosts that pick a processor at
//!   runtime.
//!
//! - **No allocations**: `process` and `reset` run on the audio thread.

use crate::params::ParameterSnapshot;

/// Block processor driven by a host.
///
/// # Example
///
/// ```rust
/// use quadrough_core::{Effect, ParameterSnapshot};
///
/// struct Gain {
///     gain: f32,
/// }
///
/// impl Effect for Gain {
///     fn prepare(&mut self, _sample_rate: f32, _max_block_size: usize, _num_channels: usize) {}
///
///     fn process(&mut self, channels: &mut [&mut [f32]], _params: &ParameterSnapshot) {
///         for channel in channels.iter_mut() {
///             channel.iter_mut().for_each(|s| *s *= self.gain);
///         }
///     }
///
///     fn reset(&mut self) {}
/// }
/// ```
pub trait Effect {
    /// Sizes internal state for a stream.
    ///
    /// Called before the first block and whenever the sample rate, block size
    /// or channel count changes. May allocate.
    ///
    /// # Arguments
    /// * `sample_rate` - Sample rate in Hz, validated positive by the host
    /// * `max_block_size` - Largest block the host will pass
    /// * `num_channels` - Channel count, 1 or 2
    fn prepare(&mut self, sample_rate: f32, max_block_size: usize, num_channels: usize);

    /// Processes one planar block in place.
    fn process(&mut self, channels: &mut [&mut [f32]], params: &ParameterSnapshot);

    /// Clears all history for a stream restart.
    fn reset(&mut self);

    /// Processing latency in samples.
    ///
    /// Default returns 0.
    fn latency_samples(&self) -> usize {
        0
    }
}
