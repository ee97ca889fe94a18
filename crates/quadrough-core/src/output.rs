//! Output gain and ceiling.
//!
//! With the ceiling off every sample is scaled by the output gain. With the
//! ceiling on, samples above unity magnitude are *replaced* by `±gain`
//! rather than scaled, so the transfer curve jumps at `|x| = 1` whenever the
//! gain is not unity:
//!
//! ```text
//! gain = 2.0        x = 0.9  -> 1.8
//!                   x = 1.01 -> 2.0
//!                   x = 3.0  -> 2.0
//! ```

/// Applies the ceiling to one sample.
///
/// `|x| > 1` yields `±gain`; anything else is scaled by `gain`. NaN is
/// scaled, not replaced.
#[inline]
pub fn ceiling(x: f32, gain: f32) -> f32 {
    if x > 1.0 {
        gain
    } else if x < -1.0 {
        -gain
    } else {
        x * gain
    }
}

/// Final stage of the chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputStage;

impl OutputStage {
    /// Scales every channel by `output_gain`, applying the ceiling when enabled.
    pub fn finalize(channels: &mut [&mut [f32]], output_gain: f32, ceiling_enabled: bool) {
        for channel in channels.iter_mut() {
            if ceiling_enabled {
                for sample in channel.iter_mut() {
                    *sample = ceiling(*sample, output_gain);
                }
            } else {
                for sample in channel.iter_mut() {
                    *sample *= output_gain;
                }
            }
        }
    }
}
