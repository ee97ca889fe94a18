//! Per-block processing pipeline.
//!
//! [`BlockPipeline`] owns every piece of state the chain needs (filter
//! delay lines, mid/side scratch, interleave scratch) and runs the stages
//! in a fixed order for each block:
//!
//! ```text
//! InputGain → PreFilter → Distortion → PostFilter → Output
//! ```
//!
//! Every stage runs exactly once per block and none re-enters an earlier
//! one. The parameter snapshot is sanitized at the top of the block, so
//! out-of-range controls are clamped and an unknown mode plays as CLASSIC.
//! Nothing in [`process`](BlockPipeline::process) allocates or returns an
//! error.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::distortion::DistortionEngine;
use crate::effect::Effect;
use crate::filter_bank::{DEFAULT_SAMPLE_RATE, FilterBank};
use crate::math::db_to_linear;
use crate::output::OutputStage;
use crate::params::ParameterSnapshot;
use crate::router::ChannelRouter;

/// Most channels a pipeline can be prepared for.
pub const MAX_CHANNELS: usize = 8;

/// Block size used by [`BlockPipeline::default`].
pub const DEFAULT_BLOCK_SIZE: usize = 512;

/// One step of the per-block sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStage {
    /// Linear input gain over the whole block.
    InputGain,
    /// Retune, then the pre-distortion filter chain.
    PreFilter,
    /// Joint or mid/side distortion.
    Distortion,
    /// Post-distortion filter chain.
    PostFilter,
    /// Output gain and optional ceiling.
    Output,
}

impl ProcessStage {
    /// The order stages run in.
    pub const ORDER: [ProcessStage; 5] = [
        ProcessStage::InputGain,
        ProcessStage::PreFilter,
        ProcessStage::Distortion,
        ProcessStage::PostFilter,
        ProcessStage::Output,
    ];
}

/// The complete distortion chain.
///
/// # Example
///
/// ```rust
/// use quadrough_core::{BlockPipeline, DistortionMode, ParameterSnapshot};
///
/// let mut pipeline = BlockPipeline::new(48000.0, 256, 2);
/// let params = ParameterSnapshot {
///     drive_db: 12.0,
///     distortion_mode: DistortionMode::Pristine,
///     ..ParameterSnapshot::default()
/// };
///
/// let mut left = vec![0.25f32; 256];
/// let mut right = vec![-0.25f32; 256];
/// pipeline.process(&mut [&mut left[..], &mut right[..]], &params);
/// assert!(left.iter().chain(&right).all(|s| s.is_finite()));
/// ```
#[derive(Debug, Clone)]
pub struct BlockPipeline {
    sample_rate: f32,
    max_block_size: usize,
    num_channels: usize,
    filters: FilterBank,
    router: ChannelRouter,
    /// Planar scratch for interleaved blocks, `num_channels * max_block_size`.
    planar: Vec<f32>,
}

impl Default for BlockPipeline {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE, DEFAULT_BLOCK_SIZE, 2)
    }
}

impl BlockPipeline {
    /// Creates a pipeline prepared for the given stream.
    pub fn new(sample_rate: f32, max_block_size: usize, num_channels: usize) -> Self {
        let mut pipeline = Self {
            sample_rate,
            max_block_size: 0,
            num_channels: 0,
            filters: FilterBank::new(),
            router: ChannelRouter::with_capacity(1),
            planar: Vec::new(),
        };
        pipeline.prepare(sample_rate, max_block_size, num_channels);
        pipeline
    }

    /// Sizes all scratch and filter state and clears every delay line.
    ///
    /// `max_block_size` is floored at 1 and `num_channels` is kept within
    /// `1..=MAX_CHANNELS`. Allocates; call outside the audio callback.
    pub fn prepare(&mut self, sample_rate: f32, max_block_size: usize, num_channels: usize) {
        let max_block_size = max_block_size.max(1);
        let num_channels = num_channels.clamp(1, MAX_CHANNELS);

        self.sample_rate = sample_rate;
        self.max_block_size = max_block_size;
        self.num_channels = num_channels;
        self.filters.prepare(sample_rate, num_channels);
        self.router.prepare(max_block_size);
        self.planar = vec![0.0; num_channels * max_block_size];

        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, max_block_size, num_channels, "pipeline prepared");
    }

    /// Stream restart: clears all filter history and restores flat tuning.
    pub fn reset(&mut self) {
        self.filters.reset();
        self.planar.fill(0.0);

        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate = self.sample_rate, "pipeline reset");
    }

    /// Sample rate from the last prepare.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Largest block the scratch buffers were sized for.
    pub fn max_block_size(&self) -> usize {
        self.max_block_size
    }

    /// Number of prepared channels.
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    /// The filter bank, for inspecting delay-line state.
    pub fn filters(&self) -> &FilterBank {
        &self.filters
    }

    /// Processes one planar block in place.
    ///
    /// All channels must have the same length. Channels beyond the prepared
    /// count are distorted and gained but not filtered.
    pub fn process(&mut self, channels: &mut [&mut [f32]], params: &ParameterSnapshot) {
        debug_assert!(
            channels.len() <= self.num_channels,
            "block has {} channels, pipeline prepared for {}",
            channels.len(),
            self.num_channels
        );
        let params = params.sanitized();
        for stage in ProcessStage::ORDER {
            self.run_stage(stage, channels, &params);
        }
    }

    fn run_stage(
        &mut self,
        stage: ProcessStage,
        channels: &mut [&mut [f32]],
        params: &ParameterSnapshot,
    ) {
        match stage {
            ProcessStage::InputGain => {
                let gain = db_to_linear(params.input_gain_db);
                for channel in channels.iter_mut() {
                    channel.iter_mut().for_each(|s| *s *= gain);
                }
            }
            ProcessStage::PreFilter => {
                self.filters.retune(self.sample_rate, params.tone_db);
                self.filters.process_pre(channels);
            }
            ProcessStage::Distortion => {
                let engine = DistortionEngine::from_snapshot(params);
                self.router.route(channels, &engine, params.mid_side_enabled);
            }
            ProcessStage::PostFilter => self.filters.process_post(channels),
            ProcessStage::Output => OutputStage::finalize(
                channels,
                db_to_linear(params.output_gain_db),
                params.ceiling_enabled,
            ),
        }
    }

    /// Processes an interleaved buffer in place.
    ///
    /// The buffer holds frames of `num_channels` samples. It is walked in
    /// chunks of at most `max_block_size` frames, each deinterleaved into
    /// planar scratch, processed, and written back. A trailing partial frame
    /// is left untouched.
    pub fn process_interleaved(&mut self, buffer: &mut [f32], params: &ParameterSnapshot) {
        let num_channels = self.num_channels;
        let max_frames = self.max_block_size;
        debug_assert_eq!(buffer.len() % num_channels, 0, "partial frame in interleaved buffer");

        let mut planar = core::mem::take(&mut self.planar);

        for chunk in buffer.chunks_mut(num_channels * max_frames) {
            let frames = chunk.len() / num_channels;
            if frames == 0 {
                break;
            }

            for (ch, plane) in planar.chunks_mut(max_frames).enumerate() {
                for (frame, sample) in plane[..frames].iter_mut().enumerate() {
                    *sample = chunk[frame * num_channels + ch];
                }
            }

            let mut views: [&mut [f32]; MAX_CHANNELS] = Default::default();
            for (view, plane) in views.iter_mut().zip(planar.chunks_mut(max_frames)) {
                *view = &mut plane[..frames];
            }
            self.process(&mut views[..num_channels], params);

            for (ch, plane) in planar.chunks(max_frames).enumerate() {
                for (frame, sample) in plane[..frames].iter().enumerate() {
                    chunk[frame * num_channels + ch] = *sample;
                }
            }
        }

        self.planar = planar;
    }
}

impl Effect for BlockPipeline {
    fn prepare(&mut self, sample_rate: f32, max_block_size: usize, num_channels: usize) {
        BlockPipeline::prepare(self, sample_rate, max_block_size, num_channels);
    }

    fn process(&mut self, channels: &mut [&mut [f32]], params: &ParameterSnapshot) {
        BlockPipeline::process(self, channels, params);
    }

    fn reset(&mut self) {
        BlockPipeline::reset(self);
    }
}
