//! Offline block renderer.

use std::sync::Arc;

use quadrough_core::{BlockPipeline, Effect, SharedParameters};

use crate::config::HostConfig;
use crate::wav::AudioFile;
use crate::{Error, Result};

/// Drives a [`BlockPipeline`] over whole files the way a live host would.
///
/// The file is cut into blocks of at most `max_block_size` frames. Before
/// each block the renderer takes one snapshot of its [`SharedParameters`],
/// so another thread holding the same `Arc` can move controls mid-render
/// and the change lands on the next block boundary.
pub struct OfflineRenderer {
    config: HostConfig,
    pipeline: BlockPipeline,
    params: Arc<SharedParameters>,
}

impl OfflineRenderer {
    /// Creates a renderer with default control values.
    pub fn new(config: HostConfig) -> Self {
        Self::with_parameters(config, Arc::new(SharedParameters::new()))
    }

    /// Creates a renderer reading controls from an existing store.
    pub fn with_parameters(config: HostConfig, params: Arc<SharedParameters>) -> Self {
        let mut pipeline = BlockPipeline::default();
        Effect::prepare(
            &mut pipeline,
            config.sample_rate(),
            config.max_block_size(),
            config.channels(),
        );
        tracing::debug!(
            sample_rate = config.sample_rate(),
            block_size = config.max_block_size(),
            channels = config.channels(),
            "offline renderer prepared"
        );
        Self {
            config,
            pipeline,
            params,
        }
    }

    /// The validated stream setup.
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// The control store read once per block.
    pub fn parameters(&self) -> &Arc<SharedParameters> {
        &self.params
    }

    /// Processing latency in samples.
    pub fn latency_samples(&self) -> usize {
        self.pipeline.latency_samples()
    }

    /// Clears all filter history, as on a transport restart.
    pub fn reset(&mut self) {
        Effect::reset(&mut self.pipeline);
    }

    /// Renders `audio` in place.
    pub fn render(&mut self, audio: &mut AudioFile) -> Result<()> {
        self.render_with_progress(audio, |_, _| {})
    }

    /// Renders `audio` in place, calling `on_block(frames_done, total_frames)`
    /// after every block.
    ///
    /// Filter history carries over from any previous render; call
    /// [`reset`](Self::reset) between unrelated files.
    pub fn render_with_progress<F>(&mut self, audio: &mut AudioFile, mut on_block: F) -> Result<()>
    where
        F: FnMut(usize, usize),
    {
        let expected = self.config.channels();
        let found = audio.num_channels();
        if found != expected {
            return Err(Error::ChannelMismatch { expected, found });
        }
        if audio.sample_rate() as f32 != self.config.sample_rate() {
            tracing::warn!(
                file_rate = audio.sample_rate(),
                config_rate = self.config.sample_rate(),
                "sample rate differs from renderer setup; filters stay tuned to the setup"
            );
        }

        let total = audio.num_frames();
        let block_size = self.config.max_block_size();
        tracing::info!(frames = total, block_size, channels = found, "rendering");

        let mut done = 0;
        match audio.channels_mut() {
            [mono] => {
                for block in mono.chunks_mut(block_size) {
                    let len = block.len();
                    let params = self.params.snapshot();
                    Effect::process(&mut self.pipeline, &mut [block], &params);
                    done += len;
                    on_block(done, total);
                }
            }
            [left, right] => {
                for (l, r) in left.chunks_mut(block_size).zip(right.chunks_mut(block_size)) {
                    let params = self.params.snapshot();
                    Effect::process(&mut self.pipeline, &mut [&mut *l, &mut *r], &params);
                    done += l.len();
                    on_block(done, total);
                }
            }
            other => return Err(Error::UnsupportedChannels(other.len())),
        }

        tracing::info!(frames = done, peak = audio.peak(), "render complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadrough_core::{DistortionMode, ParamId, ParameterSnapshot};

    fn ramp(len: usize) -> Vec<f32> {
        (0..len).map(|i| ((i % 200) as f32 / 100.0) - 1.0).collect()
    }

    #[test]
    fn matches_direct_pipeline() {
        let config = HostConfig::new(48000.0, 64, 1).unwrap();
        let mut renderer = OfflineRenderer::new(config);
        renderer.parameters().set(ParamId::Drive, 12.0);
        renderer
            .parameters()
            .set_distortion_mode(DistortionMode::Hard);

        let mut audio = AudioFile::from_mono(ramp(1000), 48000);
        renderer.render(&mut audio).unwrap();

        let params = ParameterSnapshot {
            drive_db: 12.0,
            distortion_mode: DistortionMode::Hard,
            ..ParameterSnapshot::default()
        };
        let mut expected = ramp(1000);
        let mut pipeline = BlockPipeline::new(48000.0, 64, 1);
        for block in expected.chunks_mut(64) {
            pipeline.process(&mut [block], &params);
        }

        assert_eq!(audio.channel(0), Some(&expected[..]));
    }

    #[test]
    fn reports_progress_per_block() {
        let config = HostConfig::new(44100.0, 100, 2).unwrap();
        let mut renderer = OfflineRenderer::new(config);
        let mut audio = AudioFile::new(vec![ramp(250), ramp(250)], 44100).unwrap();

        let mut calls = Vec::new();
        renderer
            .render_with_progress(&mut audio, |done, total| calls.push((done, total)))
            .unwrap();
        assert_eq!(calls, vec![(100, 250), (200, 250), (250, 250)]);
    }

    #[test]
    fn rejects_mismatched_layout() {
        let config = HostConfig::new(48000.0, 64, 2).unwrap();
        let mut renderer = OfflineRenderer::new(config);
        let mut audio = AudioFile::from_mono(vec![0.0; 10], 48000);
        assert!(matches!(
            renderer.render(&mut audio),
            Err(Error::ChannelMismatch {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn controls_moved_mid_render_apply_from_next_block() {
        let config = HostConfig::new(48000.0, 256, 1).unwrap();
        let shared = Arc::new(SharedParameters::new());
        shared.set(ParamId::In, 12.0);
        shared.set(ParamId::Out, 6.0);
        shared.set(ParamId::DryWet, 0.0);
        let mut renderer = OfflineRenderer::with_parameters(config, Arc::clone(&shared));

        let sine: Vec<f32> = (0..1024)
            .map(|i| 0.9 * (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 48000.0).sin())
            .collect();
        let mut audio = AudioFile::from_mono(sine, 48000);
        renderer
            .render_with_progress(&mut audio, |done, _| {
                if done == 256 {
                    shared.set_ceiling(true);
                }
            })
            .unwrap();

        let ceiling = quadrough_core::db_to_linear(6.0) + 1e-4;
        let tail = &audio.channel(0).unwrap()[256..];
        assert!(tail.iter().all(|s| s.abs() <= ceiling));
        assert_eq!(renderer.latency_samples(), 0);
    }

    #[test]
    fn reset_restores_first_render() {
        let config = HostConfig::new(48000.0, 128, 1).unwrap();
        let mut renderer = OfflineRenderer::new(config);
        renderer.parameters().set(ParamId::Tone, 9.0);

        let mut first = AudioFile::from_mono(ramp(600), 48000);
        renderer.render(&mut first).unwrap();
        renderer.reset();
        let mut second = AudioFile::from_mono(ramp(600), 48000);
        renderer.render(&mut second).unwrap();

        assert_eq!(first.channel(0), second.channel(0));
    }
}
