//! Stream setup validated before a pipeline is armed.

use crate::wav::AudioFile;
use crate::{Error, Result};

/// Largest channel count a host may request: mono or stereo.
pub const MAX_HOST_CHANNELS: usize = 2;

/// Sample rate, block size and channel layout of a stream.
///
/// Construction is the only place these are checked; the core pipeline
/// trusts whatever a `HostConfig` hands it.
///
/// # Example
///
/// ```rust
/// use quadrough_io::{Error, HostConfig};
///
/// let config = HostConfig::new(48000.0, 256, 2).unwrap();
/// assert_eq!(config.channels(), 2);
///
/// assert!(matches!(HostConfig::new(48000.0, 256, 6), Err(Error::UnsupportedChannels(6))));
/// assert!(matches!(HostConfig::new(0.0, 256, 1), Err(Error::InvalidSampleRate(_))));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostConfig {
    sample_rate: f32,
    max_block_size: usize,
    channels: usize,
}

impl HostConfig {
    /// Validates and builds a configuration.
    pub fn new(sample_rate: f32, max_block_size: usize, channels: usize) -> Result<Self> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(Error::InvalidSampleRate(sample_rate));
        }
        if max_block_size == 0 {
            return Err(Error::InvalidBlockSize(max_block_size));
        }
        if channels == 0 || channels > MAX_HOST_CHANNELS {
            return Err(Error::UnsupportedChannels(channels));
        }
        Ok(Self {
            sample_rate,
            max_block_size,
            channels,
        })
    }

    /// Builds a configuration matching a loaded file.
    pub fn for_audio(audio: &AudioFile, max_block_size: usize) -> Result<Self> {
        Self::new(audio.sample_rate() as f32, max_block_size, audio.num_channels())
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Largest block the host will pass.
    pub fn max_block_size(&self) -> usize {
        self.max_block_size
    }

    /// Channel count, 1 or 2.
    pub fn channels(&self) -> usize {
        self.channels
    }
}
