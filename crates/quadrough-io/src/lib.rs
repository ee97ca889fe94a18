//! Host-facing layer for the QuadRough distortion chain.
//!
//! The core crate assumes validated inputs and never fails. This crate is
//! where things can go wrong, and where they are caught:
//!
//! - **Setup validation**: [`HostConfig`] rejects non-positive sample rates,
//!   empty blocks and anything other than mono or stereo before a pipeline
//!   is armed
//! - **WAV file I/O**: [`read_wav`] and [`write_wav`] load and save planar
//!   [`AudioFile`]s
//! - **Offline rendering**: [`OfflineRenderer`] walks a file block by block,
//!   taking one parameter snapshot per block, the way a live host would
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use quadrough_io::{HostConfig, OfflineRenderer, read_wav, write_wav};
//! use quadrough_core::ParamId;
//!
//! let (mut audio, spec) = read_wav("input.wav")?;
//! let config = HostConfig::for_audio(&audio, 512)?;
//!
//! let mut renderer = OfflineRenderer::new(config);
//! renderer.parameters().set(ParamId::Drive, 12.0);
//! renderer.render(&mut audio)?;
//!
//! write_wav("output.wav", &audio, spec)?;
//! ```

mod config;
mod engine;
mod wav;

pub use config::{HostConfig, MAX_HOST_CHANNELS};
pub use engine::OfflineRenderer;
pub use wav::{AudioFile, WavFormat, WavInfo, WavSpec, read_wav, read_wav_info, write_wav};

/// Error types for host setup and audio I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Sample rate is zero, negative or not finite.
    #[error("Invalid sample rate: {0} Hz")]
    InvalidSampleRate(f32),

    /// Channel layout other than mono or stereo.
    #[error("Unsupported channel count: {0} (only mono and stereo are supported)")]
    UnsupportedChannels(usize),

    /// Maximum block size of zero.
    #[error("Invalid block size: {0}")]
    InvalidBlockSize(usize),

    /// WAV bit depth that cannot be written.
    #[error("Unsupported bit depth: {0} (expected 8, 16, 24 or 32)")]
    UnsupportedBitDepth(u16),

    /// Audio handed to a renderer prepared for a different layout.
    #[error("Channel mismatch: renderer prepared for {expected}, audio has {found}")]
    ChannelMismatch {
        /// Channels the renderer was prepared for.
        expected: usize,
        /// Channels in the audio.
        found: usize,
    },

    /// Channels of one file differ in length.
    #[error("Ragged audio: channel {channel} has {found} frames, expected {expected}")]
    RaggedChannels {
        /// Index of the offending channel.
        channel: usize,
        /// Frame count of channel 0.
        expected: usize,
        /// Frame count of the offending channel.
        found: usize,
    },
}

/// Convenience result type for host operations.
pub type Result<T> = std::result::Result<T, Error>;
