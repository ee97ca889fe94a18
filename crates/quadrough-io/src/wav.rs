//! WAV file reading and writing.
//!
//! Samples are held planar (one `Vec<f32>` per channel), the layout the
//! pipeline processes. Integer PCM is scaled to `[-1.0, 1.0)` on read and
//! clamped back into range on write.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let total_samples = u64::from(reader.len()); // total across all channels
    let num_frames = total_samples / u64::from(spec.channels.max(1));
    let duration_secs = num_frames as f64 / f64::from(spec.sample_rate);

    let format = match spec.sample_format {
        SampleFormat::Float => WavFormat::IeeeFloat,
        SampleFormat::Int => WavFormat::Pcm,
    };

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs,
        format,
    })
}

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample: 8, 16 or 24 (PCM) or 32 (float).
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 32,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Planar multichannel audio with its sample rate.
///
/// Every channel has the same number of frames.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFile {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
}

impl AudioFile {
    /// Wraps planar channels. Fails when there are no channels or their
    /// lengths differ.
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self> {
        let Some(first) = channels.first() else {
            return Err(Error::UnsupportedChannels(0));
        };
        let expected = first.len();
        if let Some((channel, ch)) = channels
            .iter()
            .enumerate()
            .find(|(_, ch)| ch.len() != expected)
        {
            return Err(Error::RaggedChannels {
                channel,
                expected,
                found: ch.len(),
            });
        }
        Ok(Self {
            channels,
            sample_rate,
        })
    }

    /// A single-channel file.
    pub fn from_mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            channels: vec![samples],
            sample_rate,
        }
    }

    /// Splits interleaved frames into channels. A trailing partial frame is dropped.
    pub fn from_interleaved(samples: &[f32], num_channels: usize, sample_rate: u32) -> Result<Self> {
        if num_channels == 0 {
            return Err(Error::UnsupportedChannels(0));
        }
        let frames = samples.len() / num_channels;
        let mut channels = vec![Vec::with_capacity(frames); num_channels];
        for frame in samples.chunks_exact(num_channels) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }
        Ok(Self {
            channels,
            sample_rate,
        })
    }

    /// Interleaves the channels into one buffer.
    pub fn to_interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.num_frames() * self.num_channels());
        for frame in 0..self.num_frames() {
            out.extend(self.channels.iter().map(|ch| ch[frame]));
        }
        out
    }

    /// Number of channels.
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel.
    pub fn num_frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.num_frames() as f64 / f64::from(self.sample_rate.max(1))
    }

    /// One channel's samples.
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// All channels, for in-place processing.
    pub fn channels_mut(&mut self) -> &mut [Vec<f32>] {
        &mut self.channels
    }

    /// Largest absolute sample across all channels.
    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flatten()
            .fold(0.0f32, |m, s| m.max(s.abs()))
    }
}

/// Read a WAV file into planar channels along with its spec.
///
/// # Example
/// ```ignore
/// let (audio, spec) = read_wav("input.wav")?;
/// println!("Loaded {} frames at {} Hz", audio.num_frames(), spec.sample_rate);
/// ```
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(AudioFile, WavSpec)> {
    let reader = WavReader::open(path)?;
    let hound_spec = reader.spec();
    let spec = WavSpec::from(hound_spec);

    let samples: Vec<f32> = match hound_spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = pcm_full_scale(spec.bits_per_sample)?;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let audio = AudioFile::from_interleaved(&samples, usize::from(spec.channels), spec.sample_rate)?;
    Ok((audio, spec))
}

/// Write planar audio to a WAV file.
///
/// The channel count and sample rate come from `audio`; `spec` supplies
/// the bit depth (8, 16 or 24 for PCM, 32 for float).
///
/// # Example
/// ```ignore
/// let audio = AudioFile::from_mono(vec![0.0; 48000], 48000); // 1 second of silence
/// write_wav("output.wav", &audio, WavSpec { bits_per_sample: 24, ..Default::default() })?;
/// ```
pub fn write_wav<P: AsRef<Path>>(path: P, audio: &AudioFile, spec: WavSpec) -> Result<()> {
    let channels = u16::try_from(audio.num_channels())
        .map_err(|_| Error::UnsupportedChannels(audio.num_channels()))?;
    let spec = WavSpec {
        channels,
        sample_rate: audio.sample_rate(),
        ..spec
    };
    let full_scale = match spec.bits_per_sample {
        32 => None,
        bits => Some(pcm_full_scale(bits)?),
    };

    let mut writer = WavWriter::create(path, hound::WavSpec::from(spec))?;
    let interleaved = audio.to_interleaved();

    match full_scale {
        None => {
            for &sample in &interleaved {
                writer.write_sample(sample)?;
            }
        }
        Some(max_val) => {
            for &sample in &interleaved {
                let int_sample = (sample * max_val).clamp(-max_val, max_val - 1.0) as i32;
                writer.write_sample(int_sample)?;
            }
        }
    }

    writer.finalize()?;
    Ok(())
}

/// `2^(bits - 1)` for the PCM depths this crate handles.
fn pcm_full_scale(bits: u16) -> Result<f32> {
    match bits {
        8 | 16 | 24 => Ok((1i32 << (bits - 1)) as f32),
        _ => Err(Error::UnsupportedBitDepth(bits)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn test_tone(len: usize, phase: f32) -> Vec<f32> {
        (0..len).map(|i| (i as f32 / 100.0 + phase).sin() * 0.9).collect()
    }

    #[test]
    fn test_f32_stereo_is_lossless() {
        let audio = AudioFile::new(vec![test_tone(1000, 0.0), test_tone(1000, 1.0)], 48000).unwrap();

        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &audio, WavSpec::default()).unwrap();

        let (loaded, spec) = read_wav(file.path()).unwrap();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.bits_per_sample, 32);
        assert_eq!(loaded, audio);
    }

    #[test]
    fn test_pcm_depths_within_quantization() {
        for (bits, tolerance) in [(16u16, 1e-4f32), (24, 1e-6)] {
            let audio = AudioFile::from_mono(test_tone(1000, 0.3), 44100);
            let spec = WavSpec {
                bits_per_sample: bits,
                ..WavSpec::default()
            };

            let file = NamedTempFile::new().unwrap();
            write_wav(file.path(), &audio, spec).unwrap();

            let (loaded, loaded_spec) = read_wav(file.path()).unwrap();
            assert_eq!(loaded_spec.channels, 1);
            assert_eq!(loaded_spec.sample_rate, 44100);
            assert_eq!(loaded.num_frames(), 1000);
            for (a, b) in audio.channel(0).unwrap().iter().zip(loaded.channel(0).unwrap()) {
                assert!((a - b).abs() < tolerance, "{bits}-bit: {a} vs {b}");
            }
        }
    }

    #[test]
    fn test_pcm_write_clamps_overs() {
        let audio = AudioFile::from_mono(vec![2.0, -2.0], 48000);
        let spec = WavSpec {
            bits_per_sample: 16,
            ..WavSpec::default()
        };
        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &audio, spec).unwrap();

        let (loaded, _) = read_wav(file.path()).unwrap();
        let ch = loaded.channel(0).unwrap();
        assert!(ch[0] < 1.0 && ch[0] > 0.999);
        assert_eq!(ch[1], -1.0);
    }

    #[test]
    fn test_unsupported_bit_depth() {
        let audio = AudioFile::from_mono(vec![0.0; 4], 48000);
        let spec = WavSpec {
            bits_per_sample: 12,
            ..WavSpec::default()
        };
        let file = NamedTempFile::new().unwrap();
        assert!(matches!(
            write_wav(file.path(), &audio, spec),
            Err(Error::UnsupportedBitDepth(12))
        ));
    }

    #[test]
    fn test_info_reads_header() {
        let audio = AudioFile::new(vec![vec![0.0; 4800], vec![0.0; 4800]], 48000).unwrap();
        let file = NamedTempFile::new().unwrap();
        write_wav(
            file.path(),
            &audio,
            WavSpec {
                bits_per_sample: 24,
                ..WavSpec::default()
            },
        )
        .unwrap();

        let info = read_wav_info(file.path()).unwrap();
        assert_eq!(info.channels, 2);
        assert_eq!(info.bits_per_sample, 24);
        assert_eq!(info.num_frames, 4800);
        assert_eq!(info.format, WavFormat::Pcm);
        assert!((info.duration_secs - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_interleave_layout() {
        let audio = AudioFile::from_interleaved(&[1.0, 2.0, 3.0, 4.0, 5.0], 2, 48000).unwrap();
        assert_eq!(audio.channel(0), Some(&[1.0, 3.0][..]));
        assert_eq!(audio.channel(1), Some(&[2.0, 4.0][..]));
        assert_eq!(audio.to_interleaved(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_ragged_channels_rejected() {
        let err = AudioFile::new(vec![vec![0.0; 3], vec![0.0; 2]], 48000).unwrap_err();
        assert!(matches!(
            err,
            Error::RaggedChannels {
                channel: 1,
                expected: 3,
                found: 2
            }
        ));
        assert!(AudioFile::new(Vec::new(), 48000).is_err());
    }

    #[test]
    fn test_peak_and_duration() {
        let audio = AudioFile::new(vec![vec![0.1, -0.7], vec![0.5, 0.2]], 2).unwrap();
        assert_eq!(audio.peak(), 0.7);
        assert_eq!(audio.duration_secs(), 1.0);
    }
}
