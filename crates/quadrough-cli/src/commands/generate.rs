//! Test signal generation command.

use clap::{Args, Subcommand};
use quadrough_io::{AudioFile, WavSpec, write_wav};
use std::f32::consts::TAU;
use std::path::PathBuf;

#[derive(Args)]
pub struct GenerateArgs {
    #[command(subcommand)]
    command: GenerateCommand,

    /// Number of output channels (identical content per channel)
    #[arg(long, default_value = "1", global = true)]
    channels: usize,
}

#[derive(Subcommand)]
enum GenerateCommand {
    /// Generate a sine tone
    Tone {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Frequency in Hz
        #[arg(long, default_value = "440.0")]
        freq: f32,

        /// Duration in seconds
        #[arg(long, default_value = "1.0")]
        duration: f32,

        /// Sample rate
        #[arg(long, default_value = "48000")]
        sample_rate: u32,

        /// Amplitude (0-1)
        #[arg(long, default_value = "0.8")]
        amplitude: f32,
    },

    /// Generate an exponential sine sweep
    Sweep {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Start frequency in Hz
        #[arg(long, default_value = "20.0")]
        start: f32,

        /// End frequency in Hz
        #[arg(long, default_value = "20000.0")]
        end: f32,

        /// Duration in seconds
        #[arg(long, default_value = "2.0")]
        duration: f32,

        /// Sample rate
        #[arg(long, default_value = "48000")]
        sample_rate: u32,

        /// Amplitude (0-1)
        #[arg(long, default_value = "0.8")]
        amplitude: f32,
    },

    /// Generate an impulse
    Impulse {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Length in samples
        #[arg(long, default_value = "48000")]
        length: usize,

        /// Sample rate
        #[arg(long, default_value = "48000")]
        sample_rate: u32,

        /// Impulse amplitude
        #[arg(long, default_value = "1.0")]
        amplitude: f32,
    },

    /// Generate white noise
    Noise {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Duration in seconds
        #[arg(long, default_value = "1.0")]
        duration: f32,

        /// Sample rate
        #[arg(long, default_value = "48000")]
        sample_rate: u32,

        /// Amplitude (0-1)
        #[arg(long, default_value = "0.5")]
        amplitude: f32,

        /// Generator seed
        #[arg(long, default_value = "305419896")]
        seed: u32,
    },
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    if args.channels == 0 {
        anyhow::bail!("--channels must be at least 1");
    }

    let (output, sample_rate, samples) = match args.command {
        GenerateCommand::Tone {
            output,
            freq,
            duration,
            sample_rate,
            amplitude,
        } => {
            println!("Generating {} Hz tone...", freq);
            let samples = tone(freq, duration, sample_rate, amplitude);
            (output, sample_rate, samples)
        }

        GenerateCommand::Sweep {
            output,
            start,
            end,
            duration,
            sample_rate,
            amplitude,
        } => {
            if start <= 0.0 || end <= 0.0 {
                anyhow::bail!("sweep frequencies must be positive");
            }
            println!("Generating sine sweep...");
            println!("  {} Hz to {} Hz over {:.2}s", start, end, duration);
            let samples = sweep(start, end, duration, sample_rate, amplitude);
            (output, sample_rate, samples)
        }

        GenerateCommand::Impulse {
            output,
            length,
            sample_rate,
            amplitude,
        } => {
            println!("Generating impulse...");
            let mut samples = vec![0.0; length];
            if let Some(first) = samples.first_mut() {
                *first = amplitude;
            }
            (output, sample_rate, samples)
        }

        GenerateCommand::Noise {
            output,
            duration,
            sample_rate,
            amplitude,
            seed,
        } => {
            println!("Generating white noise...");
            println!("  {:.2}s at {} Hz", duration, sample_rate);
            let mut rng = XorShift::new(seed);
            let samples = (0..frame_count(duration, sample_rate))
                .map(|_| rng.next_bipolar() * amplitude)
                .collect();
            (output, sample_rate, samples)
        }
    };

    let audio = AudioFile::new(vec![samples; args.channels], sample_rate)?;
    let spec = WavSpec {
        channels: audio.num_channels() as u16,
        sample_rate,
        bits_per_sample: 32,
    };
    write_wav(&output, &audio, spec)?;
    println!(
        "Wrote {} frames x {} channel(s) to {}",
        audio.num_frames(),
        audio.num_channels(),
        output.display()
    );

    Ok(())
}

fn frame_count(duration: f32, sample_rate: u32) -> usize {
    (duration.max(0.0) * sample_rate as f32) as usize
}

fn tone(freq: f32, duration: f32, sample_rate: u32, amplitude: f32) -> Vec<f32> {
    let step = freq / sample_rate as f32;
    (0..frame_count(duration, sample_rate))
        .map(|i| {
            // Wrapped phase keeps long tones accurate in f32.
            let phase = (i as f32 * step).fract();
            amplitude * (TAU * phase).sin()
        })
        .collect()
}

fn sweep(start: f32, end: f32, duration: f32, sample_rate: u32, amplitude: f32) -> Vec<f32> {
    let frames = frame_count(duration, sample_rate);
    let sr = sample_rate as f64;
    let ratio = f64::from(end) / f64::from(start);
    let mut phase = 0.0_f64;
    (0..frames)
        .map(|i| {
            let t = i as f64 / frames.max(1) as f64;
            let freq = f64::from(start) * ratio.powf(t);
            let sample = amplitude * (TAU * phase as f32).sin();
            phase = (phase + freq / sr).fract();
            sample
        })
        .collect()
}

/// Xorshift32 generator; deterministic for a given seed.
struct XorShift(u32);

impl XorShift {
    fn new(seed: u32) -> Self {
        Self(seed.max(1))
    }

    fn next_bipolar(&mut self) -> f32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        (x as f32 / u32::MAX as f32) * 2.0 - 1.0
    }
}
