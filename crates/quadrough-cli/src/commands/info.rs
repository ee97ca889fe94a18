//! WAV metadata and level report.

use clap::Args;
use quadrough_core::linear_to_db;
use quadrough_io::{HostConfig, MAX_HOST_CHANNELS, WavFormat, read_wav, read_wav_info};
use std::path::PathBuf;

/// Display WAV file information.
#[derive(Args)]
pub struct InfoArgs {
    /// Path to the WAV file
    pub file: PathBuf,

    /// Also load the samples and report per-channel peak levels
    #[arg(long)]
    pub levels: bool,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let info = read_wav_info(&args.file)?;

    let format = match info.format {
        WavFormat::Pcm => "PCM",
        WavFormat::IeeeFloat => "IEEE Float",
    };

    println!("File:        {}", args.file.display());
    println!("Format:      {} {}-bit", format, info.bits_per_sample);
    println!("Channels:    {}", info.channels);
    println!("Sample Rate: {} Hz", info.sample_rate);
    println!(
        "Duration:    {:.3}s ({} frames)",
        info.duration_secs, info.num_frames
    );

    let renderable = usize::from(info.channels) <= MAX_HOST_CHANNELS;
    println!(
        "Renderable:  {}",
        if renderable {
            "yes"
        } else {
            "no (mono or stereo only)"
        }
    );

    if args.levels {
        let (audio, _) = read_wav(&args.file)?;
        for index in 0..audio.num_channels() {
            let peak = audio
                .channel(index)
                .unwrap_or_default()
                .iter()
                .fold(0.0_f32, |acc, s| acc.max(s.abs()));
            println!("Peak ch{}:    {:.1} dBFS", index, linear_to_db(peak));
        }
        if renderable {
            let config = HostConfig::for_audio(&audio, 512)?;
            tracing::debug!(?config, "file fits a host configuration");
        }
    }

    Ok(())
}
