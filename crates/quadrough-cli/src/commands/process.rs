//! File rendering through the distortion chain.

use anyhow::Context;
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use quadrough_core::{DistortionMode, ParamId, ParameterSnapshot, linear_to_db};
use quadrough_io::{HostConfig, OfflineRenderer, WavSpec, read_wav, write_wav};
use std::path::PathBuf;

/// Distortion modes for the CLI.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum CliMode {
    #[default]
    Classic,
    Pristine,
    Hard,
    Mad,
}

impl From<CliMode> for DistortionMode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::Classic => DistortionMode::Classic,
            CliMode::Pristine => DistortionMode::Pristine,
            CliMode::Hard => DistortionMode::Hard,
            CliMode::Mad => DistortionMode::Mad,
        }
    }
}

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file (mono or stereo)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Input gain in dB (-12 to 12)
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    in_gain: f32,

    /// Output gain in dB (-12 to 12)
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    out_gain: f32,

    /// Drive in dB (0 to 20)
    #[arg(long, default_value = "0.0")]
    drive: f32,

    /// Wet/dry blend in percent (0 to 100)
    #[arg(long, default_value = "100.0")]
    dry_wet: f32,

    /// Tone tilt in dB (-20 to 20)
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    tone: f32,

    /// Distort the mid channel only (stereo files)
    #[arg(long)]
    mid_side: bool,

    /// Replace samples beyond full scale with the output gain
    #[arg(long)]
    ceiling: bool,

    /// Distortion transfer function
    #[arg(long, value_enum, default_value = "classic")]
    mode: CliMode,

    /// Raw control assignment by id (e.g., "DRIVE=12"), applied last
    #[arg(long = "set", value_parser = parse_key_val, number_of_values = 1)]
    set: Vec<(String, f32)>,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (8, 16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

fn parse_key_val(s: &str) -> Result<(String, f32), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid control format: '{}' (expected ID=value)", s))?;
    let value = value
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("Invalid value for '{}': {}", key, e))?;
    Ok((key.trim().to_string(), value))
}

impl ProcessArgs {
    /// Builds the control snapshot, clamping out-of-range values with a warning.
    fn snapshot(&self) -> anyhow::Result<ParameterSnapshot> {
        let mut params = ParameterSnapshot {
            mid_side_enabled: self.mid_side,
            ceiling_enabled: self.ceiling,
            distortion_mode: self.mode.into(),
            ..ParameterSnapshot::default()
        };
        let floats = [
            (ParamId::In, self.in_gain),
            (ParamId::Out, self.out_gain),
            (ParamId::Drive, self.drive),
            (ParamId::DryWet, self.dry_wet),
            (ParamId::Tone, self.tone),
        ];
        for (id, value) in floats {
            params.set(id, clamp_with_warning(id, value));
        }
        for (key, value) in &self.set {
            let id = ParamId::from_string_id(key).with_context(|| {
                let known: Vec<_> = ParamId::ALL.iter().map(|id| id.string_id()).collect();
                format!("Unknown control '{}' (known: {})", key, known.join(", "))
            })?;
            params.set(id, clamp_with_warning(id, *value));
        }
        Ok(params)
    }
}

fn clamp_with_warning(id: ParamId, value: f32) -> f32 {
    let desc = id.descriptor();
    let clamped = desc.clamp(value);
    if clamped != value {
        tracing::warn!(
            control = id.string_id(),
            requested = value,
            applied = clamped,
            "value outside {}..{}, clamped",
            desc.min,
            desc.max
        );
    }
    clamped
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let params = args.snapshot()?;

    println!("Reading {}...", args.input.display());
    let (mut audio, spec) = read_wav(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    println!(
        "  {} channel(s), {} frames, {} Hz, {:.2}s",
        audio.num_channels(),
        audio.num_frames(),
        audio.sample_rate(),
        audio.duration_secs()
    );

    let config = HostConfig::for_audio(&audio, args.block_size)?;
    let mut renderer = OfflineRenderer::new(config);
    renderer.parameters().load(&params);

    println!("Controls:");
    for id in ParamId::ALL {
        let desc = id.descriptor();
        println!("  {:<8} {}", id.string_id(), desc.display(params.get(id)));
    }
    if params.mid_side_enabled && audio.num_channels() != 2 {
        tracing::warn!("mid/side needs a stereo file; processing joint");
    }

    let input_peak = audio.peak();
    let pb = ProgressBar::new(audio.num_frames() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );
    renderer.render_with_progress(&mut audio, |done, _| pb.set_position(done as u64))?;
    pb.finish_with_message("done");

    println!("\nStats:");
    println!("  Input:  Peak {:.1} dBFS", linear_to_db(input_peak));
    println!("  Output: Peak {:.1} dBFS", linear_to_db(audio.peak()));

    let out_spec = WavSpec {
        bits_per_sample: args.bit_depth,
        ..spec
    };
    println!("\nWriting {}...", args.output.display());
    write_wav(&args.output, &audio, out_spec)?;
    println!("Done!");

    Ok(())
}
