//! File-based effect processing command.

use crate::effects::{apply_params, create_effect};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use seda_core::linear_to_db;
use seda_io::{StereoSamples, WavSpec, read_wav_stereo, write_wav_stereo};
use std::path::PathBuf;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Effect to apply
    #[arg(short, long, default_value = "reverb")]
    effect: String,

    /// Control values (e.g. "size=4000"), repeatable
    #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
    param: Vec<(String, String)>,

    /// Processing block size
    #[arg(long, default_value = "64")]
    block_size: usize,

    /// Extra seconds of silence to render after the input (reverb tails)
    #[arg(long, default_value = "0.0")]
    tail: f32,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("invalid parameter '{s}' (expected name=value)"))
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    println!("Reading {}...", args.input.display());
    let (input, spec) = read_wav_stereo(&args.input)?;
    let sample_rate = spec.sample_rate as f32;
    println!(
        "  {} frames, {} Hz, {:.2}s",
        input.len(),
        spec.sample_rate,
        input.len() as f32 / sample_rate
    );

    let mut effect = create_effect(&args.effect, sample_rate, args.block_size)?;
    apply_params(&mut *effect, &args.param)?;
    tracing::debug!(effect = %args.effect, block_size = args.block_size, "configured");

    let tail_frames = (args.tail * sample_rate) as usize;
    let total = input.len() + tail_frames;
    let mut output = StereoSamples::new(vec![0.0; total], vec![0.0; total]);

    println!("Processing with '{}'...", args.effect);
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("##-"),
    );

    // the engine expects full fixed-size blocks, so the trailing partial
    // block is zero-padded and trimmed back afterwards
    let block = args.block_size;
    let mut left = vec![0.0f32; block];
    let mut right = vec![0.0f32; block];
    let mut frame = 0;
    while frame < total {
        let n = block.min(total - frame);
        left.fill(0.0);
        right.fill(0.0);
        if frame < input.len() {
            let available = n.min(input.len() - frame);
            left[..available].copy_from_slice(&input.left[frame..frame + available]);
            right[..available].copy_from_slice(&input.right[frame..frame + available]);
        }
        effect.process_block(&mut left, &mut right);
        output.left[frame..frame + n].copy_from_slice(&left[..n]);
        output.right[frame..frame + n].copy_from_slice(&right[..n]);
        frame += n;
        pb.set_position(frame as u64);
    }
    pb.finish_with_message("done");

    println!("\nStats:");
    println!(
        "  Input:  RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(rms(&input)),
        linear_to_db(peak(&input))
    );
    println!(
        "  Output: RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(rms(&output)),
        linear_to_db(peak(&output))
    );
    for i in 0..effect.output_count() {
        if let Some(name) = effect.output_name(i) {
            println!("  {name}: {:.1} dB", linear_to_db(effect.output(i)));
        }
    }

    println!("\nWriting {}...", args.output.display());
    let out_spec = WavSpec {
        channels: 2,
        sample_rate: spec.sample_rate,
        bits_per_sample: args.bit_depth,
    };
    write_wav_stereo(&args.output, &output, out_spec)?;
    Ok(())
}

fn rms(samples: &StereoSamples) -> f32 {
    let sum: f32 = samples
        .left
        .iter()
        .chain(samples.right.iter())
        .map(|s| s * s)
        .sum();
    libm::sqrtf(sum / (samples.len() * 2).max(1) as f32)
}

fn peak(samples: &StereoSamples) -> f32 {
    samples
        .left
        .iter()
        .chain(samples.right.iter())
        .fold(0.0f32, |acc, s| acc.max(s.abs()))
}
