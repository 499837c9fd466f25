//! Test signal generation command.

use clap::{Args, Subcommand};
use seda_io::{StereoSamples, WavSpec, write_wav_stereo};
use std::path::PathBuf;

#[derive(Args)]
pub struct GenerateArgs {
    #[command(subcommand)]
    command: GenerateCommand,
}

#[derive(Subcommand)]
enum GenerateCommand {
    /// Generate a single-sample impulse (useful for reverb tails)
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

    /// Generate a sine tone
    Sine {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Frequency in Hz
        #[arg(long, default_value = "440.0")]
        freq: f32,

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
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    match args.command {
        GenerateCommand::Impulse {
            output,
            length,
            sample_rate,
            amplitude,
        } => {
            let mut samples = vec![0.0f32; length];
            if let Some(first) = samples.first_mut() {
                *first = amplitude;
            }
            let stereo = StereoSamples::from_mono(samples);
            write_wav_stereo(
                &output,
                &stereo,
                WavSpec {
                    sample_rate,
                    ..WavSpec::default()
                },
            )?;
            println!("Wrote {length}-sample impulse to {}", output.display());
        }
        GenerateCommand::Sine {
            output,
            freq,
            duration,
            sample_rate,
            amplitude,
        } => {
            let length = (duration * sample_rate as f32) as usize;
            let step = core::f32::consts::TAU * freq / sample_rate as f32;
            let samples: Vec<f32> = (0..length)
                .map(|i| amplitude * libm::sinf(i as f32 * step))
                .collect();
            let stereo = StereoSamples::from_mono(samples);
            write_wav_stereo(
                &output,
                &stereo,
                WavSpec {
                    sample_rate,
                    ..WavSpec::default()
                },
            )?;
            println!(
                "Wrote {duration:.2}s {freq:.0} Hz sine to {}",
                output.display()
            );
        }
    }
    Ok(())
}
