//! WAV reading and writing on top of `hound`.

use crate::Result;
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// WAV file specification.
#[derive(Debug, Clone, Copy)]
pub struct WavSpec {
    /// Number of audio channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
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

/// Deinterleaved stereo sample buffers.
#[derive(Debug, Clone, Default)]
pub struct StereoSamples {
    /// Left channel.
    pub left: Vec<f32>,
    /// Right channel.
    pub right: Vec<f32>,
}

impl StereoSamples {
    /// Wraps two equally long channel buffers.
    ///
    /// # Panics
    ///
    /// Panics if the channels differ in length.
    pub fn new(left: Vec<f32>, right: Vec<f32>) -> Self {
        assert_eq!(left.len(), right.len(), "channel lengths must match");
        Self { left, right }
    }

    /// Duplicates a mono buffer to both channels.
    pub fn from_mono(samples: Vec<f32>) -> Self {
        Self {
            right: samples.clone(),
            left: samples,
        }
    }

    /// Splits an interleaved L/R stream.
    pub fn from_interleaved(samples: &[f32]) -> Self {
        let mut left = Vec::with_capacity(samples.len() / 2);
        let mut right = Vec::with_capacity(samples.len() / 2);
        for pair in samples.chunks_exact(2) {
            left.push(pair[0]);
            right.push(pair[1]);
        }
        Self { left, right }
    }

    /// Frames per channel.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// True when no frames are held.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

fn decode_samples(reader: WavReader<std::io::BufReader<std::fs::File>>) -> Result<Vec<f32>> {
    let spec = reader.spec();
    match spec.sample_format {
        SampleFormat::Float => Ok(reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?),
        SampleFormat::Int => {
            let max_val = (1i32 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val).map_err(Into::into))
                .collect()
        }
    }
}

/// Reads a WAV file as stereo samples plus its spec.
///
/// Mono files are duplicated to both channels; files with more than two
/// channels keep the first two.
pub fn read_wav_stereo<P: AsRef<Path>>(path: P) -> Result<(StereoSamples, WavSpec)> {
    let reader = WavReader::open(&path)?;
    let spec = WavSpec::from(reader.spec());
    let channels = spec.channels as usize;
    let samples = decode_samples(reader)?;

    let stereo = match channels {
        1 => StereoSamples::from_mono(samples),
        2 => StereoSamples::from_interleaved(&samples),
        _ => {
            let mut left = Vec::with_capacity(samples.len() / channels);
            let mut right = Vec::with_capacity(samples.len() / channels);
            for frame in samples.chunks(channels) {
                left.push(frame[0]);
                right.push(frame.get(1).copied().unwrap_or(frame[0]));
            }
            StereoSamples::new(left, right)
        }
    };

    tracing::debug!(
        frames = stereo.len(),
        sample_rate = spec.sample_rate,
        channels,
        "loaded wav"
    );
    Ok((stereo, spec))
}

/// Writes stereo samples to a WAV file.
///
/// 32-bit output is written as IEEE float, other depths as PCM integers.
pub fn write_wav_stereo<P: AsRef<Path>>(
    path: P,
    samples: &StereoSamples,
    spec: WavSpec,
) -> Result<()> {
    let mut stereo_spec = spec;
    stereo_spec.channels = 2;
    let mut writer = WavWriter::create(&path, hound::WavSpec::from(stereo_spec))?;

    if stereo_spec.bits_per_sample == 32 {
        for (l, r) in samples.left.iter().zip(samples.right.iter()) {
            writer.write_sample(*l)?;
            writer.write_sample(*r)?;
        }
    } else {
        let max_val = (1i32 << (stereo_spec.bits_per_sample - 1)) as f32;
        for (l, r) in samples.left.iter().zip(samples.right.iter()) {
            writer.write_sample((*l * max_val).clamp(-max_val, max_val - 1.0) as i32)?;
            writer.write_sample((*r * max_val).clamp(-max_val, max_val - 1.0) as i32)?;
        }
    }

    writer.finalize()?;
    tracing::debug!(frames = samples.len(), "wrote wav");
    Ok(())
}
