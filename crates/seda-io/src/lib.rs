//! WAV file I/O for the seda DSP workspace.
//!
//! The effects operate on deinterleaved stereo blocks, so this crate reads
//! and writes WAV files as [`StereoSamples`]: mono files are duplicated to
//! both channels, files with more channels keep the first two.

mod wav;

pub use wav::{StereoSamples, WavSpec, read_wav_stereo, write_wav_stereo};

/// Error type for audio file operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The file's sample encoding is not supported.
    #[error("unsupported sample format: {0}")]
    UnsupportedFormat(String),
}

/// Result alias for audio file operations.
pub type Result<T> = std::result::Result<T, Error>;
