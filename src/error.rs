//! Error types for the fingerprinting pipeline.

use thiserror::Error;

/// Error type for all pipeline stages.
///
/// Stages fail fast; the batch driver is the only place where errors are
/// caught and attributed to an item instead of propagated.
#[derive(Error, Debug)]
pub enum Error {
    #[error("input buffer is empty")]
    EmptyInput,

    #[error("interleaved stereo buffer must have even length, got {0}")]
    OddStereoLength(usize),

    #[error("channel count must be at least 1")]
    NoChannels,

    #[error("unsupported channel count: {0}")]
    UnsupportedChannels(u16),

    #[error("sample rate must be positive, got {0}")]
    InvalidSampleRate(u32),

    #[error("fft size must be a positive power of two, got {0}")]
    InvalidFftSize(usize),

    #[error("window size {window} exceeds fft size {fft}")]
    WindowExceedsFft { window: usize, fft: usize },

    #[error("hop size {hop} is invalid for window size {window}")]
    InvalidHop { hop: usize, window: usize },

    #[error("spectrogram contains no data")]
    EmptySpectrogram,

    #[error("minimum peak distance must be at least 1")]
    InvalidPeakDistance(usize),

    #[error("adaptive factor must lie in [0, 1], got {0}")]
    InvalidAdaptiveFactor(f32),

    #[error("magnitude threshold must be non-negative, got {0}")]
    InvalidMagnitudeThreshold(f32),

    #[error("frequency quantization must be positive, got {0}")]
    InvalidFreqQuantization(f32),

    #[error("time quantization must be positive, got {0}")]
    InvalidTimeQuantization(i32),

    #[error("batch inputs misaligned: {samples} samples, {ids} song ids")]
    BatchLengthMismatch { samples: usize, ids: usize },

    #[error("fingerprint data truncated: {0}")]
    Truncated(String),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
