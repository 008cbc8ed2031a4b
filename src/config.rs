//! Stage configuration values.
//!
//! Every stage takes an immutable config; a [`crate::Pipeline`] validates
//! the whole set once at construction. Defaults match the reference
//! fingerprint parameters, so two instances built from defaults produce
//! interchangeable hashes.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Sample rate of canonical (preprocessed) audio, in Hz.
pub const CANONICAL_SAMPLE_RATE: u32 = 11_025;

/// Default FFT size in samples. Must be a power of two.
pub const DEFAULT_FFT_SIZE: usize = 2048;

/// Default STFT window size in samples.
pub const DEFAULT_WINDOW_SIZE: usize = 2048;

/// Default STFT hop size in samples (50% overlap).
pub const DEFAULT_HOP_SIZE: usize = 1024;

/// Peak detection parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PeakConfig {
    /// Minimum Euclidean distance between accepted peaks, in the
    /// (time frame, frequency bin) grid.
    pub min_peak_distance: usize,
    /// Factor applied on top of the local mean magnitude; a peak must
    /// reach `mean * (1 + adaptive_factor)`. Must lie in `[0, 1]`.
    pub adaptive_factor: f32,
    /// Absolute magnitude floor below which cells are never peaks.
    pub min_magnitude_threshold: f32,
}

impl Default for PeakConfig {
    fn default() -> Self {
        Self {
            min_peak_distance: 3,
            adaptive_factor: 0.7,
            min_magnitude_threshold: 0.01,
        }
    }
}

impl PeakConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_peak_distance < 1 {
            return Err(Error::InvalidPeakDistance(self.min_peak_distance));
        }
        if !(0.0..=1.0).contains(&self.adaptive_factor) {
            return Err(Error::InvalidAdaptiveFactor(self.adaptive_factor));
        }
        if self.min_magnitude_threshold < 0.0 {
            return Err(Error::InvalidMagnitudeThreshold(self.min_magnitude_threshold));
        }
        Ok(())
    }
}

/// Landmark pairing gates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PairingConfig {
    /// Maximum anchor-to-target distance in milliseconds.
    pub max_time_delta_ms: i32,
    /// Maximum absolute anchor-to-target frequency difference in Hz.
    pub max_freq_delta_hz: f32,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            max_time_delta_ms: 2000,
            max_freq_delta_hz: 2000.0,
        }
    }
}

/// Hash quantisation parameters.
///
/// These are part of the wire contract: reference and query sides must
/// agree on them for hashes to match.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HashConfig {
    /// Hz per quantisation step for peak frequencies.
    pub freq_quantization_hz: f32,
    /// Milliseconds per quantisation step for pair time deltas.
    pub time_quantization_ms: i32,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            freq_quantization_hz: 10.0,
            time_quantization_ms: 50,
        }
    }
}

impl HashConfig {
    pub fn validate(&self) -> Result<()> {
        if self.freq_quantization_hz <= 0.0 {
            return Err(Error::InvalidFreqQuantization(self.freq_quantization_hz));
        }
        if self.time_quantization_ms <= 0 {
            return Err(Error::InvalidTimeQuantization(self.time_quantization_ms));
        }
        Ok(())
    }
}

/// Configuration for a full A-to-E pipeline run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub fft_size: usize,
    pub window_size: usize,
    pub hop_size: usize,
    pub peaks: PeakConfig,
    pub pairing: PairingConfig,
    pub hashing: HashConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fft_size: DEFAULT_FFT_SIZE,
            window_size: DEFAULT_WINDOW_SIZE,
            hop_size: DEFAULT_HOP_SIZE,
            peaks: PeakConfig::default(),
            pairing: PairingConfig::default(),
            hashing: HashConfig::default(),
        }
    }
}
