//! Pipeline glue.
//!
//! Wires preprocessing, the STFT, peak detection, pairing and hashing
//! together behind one validated configuration.

use tracing::debug;

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::hashing::{hash_pairs, Fingerprint};
use crate::pairing::pair_peaks;
use crate::peaks::detect_peaks;
use crate::preprocess::preprocess;
use crate::sample::Sample;
use crate::stft::FftEngine;

/// A ready-to-run fingerprinting pipeline.
///
/// Construction validates the whole configuration and plans the FFT, so
/// `process` only fails on bad input data. The configuration is immutable
/// for the pipeline's lifetime; runs are deterministic functions of the
/// input.
pub struct Pipeline {
    config: PipelineConfig,
    engine: FftEngine,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.peaks.validate()?;
        config.hashing.validate()?;
        if config.window_size > config.fft_size {
            return Err(Error::WindowExceedsFft {
                window: config.window_size,
                fft: config.fft_size,
            });
        }
        if config.hop_size == 0 || config.hop_size > config.window_size {
            return Err(Error::InvalidHop {
                hop: config.hop_size,
                window: config.window_size,
            });
        }
        let engine = FftEngine::new(config.fft_size)?;
        Ok(Self { config, engine })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full chain on one sample and return its fingerprints.
    pub fn process(&self, sample: &Sample) -> Result<Vec<Fingerprint>> {
        let canonical = preprocess(sample)?;
        let spectrogram =
            self.engine
                .stft(&canonical.data, self.config.window_size, self.config.hop_size)?;
        let constellation = detect_peaks(&spectrogram, &self.config.peaks)?;
        let pairs = pair_peaks(&constellation, &self.config.pairing);
        let fingerprints = hash_pairs(&pairs, &self.config.hashing)?;

        debug!(
            samples = canonical.data.len(),
            frames = spectrogram.time_frames,
            peaks = constellation.len(),
            pairs = pairs.len(),
            fingerprints = fingerprints.len(),
            "fingerprint pipeline run"
        );

        Ok(fingerprints)
    }
}
