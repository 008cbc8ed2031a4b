//! Landmark-based audio fingerprinting core.
//!
//! Converts decoded PCM into a compact set of hash-based fingerprints
//! suitable for indexing in a reference database. The chain:
//!
//! 1. preprocess: downmix to mono, resample to 11 025 Hz, peak-normalise
//! 2. STFT: overlapping Hann-windowed frames, magnitude spectra
//! 3. peak detection: strict local maxima + adaptive threshold + NMS
//! 4. pairing: anchor/target pairs within time and frequency gates
//! 5. hashing: quantise pair coordinates into a 32-bit hash
//!
//! [`process_sample`] runs the whole chain with default parameters;
//! [`Pipeline`] does the same under an explicit configuration, and
//! [`encode`]/[`decode`] give the deterministic binary form used for
//! persistence and transport.

mod batch;
mod codec;
mod config;
mod error;
mod hashing;
mod pairing;
mod peaks;
mod pipeline;
mod preprocess;
mod sample;
mod stats;
mod stft;

pub use batch::BatchResult;
pub use codec::{decode, encode};
pub use config::{
    HashConfig, PairingConfig, PeakConfig, PipelineConfig, CANONICAL_SAMPLE_RATE,
    DEFAULT_FFT_SIZE, DEFAULT_HOP_SIZE, DEFAULT_WINDOW_SIZE,
};
pub use error::{Error, Result};
pub use hashing::{hash_pair, hash_pairs, Fingerprint};
pub use pairing::{pair_peaks, LandmarkPair};
pub use peaks::{detect_peaks, ConstellationMap, SpectralPeak};
pub use pipeline::Pipeline;
pub use preprocess::{
    apply_window, hamming_window, hann_window, normalize, preprocess, resample_linear,
    stereo_to_mono,
};
pub use sample::Sample;
pub use stats::{fingerprint_stats, FingerprintStats};
pub use stft::{stft, FftEngine, Spectrogram};

/// Fingerprint one sample with the default configuration.
pub fn process_sample(sample: &Sample) -> Result<Vec<Fingerprint>> {
    Pipeline::new(PipelineConfig::default())?.process(sample)
}

/// Fingerprint many samples with the default configuration.
///
/// See [`Pipeline::process_batch`] for the per-item semantics.
pub fn batch_process(samples: &[Sample], song_ids: &[String]) -> Result<Vec<BatchResult>> {
    Pipeline::new(PipelineConfig::default())?.process_batch(samples, song_ids)
}
