//! Summary statistics over a fingerprint set.
//!
//! Used by ingestion tooling to sanity-check reference sets before they
//! are committed to the index.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hashing::Fingerprint;

/// Aggregate figures for one fingerprint set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FingerprintStats {
    pub count: usize,
    pub min_time_offset_ms: i32,
    pub max_time_offset_ms: i32,
    /// Minimum over both anchor and target frequencies.
    pub min_freq_hz: f32,
    pub max_freq_hz: f32,
    /// Fingerprints per second of spanned audio; zero when all
    /// fingerprints share one time offset.
    pub density_per_sec: f32,
}

/// Summarise a fingerprint set. Returns `None` for an empty set.
pub fn fingerprint_stats(fingerprints: &[Fingerprint]) -> Option<FingerprintStats> {
    let first = fingerprints.first()?;

    let mut min_time = first.time_offset_ms;
    let mut max_time = first.time_offset_ms;
    let mut min_freq = first.anchor_freq_hz.min(first.target_freq_hz);
    let mut max_freq = first.anchor_freq_hz.max(first.target_freq_hz);

    for fp in fingerprints {
        min_time = min_time.min(fp.time_offset_ms);
        max_time = max_time.max(fp.time_offset_ms);
        min_freq = min_freq.min(fp.anchor_freq_hz.min(fp.target_freq_hz));
        max_freq = max_freq.max(fp.anchor_freq_hz.max(fp.target_freq_hz));
    }

    let span_ms = max_time - min_time;
    let density_per_sec = if span_ms > 0 {
        fingerprints.len() as f32 / span_ms as f32 * 1000.0
    } else {
        0.0
    };

    Some(FingerprintStats {
        count: fingerprints.len(),
        min_time_offset_ms: min_time,
        max_time_offset_ms: max_time,
        min_freq_hz: min_freq,
        max_freq_hz: max_freq,
        density_per_sec,
    })
}

impl fmt::Display for FingerprintStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} fingerprints, {}..{} ms, {:.1}..{:.1} Hz, {:.2}/s",
            self.count,
            self.min_time_offset_ms,
            self.max_time_offset_ms,
            self.min_freq_hz,
            self.max_freq_hz,
            self.density_per_sec
        )
    }
}
