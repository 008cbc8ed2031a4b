//! Constellation peak detection.
//!
//! Scans the spectrogram for cells that are strict local maxima, gates
//! them against an adaptive regional threshold, then thins the survivors
//! with greedy non-maximum suppression.

use crate::config::PeakConfig;
use crate::error::{Error, Result};
use crate::stft::Spectrogram;

/// Half-width of the square region used for the adaptive threshold mean
/// (an 11x11 region, clipped at the spectrogram edges).
const REGION_RADIUS: isize = 5;

/// A spectral peak, in both grid and physical coordinates.
///
/// `time_seconds` and `frequency_hz` are always the bin indices scaled by
/// the source spectrogram's resolutions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralPeak {
    pub time_frame: usize,
    pub frequency_bin: usize,
    pub magnitude: f32,
    pub time_seconds: f32,
    pub frequency_hz: f32,
}

/// The peaks that survived detection, plus the source spectrogram's
/// dimensions and resolutions.
#[derive(Debug, Clone)]
pub struct ConstellationMap {
    pub peaks: Vec<SpectralPeak>,
    pub time_frames: usize,
    pub frequency_bins: usize,
    pub time_resolution: f32,
    pub freq_resolution: f32,
}

impl ConstellationMap {
    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }
}

/// Extract constellation peaks from a spectrogram.
///
/// Interior cells only (a 3x3 neighbourhood test at an edge would be
/// asymmetric). A candidate must clear the absolute magnitude floor, be
/// strictly greater than all eight neighbours, and reach
/// `mean * (1 + adaptive_factor)` over the surrounding 11x11 region.
/// Candidates then pass through non-maximum suppression in descending
/// magnitude order; ties resolve by scan order (lower frame, then lower
/// bin) via the stable sort.
pub fn detect_peaks(spectrogram: &Spectrogram, config: &PeakConfig) -> Result<ConstellationMap> {
    config.validate()?;
    if spectrogram.is_empty() {
        return Err(Error::EmptySpectrogram);
    }

    let mut candidates = Vec::new();
    for t in 1..spectrogram.time_frames.saturating_sub(1) {
        for f in 1..spectrogram.frequency_bins.saturating_sub(1) {
            let magnitude = spectrogram.magnitude(t, f);
            if magnitude < config.min_magnitude_threshold {
                continue;
            }
            if !is_local_maximum(spectrogram, t, f) {
                continue;
            }
            if magnitude < adaptive_threshold(spectrogram, t, f, config) {
                continue;
            }
            candidates.push(SpectralPeak {
                time_frame: t,
                frequency_bin: f,
                magnitude,
                time_seconds: spectrogram.frame_to_seconds(t),
                frequency_hz: spectrogram.bin_to_hz(f),
            });
        }
    }

    Ok(ConstellationMap {
        peaks: suppress_nearby(candidates, config.min_peak_distance),
        time_frames: spectrogram.time_frames,
        frequency_bins: spectrogram.frequency_bins,
        time_resolution: spectrogram.time_resolution,
        freq_resolution: spectrogram.freq_resolution,
    })
}

/// Strict 3x3 local maximum test; any equal neighbour disqualifies.
fn is_local_maximum(spectrogram: &Spectrogram, t: usize, f: usize) -> bool {
    let center = spectrogram.magnitude(t, f);
    for dt in [-1isize, 0, 1] {
        for df in [-1isize, 0, 1] {
            if dt == 0 && df == 0 {
                continue;
            }
            let tt = (t as isize + dt) as usize;
            let ff = (f as isize + df) as usize;
            if spectrogram.magnitude(tt, ff) >= center {
                return false;
            }
        }
    }
    true
}

/// Mean magnitude over the clipped 11x11 region, scaled by the adaptive
/// factor and floored at the absolute threshold.
fn adaptive_threshold(spectrogram: &Spectrogram, t: usize, f: usize, config: &PeakConfig) -> f32 {
    let mut sum = 0.0f32;
    let mut count = 0u32;
    for dt in -REGION_RADIUS..=REGION_RADIUS {
        for df in -REGION_RADIUS..=REGION_RADIUS {
            let tt = t as isize + dt;
            let ff = f as isize + df;
            if tt < 0
                || ff < 0
                || tt >= spectrogram.time_frames as isize
                || ff >= spectrogram.frequency_bins as isize
            {
                continue;
            }
            sum += spectrogram.magnitude(tt as usize, ff as usize);
            count += 1;
        }
    }
    if count == 0 {
        return config.min_magnitude_threshold;
    }
    let mean = sum / count as f32;
    (mean * (1.0 + config.adaptive_factor)).max(config.min_magnitude_threshold)
}

/// Greedy non-maximum suppression over candidates sorted by magnitude.
///
/// Distances are compared squared, in exact integer arithmetic.
fn suppress_nearby(mut candidates: Vec<SpectralPeak>, min_distance: usize) -> Vec<SpectralPeak> {
    candidates.sort_by(|a, b| b.magnitude.total_cmp(&a.magnitude));
    let min_distance_sq = (min_distance * min_distance) as i64;

    let mut accepted: Vec<SpectralPeak> = Vec::new();
    for peak in candidates {
        let too_close = accepted.iter().any(|other| {
            let dt = peak.time_frame as i64 - other.time_frame as i64;
            let df = peak.frequency_bin as i64 - other.frequency_bin as i64;
            dt * dt + df * df < min_distance_sq
        });
        if !too_close {
            accepted.push(peak);
        }
    }
    accepted
}
