//! Landmark pair formation.

use crate::config::PairingConfig;
use crate::peaks::{ConstellationMap, SpectralPeak};

/// An anchor peak paired with a strictly later target peak, with the
/// deltas cached for hashing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandmarkPair {
    pub anchor: SpectralPeak,
    pub target: SpectralPeak,
    pub time_delta_ms: i32,
    pub freq_delta_hz: f32,
}

impl LandmarkPair {
    pub fn new(anchor: SpectralPeak, target: SpectralPeak) -> Self {
        Self {
            time_delta_ms: ((target.time_seconds - anchor.time_seconds) * 1000.0) as i32,
            freq_delta_hz: target.frequency_hz - anchor.frequency_hz,
            anchor,
            target,
        }
    }
}

/// Form every (anchor, target) pair within the configured gates.
///
/// Peaks are stable-sorted by time; each anchor walks forward until the
/// time gate is exceeded. Targets at exactly the anchor's time are
/// skipped, so every pair has a strictly positive time delta.
pub fn pair_peaks(constellation: &ConstellationMap, config: &PairingConfig) -> Vec<LandmarkPair> {
    let mut sorted = constellation.peaks.clone();
    sorted.sort_by(|a, b| a.time_seconds.total_cmp(&b.time_seconds));

    let mut pairs = Vec::new();
    for (i, anchor) in sorted.iter().enumerate() {
        for target in &sorted[i + 1..] {
            let time_delta_ms = (target.time_seconds - anchor.time_seconds) * 1000.0;
            if time_delta_ms > config.max_time_delta_ms as f32 {
                break;
            }
            if time_delta_ms <= 0.0 {
                continue;
            }
            if (target.frequency_hz - anchor.frequency_hz).abs() <= config.max_freq_delta_hz {
                pairs.push(LandmarkPair::new(*anchor, *target));
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(time_seconds: f32, frequency_hz: f32) -> SpectralPeak {
        SpectralPeak {
            time_frame: 0,
            frequency_bin: 0,
            magnitude: 1.0,
            time_seconds,
            frequency_hz,
        }
    }

    fn constellation(peaks: Vec<SpectralPeak>) -> ConstellationMap {
        ConstellationMap {
            peaks,
            time_frames: 100,
            frequency_bins: 1025,
            time_resolution: 1024.0 / 11_025.0,
            freq_resolution: 11_025.0 / 2048.0,
        }
    }

    #[test]
    fn pairs_form_inside_both_gates() {
        let map = constellation(vec![
            peak(0.0, 1000.0),
            peak(0.5, 1500.0),
            peak(0.5, 1200.0),
            peak(3.0, 1100.0),
        ]);

        let pairs = pair_peaks(&map, &PairingConfig::default());
        // Anchor at 0.0 pairs with both 0.5 s peaks; the 3.0 s peak is
        // beyond the 2000 ms gate of every anchor, and the two 0.5 s
        // peaks are simultaneous.
        assert_eq!(pairs.len(), 2);
        for pair in &pairs {
            assert_eq!(pair.anchor.time_seconds, 0.0);
            assert_eq!(pair.time_delta_ms, 500);
        }
    }

    #[test]
    fn equal_time_peaks_never_pair() {
        let map = constellation(vec![peak(0.5, 1000.0), peak(0.5, 1100.0)]);
        assert!(pair_peaks(&map, &PairingConfig::default()).is_empty());
    }

    #[test]
    fn frequency_gate_excludes_distant_targets() {
        let map = constellation(vec![peak(0.0, 500.0), peak(0.5, 3000.0)]);
        assert!(pair_peaks(&map, &PairingConfig::default()).is_empty());

        let map = constellation(vec![peak(0.0, 500.0), peak(0.5, 2500.0)]);
        let pairs = pair_peaks(&map, &PairingConfig::default());
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].freq_delta_hz, 2000.0);
    }

    #[test]
    fn anchors_are_always_earlier_than_targets() {
        let map = constellation(vec![
            peak(1.2, 800.0),
            peak(0.3, 600.0),
            peak(0.9, 700.0),
        ]);

        let pairs = pair_peaks(&map, &PairingConfig::default());
        assert_eq!(pairs.len(), 3);
        for pair in &pairs {
            assert!(pair.target.time_seconds > pair.anchor.time_seconds);
            assert!(pair.time_delta_ms > 0);
            assert!(pair.time_delta_ms <= 2000);
        }
    }

    #[test]
    fn empty_constellation_yields_no_pairs() {
        let map = constellation(vec![]);
        assert!(pair_peaks(&map, &PairingConfig::default()).is_empty());
    }

    #[test]
    fn deltas_are_cached_on_the_pair() {
        let pair = LandmarkPair::new(peak(0.25, 400.0), peak(0.75, 300.0));
        assert_eq!(pair.time_delta_ms, 500);
        assert_eq!(pair.freq_delta_hz, -100.0);
    }
}
