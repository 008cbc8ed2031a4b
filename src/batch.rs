//! Batch driver for reference-set ingestion.
//!
//! Runs the pipeline over many tracks, capturing per-item failures so one
//! bad track never aborts the rest. Items execute in parallel; results
//! stay aligned with the inputs.

use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hashing::Fingerprint;
use crate::pipeline::Pipeline;
use crate::sample::Sample;

/// The outcome of fingerprinting one track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub song_id: String,
    /// Empty when the item failed.
    pub fingerprints: Vec<Fingerprint>,
    /// Duration of the input sample, regardless of outcome.
    pub total_duration_ms: u32,
    /// Wall-clock time spent on this item.
    pub processing_time_ms: u64,
    pub success: bool,
    /// Empty on success.
    pub error_message: String,
}

impl Pipeline {
    /// Fingerprint `samples[i]` as `song_ids[i]` for every i.
    ///
    /// The lists must be the same length; that is checked before any work
    /// starts. Per-item errors are recorded in the corresponding result.
    pub fn process_batch(
        &self,
        samples: &[Sample],
        song_ids: &[String],
    ) -> Result<Vec<BatchResult>> {
        if samples.len() != song_ids.len() {
            return Err(Error::BatchLengthMismatch {
                samples: samples.len(),
                ids: song_ids.len(),
            });
        }

        Ok(samples
            .par_iter()
            .zip(song_ids.par_iter())
            .map(|(sample, song_id)| self.process_item(sample, song_id))
            .collect())
    }

    fn process_item(&self, sample: &Sample, song_id: &str) -> BatchResult {
        let started = Instant::now();
        let outcome = self.process(sample);
        let processing_time_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(fingerprints) => BatchResult {
                song_id: song_id.to_owned(),
                fingerprints,
                total_duration_ms: sample.duration_ms(),
                processing_time_ms,
                success: true,
                error_message: String::new(),
            },
            Err(error) => {
                tracing::warn!(song_id, %error, "batch item failed");
                BatchResult {
                    song_id: song_id.to_owned(),
                    fingerprints: Vec::new(),
                    total_duration_ms: sample.duration_ms(),
                    processing_time_ms,
                    success: false,
                    error_message: error.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;

    fn pipeline() -> Pipeline {
        Pipeline::new(PipelineConfig::default()).unwrap()
    }

    fn tone(len: usize) -> Sample {
        let data = (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 11_025.0).sin())
            .collect();
        Sample::new(data, 11_025, 1)
    }

    #[test]
    fn mismatched_lists_fail_before_processing() {
        let result = pipeline().process_batch(&[tone(4096)], &[]);
        assert!(matches!(
            result,
            Err(Error::BatchLengthMismatch { samples: 1, ids: 0 })
        ));
    }

    #[test]
    fn one_bad_item_does_not_poison_the_batch() {
        let samples = vec![tone(11_025), Sample::new(vec![], 11_025, 1)];
        let ids = vec!["good".to_string(), "bad".to_string()];

        let results = pipeline().process_batch(&samples, &ids).unwrap();
        assert_eq!(results.len(), 2);

        assert_eq!(results[0].song_id, "good");
        assert!(results[0].success);
        assert!(results[0].error_message.is_empty());
        assert_eq!(results[0].total_duration_ms, 1000);

        assert_eq!(results[1].song_id, "bad");
        assert!(!results[1].success);
        assert!(!results[1].error_message.is_empty());
        assert!(results[1].fingerprints.is_empty());
    }

    #[test]
    fn results_align_with_inputs() {
        let samples: Vec<Sample> = (0..8).map(|_| tone(4096)).collect();
        let ids: Vec<String> = (0..8).map(|i| format!("song-{i}")).collect();

        let results = pipeline().process_batch(&samples, &ids).unwrap();
        assert_eq!(results.len(), 8);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.song_id, format!("song-{i}"));
        }
    }
}
