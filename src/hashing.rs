//! Fingerprint hashing.
//!
//! Quantises each landmark pair's coordinates to 16 bits, mixes each
//! quantised value independently and XORs the results into a 32-bit hash.
//! The mix sequence and the XOR combination are a wire contract: they
//! must stay bit-exact so fingerprints remain comparable across builds
//! and hosts. The XOR is commutative in its three inputs; that collision
//! class is part of the contract and is deliberately left as is.

use serde::{Deserialize, Serialize};

use crate::config::HashConfig;
use crate::error::Result;
use crate::pairing::LandmarkPair;

/// One fingerprint: the pair hash, tagged with the anchor's absolute
/// time offset plus diagnostic fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub hash_value: u32,
    pub time_offset_ms: i32,
    pub anchor_freq_hz: f32,
    pub target_freq_hz: f32,
    pub time_delta_ms: i32,
}

/// Hash every pair into a fingerprint.
pub fn hash_pairs(pairs: &[LandmarkPair], config: &HashConfig) -> Result<Vec<Fingerprint>> {
    config.validate()?;
    Ok(pairs
        .iter()
        .map(|pair| Fingerprint {
            hash_value: hash_pair(pair, config),
            time_offset_ms: (pair.anchor.time_seconds * 1000.0).round() as i32,
            anchor_freq_hz: pair.anchor.frequency_hz,
            target_freq_hz: pair.target.frequency_hz,
            time_delta_ms: pair.time_delta_ms,
        })
        .collect())
}

/// The 32-bit hash of one pair under the given quantisation.
pub fn hash_pair(pair: &LandmarkPair, config: &HashConfig) -> u32 {
    let anchor = quantize_frequency(pair.anchor.frequency_hz, config.freq_quantization_hz);
    let target = quantize_frequency(pair.target.frequency_hz, config.freq_quantization_hz);
    let delta = quantize_time(pair.time_delta_ms, config.time_quantization_ms);
    mix(u32::from(anchor)) ^ mix(u32::from(target)) ^ mix(u32::from(delta))
}

// Float-to-int `as` casts saturate, which gives the 0..=65535 clamp (and
// maps NaN to 0).
fn quantize_frequency(hz: f32, quantization_hz: f32) -> u16 {
    (hz.max(0.0) / quantization_hz) as u16
}

fn quantize_time(ms: i32, quantization_ms: i32) -> u16 {
    (ms.max(0) / quantization_ms).min(65_535) as u16
}

/// Jenkins-style integer mix; all arithmetic mod 2^32, shifts logical.
fn mix(v: u32) -> u32 {
    let mut v = v;
    v = v.wrapping_add(0x7ed5_5d16).wrapping_add(v << 12);
    v = (v ^ 0xc761_c23c) ^ (v >> 19);
    v = v.wrapping_add(0x1656_67b1).wrapping_add(v << 5);
    v = v.wrapping_add(0xd3a2_646c) ^ (v << 9);
    v = v.wrapping_add(0xfd70_46c5).wrapping_add(v << 3);
    v = (v ^ 0xb55a_4f09) ^ (v >> 16);
    v
}
