//! Binary serialisation of fingerprint sets.
//!
//! Wire format, all little-endian, packed:
//!
//! ```text
//! u32  count
//! repeat count times:
//!   u32  hash_value
//!   i32  time_offset_ms
//!   f32  anchor_freq_hz
//!   f32  target_freq_hz
//!   i32  time_delta_ms
//! ```
//!
//! Total size is `4 + 20 * count` bytes.

use crate::error::{Error, Result};
use crate::hashing::Fingerprint;

const HEADER_SIZE: usize = 4;
const RECORD_SIZE: usize = 20;

/// Serialise a fingerprint set. Always succeeds.
pub fn encode(fingerprints: &[Fingerprint]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(HEADER_SIZE + fingerprints.len() * RECORD_SIZE);
    bytes.extend_from_slice(&(fingerprints.len() as u32).to_le_bytes());
    for fp in fingerprints {
        bytes.extend_from_slice(&fp.hash_value.to_le_bytes());
        bytes.extend_from_slice(&fp.time_offset_ms.to_le_bytes());
        bytes.extend_from_slice(&fp.anchor_freq_hz.to_le_bytes());
        bytes.extend_from_slice(&fp.target_freq_hz.to_le_bytes());
        bytes.extend_from_slice(&fp.time_delta_ms.to_le_bytes());
    }
    bytes
}

/// Deserialise a fingerprint set.
///
/// Fails with [`Error::Truncated`] when the input is shorter than the
/// header or the declared count overruns the buffer. Trailing bytes past
/// the declared records are ignored.
pub fn decode(bytes: &[u8]) -> Result<Vec<Fingerprint>> {
    if bytes.len() < HEADER_SIZE {
        return Err(Error::Truncated(format!(
            "{} bytes is shorter than the {HEADER_SIZE}-byte header",
            bytes.len()
        )));
    }

    let count = read_u32_le(bytes) as usize;
    let needed = HEADER_SIZE as u64 + count as u64 * RECORD_SIZE as u64;
    if (bytes.len() as u64) < needed {
        return Err(Error::Truncated(format!(
            "header declares {count} fingerprints but only {} payload bytes follow",
            bytes.len() - HEADER_SIZE
        )));
    }

    let mut fingerprints = Vec::with_capacity(count);
    for i in 0..count {
        let record = &bytes[HEADER_SIZE + i * RECORD_SIZE..HEADER_SIZE + (i + 1) * RECORD_SIZE];
        fingerprints.push(Fingerprint {
            hash_value: read_u32_le(&record[0..4]),
            time_offset_ms: read_i32_le(&record[4..8]),
            anchor_freq_hz: read_f32_le(&record[8..12]),
            target_freq_hz: read_f32_le(&record[12..16]),
            time_delta_ms: read_i32_le(&record[16..20]),
        });
    }
    Ok(fingerprints)
}

fn read_u32_le(p: &[u8]) -> u32 {
    u32::from_le_bytes([p[0], p[1], p[2], p[3]])
}

fn read_i32_le(p: &[u8]) -> i32 {
    i32::from_le_bytes([p[0], p[1], p[2], p[3]])
}

fn read_f32_le(p: &[u8]) -> f32 {
    f32::from_le_bytes([p[0], p[1], p[2], p[3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fingerprint(seed: u32) -> Fingerprint {
        Fingerprint {
            hash_value: seed.wrapping_mul(0x9e37_79b9),
            time_offset_ms: seed as i32 * 37,
            anchor_freq_hz: seed as f32 * 11.5,
            target_freq_hz: seed as f32 * 13.25,
            time_delta_ms: seed as i32 % 2000,
        }
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let original: Vec<Fingerprint> = (0..50).map(fingerprint).collect();
        let decoded = decode(&encode(&original)).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn empty_set_is_a_bare_header() {
        let bytes = encode(&[]);
        assert_eq!(bytes, vec![0, 0, 0, 0]);
        assert!(decode(&bytes).unwrap().is_empty());
    }

    #[test]
    fn known_fingerprint_has_a_fixed_wire_image() {
        let fp = Fingerprint {
            hash_value: 0x0102_0304,
            time_offset_ms: 1000,
            anchor_freq_hz: 440.0,
            target_freq_hz: 880.0,
            time_delta_ms: 250,
        };
        let bytes = encode(&[fp]);
        assert_eq!(
            bytes,
            vec![
                0x01, 0x00, 0x00, 0x00, // count
                0x04, 0x03, 0x02, 0x01, // hash
                0xE8, 0x03, 0x00, 0x00, // time offset 1000
                0x00, 0x00, 0xDC, 0x43, // 440.0
                0x00, 0x00, 0x5C, 0x44, // 880.0
                0xFA, 0x00, 0x00, 0x00, // time delta 250
            ]
        );
    }

    #[test]
    fn short_header_is_truncated() {
        assert!(matches!(decode(&[]), Err(Error::Truncated(_))));
        assert!(matches!(decode(&[1, 0, 0]), Err(Error::Truncated(_))));
    }

    #[test]
    fn overrunning_count_is_truncated() {
        let mut bytes = encode(&[fingerprint(1), fingerprint(2)]);
        bytes.truncate(HEADER_SIZE + RECORD_SIZE + 3); // second record cut short
        assert!(matches!(decode(&bytes), Err(Error::Truncated(_))));

        // A count with nothing behind it at all.
        let header_only = 7u32.to_le_bytes();
        assert!(matches!(decode(&header_only), Err(Error::Truncated(_))));
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let mut bytes = encode(&[fingerprint(9)]);
        bytes.extend_from_slice(&[0xAA, 0xBB]);
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded, vec![fingerprint(9)]);
    }
}
