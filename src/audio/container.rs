//! Raw PCM to WAV container encoding.
//!
//! The speech model returns base64 text carrying headerless 16-bit PCM. This
//! module turns that into bytes and wraps them in the canonical 44-byte
//! RIFF/WAVE header so ordinary players can open the result.

use crate::error::{NewscasterError, Result};
use base64::{engine::general_purpose, Engine as _};

/// Size of the canonical PCM WAV header.
pub const HEADER_LEN: usize = 44;

/// Sample rate of the speech model's output.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

const NUM_CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;
const FORMAT_PCM: u16 = 1;
const FMT_CHUNK_LEN: u32 = 16;

/// Decode standard-alphabet base64 into the bytes it carries.
pub fn decode_bytes(transport_text: &str) -> Result<Vec<u8>> {
    general_purpose::STANDARD
        .decode(transport_text.trim())
        .map_err(|e| NewscasterError::Decode(e.to_string()))
}

/// Wrap raw PCM in a mono 16-bit WAV container.
///
/// `pcm` is written verbatim and is assumed to already be signed 16-bit
/// little-endian mono at `sample_rate`. Nothing here checks that.
pub fn encode_container(pcm: &[u8], sample_rate: u32) -> Vec<u8> {
    let data_len = pcm.len() as u32;
    let block_align = NUM_CHANNELS * (BITS_PER_SAMPLE / 8);
    let byte_rate = sample_rate * u32::from(block_align);

    let mut wav = Vec::with_capacity(HEADER_LEN + pcm.len());
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
    wav.extend_from_slice(&FORMAT_PCM.to_le_bytes());
    wav.extend_from_slice(&NUM_CHANNELS.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.extend_from_slice(pcm);
    wav
}

/// Header fields read back from a canonical WAV buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerInfo {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub byte_rate: u32,
    pub data_len: u32,
}

impl ContainerInfo {
    /// Parse the 44-byte header written by [`encode_container`].
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(NewscasterError::Decode(format!(
                "WAV buffer too short ({} bytes)",
                bytes.len()
            )));
        }
        if &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
            return Err(NewscasterError::Decode("Missing RIFF/WAVE markers".to_string()));
        }
        if &bytes[12..16] != b"fmt " || &bytes[36..40] != b"data" {
            return Err(NewscasterError::Decode("Unexpected chunk layout".to_string()));
        }

        let u16_at = |i: usize| u16::from_le_bytes([bytes[i], bytes[i + 1]]);
        let u32_at =
            |i: usize| u32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);

        Ok(Self {
            channels: u16_at(22),
            sample_rate: u32_at(24),
            byte_rate: u32_at(28),
            bits_per_sample: u16_at(34),
            data_len: u32_at(40),
        })
    }

    /// Playback length in seconds, or `None` for a zero byte rate.
    pub fn duration_seconds(&self) -> Option<f64> {
        if self.byte_rate == 0 {
            return None;
        }
        Some(f64::from(self.data_len) / f64::from(self.byte_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u16_at(b: &[u8], i: usize) -> u16 {
        u16::from_le_bytes([b[i], b[i + 1]])
    }

    fn u32_at(b: &[u8], i: usize) -> u32 {
        u32::from_le_bytes([b[i], b[i + 1], b[i + 2], b[i + 3]])
    }

    #[test]
    fn test_header_layout() {
        let pcm = vec![0x11u8; 1000];
        let wav = encode_container(&pcm, DEFAULT_SAMPLE_RATE);

        assert_eq!(wav.len(), 44 + 1000);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(u32_at(&wav, 4), 36 + 1000);
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(u32_at(&wav, 16), 16);
        assert_eq!(u16_at(&wav, 20), 1);
        assert_eq!(u16_at(&wav, 22), 1);
        assert_eq!(u32_at(&wav, 24), 24_000);
        assert_eq!(u32_at(&wav, 28), 48_000);
        assert_eq!(u16_at(&wav, 32), 2);
        assert_eq!(u16_at(&wav, 34), 16);
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(u32_at(&wav, 40), 1000);
        assert_eq!(&wav[44..], &pcm[..]);
    }

    #[test]
    fn test_empty_pcm() {
        let wav = encode_container(&[], 8000);
        assert_eq!(wav.len(), HEADER_LEN);
        assert_eq!(u32_at(&wav, 4), 36);
        assert_eq!(u32_at(&wav, 40), 0);
    }

    #[test]
    fn test_odd_length_pcm_is_kept_verbatim() {
        let pcm = [1u8, 2, 3];
        let wav = encode_container(&pcm, DEFAULT_SAMPLE_RATE);
        assert_eq!(wav.len(), 47);
        assert_eq!(&wav[44..], &pcm);
    }

    #[test]
    fn test_decode_bytes() {
        assert_eq!(decode_bytes("AAEC/w==").unwrap(), vec![0, 1, 2, 255]);
        assert_eq!(decode_bytes("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_decode_rejects_malformed_input() {
        assert!(matches!(decode_bytes("AA*C"), Err(NewscasterError::Decode(_))));
        assert!(matches!(decode_bytes("AAE"), Err(NewscasterError::Decode(_))));
        assert!(matches!(decode_bytes("A==="), Err(NewscasterError::Decode(_))));
    }

    #[test]
    fn test_info_reads_back_header() {
        let wav = encode_container(&vec![0u8; 48_000 * 3], DEFAULT_SAMPLE_RATE);
        let info = ContainerInfo::parse(&wav).unwrap();
        assert_eq!(info.sample_rate, 24_000);
        assert_eq!(info.channels, 1);
        assert_eq!(info.bits_per_sample, 16);
        assert_eq!(info.duration_seconds(), Some(3.0));
    }

    #[test]
    fn test_info_rejects_foreign_bytes() {
        assert!(ContainerInfo::parse(b"not a wav").is_err());
        assert!(ContainerInfo::parse(&[0u8; 64]).is_err());
    }
}
