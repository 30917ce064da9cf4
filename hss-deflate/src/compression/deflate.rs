//! Raw deflate compressor
//!
//! The boot loader inflates the payload directly, so the stream carries no
//! zlib or gzip framing.

use crate::compression::traits::CompressionInterface;
use crate::error::{HssDeflateError, Result};
use crate::image_types::CompressionVersion;
use flate2::write::DeflateEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};
use std::io::Write;

/// Highest accepted compression level
pub const MAX_LEVEL: u32 = 9;

/// Level used when none is configured
pub const DEFAULT_LEVEL: u32 = 9;

const MIN_OUTPUT_CHUNK: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeflateCompressor {
    level: u32,
}

impl DeflateCompressor {
    /// Create a compressor for the given level (0 = store, 9 = smallest)
    pub fn new(level: u32) -> Result<Self> {
        if level > MAX_LEVEL {
            return Err(HssDeflateError::InvalidCompressionLevel { level });
        }
        Ok(Self { level })
    }
}

impl Default for DeflateCompressor {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL,
        }
    }
}

impl CompressionInterface for DeflateCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = DeflateEncoder::new(
            Vec::with_capacity(data.len() / 2 + 16),
            Compression::new(self.level),
        );
        encoder.write_all(data)?;
        Ok(encoder.finish()?)
    }

    fn decompress(&self, compressed_data: &[u8]) -> Result<Vec<u8>> {
        inflate(compressed_data)
    }

    fn version(&self) -> CompressionVersion {
        CompressionVersion::Deflate
    }

    fn get_name(&self) -> &'static str {
        "deflate"
    }
}

/// Compress `data` as a raw deflate stream
pub fn compress(data: &[u8], level: u32) -> Result<Vec<u8>> {
    DeflateCompressor::new(level)?.compress(data)
}

/// Inflate a raw deflate stream
///
/// The stream must end with a final block and must be followed by nothing;
/// a truncated stream or trailing bytes are reported as corruption.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    inflate(data)
}

fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut inflater = Decompress::new(false);
    let mut output = Vec::with_capacity(data.len().saturating_mul(4).max(MIN_OUTPUT_CHUNK));

    loop {
        if output.len() == output.capacity() {
            output.reserve(output.capacity().max(MIN_OUTPUT_CHUNK));
        }

        let in_before = inflater.total_in();
        let out_before = inflater.total_out();
        let consumed = in_before as usize;

        let status = inflater
            .decompress_vec(&data[consumed..], &mut output, FlushDecompress::None)
            .map_err(|e| HssDeflateError::corrupt_stream(e.to_string()))?;

        match status {
            Status::StreamEnd => break,
            Status::Ok | Status::BufError => {
                let stalled =
                    inflater.total_in() == in_before && inflater.total_out() == out_before;
                if stalled && output.len() < output.capacity() {
                    return Err(HssDeflateError::corrupt_stream(format!(
                        "stream ended early after {} of {} bytes",
                        inflater.total_in(),
                        data.len()
                    )));
                }
            }
        }
    }

    let consumed = inflater.total_in() as usize;
    if consumed != data.len() {
        return Err(HssDeflateError::corrupt_stream(format!(
            "{} trailing bytes after end of stream",
            data.len() - consumed
        )));
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<u8> {
        let mut data = b"PolarFire SoC HSS payload ".repeat(200);
        data.extend((0..=255u8).cycle().take(3000));
        data
    }

    #[test]
    fn test_round_trip_all_levels() {
        let data = sample();
        for level in 0..=MAX_LEVEL {
            let packed = compress(&data, level).unwrap();
            assert_eq!(decompress(&packed).unwrap(), data, "level {level}");
        }
    }

    #[test]
    fn test_empty_round_trip() {
        let packed = compress(&[], 9).unwrap();
        assert!(!packed.is_empty());
        assert!(decompress(&packed).unwrap().is_empty());
    }

    #[test]
    fn test_output_is_raw_deflate() {
        // A zlib stream at level 9 would start with 0x78 0xDA.
        let packed = compress(b"HELLO", 9).unwrap();
        assert_ne!(&packed[..2], &[0x78, 0xDA]);
        assert_eq!(decompress(&packed).unwrap(), b"HELLO");
    }

    #[test]
    fn test_compressible_data_shrinks() {
        let data = vec![0u8; 64 * 1024];
        let packed = compress(&data, 9).unwrap();
        assert!(packed.len() < data.len() / 10);
    }

    #[test]
    fn test_deterministic() {
        let data = sample();
        assert_eq!(compress(&data, 6).unwrap(), compress(&data, 6).unwrap());
    }

    #[test]
    fn test_invalid_level() {
        assert!(matches!(
            DeflateCompressor::new(10),
            Err(HssDeflateError::InvalidCompressionLevel { level: 10 })
        ));
    }

    #[test]
    fn test_truncated_stream() {
        let packed = compress(&sample(), 9).unwrap();
        let result = decompress(&packed[..packed.len() / 2]);
        assert!(matches!(result, Err(HssDeflateError::CorruptStream { .. })));
    }

    #[test]
    fn test_trailing_bytes() {
        let mut packed = compress(b"HELLO", 9).unwrap();
        packed.extend_from_slice(&[0xAA, 0xBB]);
        let result = decompress(&packed);
        assert!(matches!(result, Err(HssDeflateError::CorruptStream { .. })));
    }

    #[test]
    fn test_garbage_stream() {
        let result = decompress(&[0xFF; 32]);
        assert!(matches!(result, Err(HssDeflateError::CorruptStream { .. })));
    }

    #[test]
    fn test_empty_input_is_not_a_stream() {
        let result = decompress(&[]);
        assert!(matches!(result, Err(HssDeflateError::CorruptStream { .. })));
    }
}
