//! A packed container: sealed header followed by the compressed payload
//!
//! Parsing and verification follow the checks the boot loader performs
//! before inflating: magic, header CRC, then the payload itself.

use crate::compression::traits::create_compressor;
use crate::crc::calculate_crc32;
use crate::error::{HssDeflateError, Result};
use crate::image_header::{header_crc_of, ContainerHeader, HEADER_LENGTH};
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    header: ContainerHeader,
    payload: Vec<u8>,
}

impl Container {
    pub(crate) fn new(header: ContainerHeader, payload: Vec<u8>) -> Self {
        Self { header, payload }
    }

    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    /// The compressed payload
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Total serialized size
    pub fn size(&self) -> usize {
        HEADER_LENGTH + self.payload.len()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(self.size());
        self.write_to(&mut buffer)?;
        Ok(buffer)
    }

    /// Write header and payload, returning the number of bytes written
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<u64> {
        self.header.write_to(writer)?;
        writer.write_all(&self.payload)?;
        Ok(self.size() as u64)
    }

    /// Parse a container, checking the header CRC and the payload bounds
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let header = ContainerHeader::from_bytes(data)?;

        // Hash the raw bytes so reserved padding is covered as well.
        let calculated = header_crc_of(data)?;
        if calculated != header.header_crc {
            return Err(HssDeflateError::crc_mismatch(
                "header",
                header.header_crc,
                calculated,
            ));
        }

        let available = (data.len() - HEADER_LENGTH) as u64;
        if available < header.compressed_image_len {
            return Err(HssDeflateError::invalid_image_data(format!(
                "Container incomplete: expected {} bytes, got {}",
                header.total_size(),
                data.len()
            )));
        }
        if available > header.compressed_image_len {
            return Err(HssDeflateError::invalid_image_data(format!(
                "{} trailing bytes after compressed payload",
                available - header.compressed_image_len
            )));
        }

        let payload = data[HEADER_LENGTH..].to_vec();
        Ok(Self { header, payload })
    }

    /// Read and parse a container file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Check the payload against the header and return the inflated image
    pub fn verify(&self) -> Result<Vec<u8>> {
        let compressed_crc = calculate_crc32(&self.payload);
        if compressed_crc != self.header.compressed_crc {
            return Err(HssDeflateError::crc_mismatch(
                "compressed",
                self.header.compressed_crc,
                compressed_crc,
            ));
        }

        // The level only matters when compressing.
        let compressor = create_compressor(self.header.version, 0)?;
        let original = compressor.decompress(&self.payload)?;

        if original.len() as u64 != self.header.original_image_len {
            return Err(HssDeflateError::length_mismatch(
                "original",
                self.header.original_image_len,
                original.len() as u64,
            ));
        }

        let original_crc = calculate_crc32(&original);
        if original_crc != self.header.original_crc {
            return Err(HssDeflateError::crc_mismatch(
                "original",
                self.header.original_crc,
                original_crc,
            ));
        }

        Ok(original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ContainerBuilder;

    fn packed(data: &[u8]) -> Vec<u8> {
        ContainerBuilder::default()
            .build(data)
            .unwrap()
            .to_bytes()
            .unwrap()
    }

    #[test]
    fn test_parse_and_verify() {
        let bytes = packed(b"bootloader payload");
        let container = Container::from_bytes(&bytes).unwrap();
        assert_eq!(container.size(), bytes.len());
        assert_eq!(container.to_bytes().unwrap(), bytes);
        assert_eq!(container.verify().unwrap(), b"bootloader payload");
    }

    #[test]
    fn test_corrupted_header() {
        let mut bytes = packed(b"payload");
        bytes[41] ^= 0x01;
        assert!(matches!(
            Container::from_bytes(&bytes),
            Err(HssDeflateError::CrcMismatch { what: "header", .. })
        ));
    }

    #[test]
    fn test_nonzero_padding_breaks_header_crc() {
        let mut bytes = packed(b"payload");
        bytes[29] = 0xEE;
        assert!(matches!(
            Container::from_bytes(&bytes),
            Err(HssDeflateError::CrcMismatch { what: "header", .. })
        ));
    }

    #[test]
    fn test_corrupted_payload() {
        let mut bytes = packed(b"payload payload payload");
        let last = bytes.len() - 1;
        bytes[last] ^= 0x80;
        let container = Container::from_bytes(&bytes).unwrap();
        assert!(matches!(
            container.verify(),
            Err(HssDeflateError::CrcMismatch { what: "compressed", .. })
        ));
    }

    #[test]
    fn test_truncated_container() {
        let bytes = packed(b"some longer payload that compresses to a few bytes");
        let result = Container::from_bytes(&bytes[..bytes.len() - 1]);
        assert!(matches!(result, Err(HssDeflateError::InvalidImageData { .. })));
    }

    #[test]
    fn test_trailing_data() {
        let mut bytes = packed(b"payload");
        bytes.push(0);
        let result = Container::from_bytes(&bytes);
        assert!(matches!(result, Err(HssDeflateError::InvalidImageData { .. })));
    }

    #[test]
    fn test_header_only_is_too_short() {
        let bytes = packed(b"payload");
        assert!(Container::from_bytes(&bytes[..HEADER_LENGTH - 8]).is_err());
    }
}
