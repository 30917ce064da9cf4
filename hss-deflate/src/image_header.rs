//! Compressed container header structure and serialization
//!
//! The layout matches the boot loader's `struct HSS_CompressedImage` as laid
//! out with `#pragma pack(8)` on a 64-bit target:
//!
//! | offset | size | field                |
//! |--------|------|----------------------|
//! | 0      | 4    | magic                |
//! | 4      | 4    | version              |
//! | 8      | 8    | header length        |
//! | 16     | 4    | header CRC           |
//! | 20     | 4    | compressed CRC       |
//! | 24     | 4    | original CRC (+4 pad)|
//! | 32     | 8    | compressed length    |
//! | 40     | 8    | original length      |
//! | 48     | 32   | hash                 |
//! | 80     | 32   | ECDSA signature      |

use crate::crc::{calculate_crc32, calculate_crc32_parts};
use crate::error::{HssDeflateError, Result};
use crate::image_types::CompressionVersion;
use crate::HSS_COMPRESSED_MAGIC;
use byte_unit::Byte;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read, Write};

/// Serialized header size in bytes
pub const HEADER_LENGTH: usize = 112;

/// Size of the reserved hash field
pub const HASH_LEN: usize = 32;

/// Size of the reserved signature field
pub const ECDSA_SIG_LEN: usize = 32;

/// Byte offset of the header CRC field
pub const HEADER_CRC_OFFSET: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    pub magic: u32,
    pub version: CompressionVersion,
    pub header_length: u32,
    /// CRC-32 of the serialized header with this field set to zero
    pub header_crc: u32,
    pub compressed_crc: u32,
    pub original_crc: u32,
    pub compressed_image_len: u64,
    pub original_image_len: u64,
    /// Filled in by the signing stage; always zero here
    pub hash: [u8; HASH_LEN],
    /// Filled in by the signing stage; always zero here
    pub ecdsa_sig: [u8; ECDSA_SIG_LEN],
}

impl Default for ContainerHeader {
    fn default() -> Self {
        Self {
            magic: HSS_COMPRESSED_MAGIC,
            version: CompressionVersion::Deflate,
            header_length: HEADER_LENGTH as u32,
            header_crc: 0,
            compressed_crc: 0,
            original_crc: 0,
            compressed_image_len: 0,
            original_image_len: 0,
            hash: [0; HASH_LEN],
            ecdsa_sig: [0; ECDSA_SIG_LEN],
        }
    }
}

impl ContainerHeader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the fixed fields
    pub fn validate(&self) -> Result<()> {
        if self.magic != HSS_COMPRESSED_MAGIC {
            return Err(HssDeflateError::invalid_magic(
                HSS_COMPRESSED_MAGIC,
                self.magic,
            ));
        }

        if !self.version.is_supported() {
            return Err(HssDeflateError::UnsupportedVersion {
                version: self.version.into(),
            });
        }

        if self.header_length as usize != HEADER_LENGTH {
            return Err(HssDeflateError::InvalidHeaderLength {
                expected: HEADER_LENGTH as u64,
                actual: self.header_length as u64,
            });
        }

        Ok(())
    }

    /// Serialize the header to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(HEADER_LENGTH);
        self.write_to(&mut buffer)?;
        Ok(buffer)
    }

    /// Write the header to a writer
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<LittleEndian>(self.magic)?;
        writer.write_u32::<LittleEndian>(self.version.into())?;

        // size_t on the consumer side: low word plus zero padding
        writer.write_u32::<LittleEndian>(self.header_length)?;
        writer.write_u32::<LittleEndian>(0)?;

        writer.write_u32::<LittleEndian>(self.header_crc)?;
        writer.write_u32::<LittleEndian>(self.compressed_crc)?;
        writer.write_u32::<LittleEndian>(self.original_crc)?;
        writer.write_u32::<LittleEndian>(0)?;

        writer.write_u64::<LittleEndian>(self.compressed_image_len)?;
        writer.write_u64::<LittleEndian>(self.original_image_len)?;

        writer.write_all(&self.hash)?;
        writer.write_all(&self.ecdsa_sig)?;

        Ok(())
    }

    /// Compute the header CRC over the serialized header with the CRC field zeroed
    pub fn compute_crc(&self) -> Result<u32> {
        let mut unsealed = self.clone();
        unsealed.header_crc = 0;
        Ok(calculate_crc32(&unsealed.to_bytes()?))
    }

    /// Store the header CRC; the header is not self-consistent until this is called
    pub fn seal(&mut self) -> Result<()> {
        self.header_crc = self.compute_crc()?;
        Ok(())
    }

    /// Check the stored header CRC against a fresh computation
    pub fn verify_crc(&self) -> Result<()> {
        let calculated = self.compute_crc()?;
        if calculated != self.header_crc {
            return Err(HssDeflateError::crc_mismatch(
                "header",
                self.header_crc,
                calculated,
            ));
        }
        Ok(())
    }

    /// Deserialize and validate a header from the start of `data`
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_LENGTH {
            return Err(HssDeflateError::invalid_image_data(format!(
                "Header data too short: {} bytes (expected at least {})",
                data.len(),
                HEADER_LENGTH
            )));
        }

        let mut cursor = Cursor::new(data);

        let magic = cursor.read_u32::<LittleEndian>()?;
        if magic != HSS_COMPRESSED_MAGIC {
            return Err(HssDeflateError::invalid_magic(HSS_COMPRESSED_MAGIC, magic));
        }

        let version = CompressionVersion::try_from(cursor.read_u32::<LittleEndian>()?)?;

        let header_length = cursor.read_u64::<LittleEndian>()?;
        if header_length != HEADER_LENGTH as u64 {
            return Err(HssDeflateError::InvalidHeaderLength {
                expected: HEADER_LENGTH as u64,
                actual: header_length,
            });
        }

        let header_crc = cursor.read_u32::<LittleEndian>()?;
        let compressed_crc = cursor.read_u32::<LittleEndian>()?;
        let original_crc = cursor.read_u32::<LittleEndian>()?;
        let _padding = cursor.read_u32::<LittleEndian>()?;

        let compressed_image_len = cursor.read_u64::<LittleEndian>()?;
        let original_image_len = cursor.read_u64::<LittleEndian>()?;

        let mut hash = [0u8; HASH_LEN];
        cursor.read_exact(&mut hash)?;
        let mut ecdsa_sig = [0u8; ECDSA_SIG_LEN];
        cursor.read_exact(&mut ecdsa_sig)?;

        let header = Self {
            magic,
            version,
            header_length: header_length as u32,
            header_crc,
            compressed_crc,
            original_crc,
            compressed_image_len,
            original_image_len,
            hash,
            ecdsa_sig,
        };

        header.validate()?;
        Ok(header)
    }

    /// Read the header from a reader
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut header_data = [0u8; HEADER_LENGTH];
        reader.read_exact(&mut header_data)?;
        Self::from_bytes(&header_data)
    }

    /// Total container size (header + compressed payload)
    pub fn total_size(&self) -> u64 {
        self.header_length as u64 + self.compressed_image_len
    }

    /// Whether the signing stage has populated the reserved fields
    pub fn is_signed(&self) -> bool {
        self.hash.iter().chain(self.ecdsa_sig.iter()).any(|&b| b != 0)
    }

    /// Get a summary of the header information
    pub fn summary(&self) -> String {
        format!(
            "Magic:                   0x{:08X} (expected 0x{:08X})\n\
             Version:                 {} ({})\n\
             Header Length:           {}\n\
             Header CRC:              0x{:08X}\n\
             Compressed CRC:          0x{:08X}\n\
             Original CRC:            0x{:08X}\n\
             Compressed Image Length: 0x{:08X} ({:#})\n\
             Original Image Length:   0x{:08X} ({:#})\n\
             Signed:                  {}",
            self.magic,
            HSS_COMPRESSED_MAGIC,
            u32::from(self.version),
            self.version,
            self.header_length,
            self.header_crc,
            self.compressed_crc,
            self.original_crc,
            self.compressed_image_len,
            Byte::from_u64(self.compressed_image_len),
            self.original_image_len,
            Byte::from_u64(self.original_image_len),
            if self.is_signed() { "yes" } else { "no" },
        )
    }
}

/// Recompute the header CRC directly from serialized bytes
///
/// Equivalent to zeroing bytes 16..20 and hashing the whole header.
pub fn header_crc_of(bytes: &[u8]) -> Result<u32> {
    if bytes.len() < HEADER_LENGTH {
        return Err(HssDeflateError::invalid_image_data(format!(
            "Header data too short: {} bytes (expected at least {})",
            bytes.len(),
            HEADER_LENGTH
        )));
    }
    Ok(calculate_crc32_parts(&[
        &bytes[..HEADER_CRC_OFFSET],
        &[0u8; 4][..],
        &bytes[HEADER_CRC_OFFSET + 4..HEADER_LENGTH],
    ]))
}
