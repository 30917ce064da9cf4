//! CRC-32 (ISO-HDLC, the zlib polynomial) helpers

use crc32fast::Hasher;

/// Calculate the CRC-32 of a byte slice
pub fn calculate_crc32(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// Calculate the CRC-32 over several slices as if they were concatenated
pub fn calculate_crc32_parts(parts: &[&[u8]]) -> u32 {
    let mut hasher = Hasher::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize()
}
