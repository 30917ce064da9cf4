//! Error types for container building and verification

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, HssDeflateError>;

/// Errors raised while packing or checking a compressed container
#[derive(Error, Debug)]
pub enum HssDeflateError {
    /// Source unreadable or destination unwritable
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The deflate stream could not be inflated
    #[error("corrupt deflate stream: {reason}")]
    CorruptStream { reason: String },

    /// The compressor produced no output for a non-empty payload
    #[error("encoding error: {reason}")]
    Encoding { reason: String },

    #[error("invalid magic number: expected 0x{expected:08x}, found 0x{actual:08x}")]
    InvalidMagic { expected: u32, actual: u32 },

    /// Header version names an algorithm this crate does not handle
    #[error("unsupported container version {version}")]
    UnsupportedVersion { version: u32 },

    #[error("invalid header length: expected {expected}, found {actual}")]
    InvalidHeaderLength { expected: u64, actual: u64 },

    #[error("{what} CRC mismatch: expected 0x{expected:08x}, calculated 0x{actual:08x}")]
    CrcMismatch {
        what: &'static str,
        expected: u32,
        actual: u32,
    },

    #[error("{what} length mismatch: header says {expected} bytes, found {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: u64,
        actual: u64,
    },

    #[error("invalid container data: {reason}")]
    InvalidImageData { reason: String },

    #[error("compression level {level} out of range (0-9)")]
    InvalidCompressionLevel { level: u32 },

    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Neither a subcommand nor an input/output pair was given
    #[error("usage error: {reason}")]
    Usage { reason: String },
}

impl HssDeflateError {
    pub fn corrupt_stream(reason: impl Into<String>) -> Self {
        Self::CorruptStream {
            reason: reason.into(),
        }
    }

    pub fn encoding(reason: impl Into<String>) -> Self {
        Self::Encoding {
            reason: reason.into(),
        }
    }

    pub fn invalid_magic(expected: u32, actual: u32) -> Self {
        Self::InvalidMagic { expected, actual }
    }

    pub fn crc_mismatch(what: &'static str, expected: u32, actual: u32) -> Self {
        Self::CrcMismatch {
            what,
            expected,
            actual,
        }
    }

    pub fn length_mismatch(what: &'static str, expected: u64, actual: u64) -> Self {
        Self::LengthMismatch {
            what,
            expected,
            actual,
        }
    }

    pub fn invalid_image_data(reason: impl Into<String>) -> Self {
        Self::InvalidImageData {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = HssDeflateError::invalid_magic(0xC08B8355, 0x12345678);
        assert_eq!(
            err.to_string(),
            "invalid magic number: expected 0xc08b8355, found 0x12345678"
        );

        let err = HssDeflateError::crc_mismatch("header", 1, 2);
        assert!(err.to_string().starts_with("header CRC mismatch"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: HssDeflateError = io.into();
        assert!(matches!(err, HssDeflateError::Io(_)));
    }

    #[test]
    fn test_json_conversion() {
        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: HssDeflateError = json.into();
        assert!(matches!(err, HssDeflateError::Json(_)));
        assert!(err.to_string().starts_with("JSON error"));
    }
}
