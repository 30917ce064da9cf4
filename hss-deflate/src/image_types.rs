//! Container version identifiers

use crate::error::{HssDeflateError, Result};
use serde::Serialize;
use std::fmt;

/// Compression algorithm recorded in the header `version` field
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionVersion {
    /// FastLZ; reserved, never produced by this crate
    FastLz = 1,
    /// Raw deflate
    #[default]
    Deflate = 2,
}

impl CompressionVersion {
    /// Whether this crate can produce and inflate containers of this version
    pub fn is_supported(self) -> bool {
        matches!(self, Self::Deflate)
    }
}

impl From<CompressionVersion> for u32 {
    fn from(version: CompressionVersion) -> Self {
        version as u32
    }
}

impl TryFrom<u32> for CompressionVersion {
    type Error = HssDeflateError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            1 => Ok(Self::FastLz),
            2 => Ok(Self::Deflate),
            _ => Err(HssDeflateError::UnsupportedVersion { version: value }),
        }
    }
}

impl fmt::Display for CompressionVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FastLz => "fastlz",
            Self::Deflate => "deflate",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_values() {
        assert_eq!(u32::from(CompressionVersion::FastLz), 1);
        assert_eq!(u32::from(CompressionVersion::Deflate), 2);
        assert_eq!(CompressionVersion::default(), CompressionVersion::Deflate);
    }

    #[test]
    fn test_try_from() {
        assert_eq!(
            CompressionVersion::try_from(2).unwrap(),
            CompressionVersion::Deflate
        );
        assert!(matches!(
            CompressionVersion::try_from(7),
            Err(HssDeflateError::UnsupportedVersion { version: 7 })
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(CompressionVersion::Deflate.to_string(), "deflate");
        assert_eq!(CompressionVersion::FastLz.to_string(), "fastlz");
        assert!(!CompressionVersion::FastLz.is_supported());
    }
}
