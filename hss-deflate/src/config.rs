//! Packing configuration
//!
//! A `PackConfig` is passed explicitly into every build step. It can be
//! loaded from a TOML file, e.g.
//!
//! ```toml
//! compression_level = 6
//! verbosity = 1
//! ```

use crate::compression::deflate::{DEFAULT_LEVEL, MAX_LEVEL};
use crate::error::{HssDeflateError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackConfig {
    /// Deflate level, 0 (store) to 9 (smallest)
    pub compression_level: u32,
    /// 0 is silent; anything higher reports progress and checksums
    pub verbosity: u8,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_LEVEL,
            verbosity: 0,
        }
    }
}

impl PackConfig {
    pub fn new(compression_level: u32) -> Self {
        Self {
            compression_level,
            ..Default::default()
        }
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn verbose(&self) -> bool {
        self.verbosity > 0
    }

    pub fn validate(&self) -> Result<()> {
        if self.compression_level > MAX_LEVEL {
            return Err(HssDeflateError::InvalidCompressionLevel {
                level: self.compression_level,
            });
        }
        Ok(())
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
