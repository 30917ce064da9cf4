//! # hss-deflate
//!
//! Packs a raw firmware image into the compressed container format read by
//! the boot loader: a 112-byte header carrying CRC-32 checksums and lengths,
//! followed by a raw deflate stream of the image.
//!
//! ## Example
//!
//! ```rust
//! use hss_deflate::{Container, ContainerBuilder, PackConfig};
//!
//! let builder = ContainerBuilder::new(PackConfig::new(9));
//! let container = builder.build(b"firmware image")?;
//! let bytes = container.to_bytes()?;
//!
//! let parsed = Container::from_bytes(&bytes)?;
//! assert_eq!(parsed.verify()?, b"firmware image");
//! # Ok::<(), hss_deflate::HssDeflateError>(())
//! ```

pub mod builder;
pub mod cli;
pub mod compression;
pub mod config;
pub mod container;
pub mod crc;
pub mod error;
pub mod image_header;
pub mod image_types;

// Re-export main types for convenience
pub use builder::ContainerBuilder;
pub use compression::deflate::{compress, decompress};
pub use compression::traits::CompressionInterface;
pub use config::PackConfig;
pub use container::Container;
pub use crc::calculate_crc32;
pub use error::{HssDeflateError, Result};
pub use image_header::{ContainerHeader, HEADER_LENGTH};
pub use image_types::CompressionVersion;

/// Current version of the hss-deflate implementation
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Magic number opening every compressed container
pub const HSS_COMPRESSED_MAGIC: u32 = 0xC08B_8355;
