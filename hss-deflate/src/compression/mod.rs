//! Payload compression

pub mod deflate;
pub mod traits;

pub use deflate::DeflateCompressor;
pub use traits::{create_compressor, CompressionInterface};
