//! Container builder
//!
//! Compresses a raw payload and prepends the sealed container header. The
//! checksum order matters to the boot loader: original CRC, then the
//! compressed CRC, then the header CRC over the otherwise complete header.

use crate::compression::traits::create_compressor;
use crate::config::PackConfig;
use crate::container::Container;
use crate::crc::calculate_crc32;
use crate::error::{HssDeflateError, Result};
use crate::image_header::ContainerHeader;
use crate::image_types::CompressionVersion;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

/// Builds compressed containers from raw payloads
#[derive(Debug, Clone, Default)]
pub struct ContainerBuilder {
    config: PackConfig,
}

impl ContainerBuilder {
    pub fn new(config: PackConfig) -> Self {
        Self { config }
    }

    /// Shorthand for a silent builder at the given level
    pub fn with_level(compression_level: u32) -> Self {
        Self::new(PackConfig::new(compression_level))
    }

    pub fn config(&self) -> &PackConfig {
        &self.config
    }

    /// Build a container from an in-memory payload
    pub fn build(&self, original: &[u8]) -> Result<Container> {
        self.config.validate()?;
        let compressor =
            create_compressor(CompressionVersion::Deflate, self.config.compression_level)?;

        let original_crc = calculate_crc32(original);
        if self.config.verbose() {
            info!("Image CRC is 0x{:08X}", original_crc);
            info!("Deflating with {} level {}...", compressor.get_name(), self.config.compression_level);
        }

        let compressed = compressor.compress(original)?;
        if compressed.is_empty() && !original.is_empty() {
            return Err(HssDeflateError::encoding(format!(
                "{} produced no output for {} input bytes",
                compressor.get_name(),
                original.len()
            )));
        }

        let compressed_crc = calculate_crc32(&compressed);
        if self.config.verbose() {
            info!("Deflated CRC is 0x{:08X}", compressed_crc);
            info!(
                "Deflated length {} (0x{:08X}) bytes",
                compressed.len(),
                compressed.len()
            );
        }

        let mut header = ContainerHeader {
            version: compressor.version(),
            compressed_crc,
            original_crc,
            compressed_image_len: compressed.len() as u64,
            original_image_len: original.len() as u64,
            ..ContainerHeader::default()
        };
        header.seal()?;

        if self.config.verbose() {
            info!(
                "Header length is {} (0x{:08X})",
                header.header_length, header.header_length
            );
            info!("Header CRC is 0x{:08X}", header.header_crc);
        }

        Ok(Container::new(header, compressed))
    }

    /// Read the whole payload from `reader` and build a container
    pub fn build_from_reader<R: Read>(&self, reader: &mut R) -> Result<Container> {
        let mut original = Vec::new();
        reader.read_to_end(&mut original)?;
        if self.config.verbose() {
            info!(
                "Reading {} (0x{:08X}) bytes",
                original.len(),
                original.len()
            );
        }
        self.build(&original)
    }

    /// Build a container and write it to `writer`, returning the bytes written
    pub fn build_to_writer<W: Write>(&self, original: &[u8], writer: &mut W) -> Result<u64> {
        let container = self.build(original)?;
        container.write_to(writer)
    }

    /// Read `input`, build the container and write it to `output`
    ///
    /// A failed write may leave a partial file behind; it is never a valid
    /// container.
    pub fn build_file<P, Q>(&self, input: P, output: Q) -> Result<Container>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let input = input.as_ref();
        let output = output.as_ref();

        if self.config.verbose() {
            info!("Reading image from {}", input.display());
        }
        let container = {
            let mut file_in = File::open(input)?;
            self.build_from_reader(&mut file_in)?
        };

        if self.config.verbose() {
            info!("Outputting to {}", output.display());
        }
        let mut writer = BufWriter::new(File::create(output)?);
        let written = container.write_to(&mut writer)?;
        writer.flush()?;

        if self.config.verbose() {
            info!("Wrote {} (0x{:08X}) bytes", written, written);
        }
        debug!("{}", container.header().summary());

        Ok(container)
    }
}
