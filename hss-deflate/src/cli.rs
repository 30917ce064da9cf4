//! Command line interface for hss-deflate

use crate::container::Container;
use crate::error::{HssDeflateError, Result};
use crate::image_header::{header_crc_of, ContainerHeader};
use crate::{ContainerBuilder, PackConfig, VERSION};
use byte_unit::Byte;
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use log::{info, LevelFilter};
use std::path::PathBuf;

/// Command line arguments for hss-deflate
#[derive(Parser, Debug)]
#[command(name = "hss-deflate")]
#[command(version = VERSION)]
#[command(about = "Compress a boot loader image into an HSS deflate container", long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Raw image to compress (same as `pack <INPUT> <OUTPUT>`)
    #[arg(requires = "output")]
    pub input: Option<PathBuf>,

    /// Container file to write
    pub output: Option<PathBuf>,

    /// Verbose output (repeat for more detail)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode - only output errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compress an image and write the container
    Pack(PackArgs),
    /// Print the header fields of a container
    Inspect(InspectArgs),
    /// Check every checksum and length in a container
    Verify(VerifyArgs),
    /// Verify a container and write the original image
    Unpack(UnpackArgs),
}

#[derive(Parser, Debug)]
pub struct PackArgs {
    /// Raw image to compress
    pub input: PathBuf,

    /// Container file to write
    pub output: PathBuf,

    /// Compression level, 0-9 (overrides the config file)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=9))]
    pub level: Option<u32>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the header after packing
    #[arg(long)]
    pub print_info: bool,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Container file to examine
    pub container: PathBuf,

    /// Print in JSON format
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct VerifyArgs {
    /// Container file to verify
    pub container: PathBuf,
}

#[derive(Parser, Debug)]
pub struct UnpackArgs {
    /// Container file to inflate
    pub container: PathBuf,

    /// Where to write the original image
    pub output: PathBuf,
}

impl Args {
    /// Effective verbosity; quiet wins over any number of `-v`
    pub fn verbosity(&self) -> u8 {
        if self.quiet { 0 } else { self.verbose }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Error
        } else {
            level_for(self.verbose)
        }
    }
}

fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Main CLI handler
pub fn run_cli(args: Args) -> Result<()> {
    let verbosity = args.verbosity();
    let quiet = args.quiet;

    // `hss-deflate <INPUT> <OUTPUT>` packs with the defaults
    let command = match (args.command, args.input, args.output) {
        (Some(command), _, _) => command,
        (None, Some(input), Some(output)) => Commands::Pack(PackArgs {
            input,
            output,
            level: None,
            config: None,
            print_info: false,
        }),
        _ => {
            return Err(HssDeflateError::Usage {
                reason: "expected <INPUT> <OUTPUT> or a subcommand".to_string(),
            });
        }
    };

    match command {
        Commands::Pack(pack_args) => handle_pack(pack_args, verbosity, quiet),
        Commands::Inspect(inspect_args) => handle_inspect(inspect_args, verbosity),
        Commands::Verify(verify_args) => handle_verify(verify_args, verbosity, quiet),
        Commands::Unpack(unpack_args) => handle_unpack(unpack_args, verbosity, quiet),
    }
}

fn resolve_config(args: &PackArgs, verbosity: u8, quiet: bool) -> Result<PackConfig> {
    let mut config = match &args.config {
        Some(path) => PackConfig::from_file(path)?,
        None => PackConfig::default(),
    };

    if let Some(level) = args.level {
        config.compression_level = level;
    }

    config.verbosity = if quiet {
        0
    } else {
        config.verbosity.max(verbosity)
    };

    config.validate()?;
    Ok(config)
}

fn handle_pack(args: PackArgs, verbosity: u8, quiet: bool) -> Result<()> {
    let config = resolve_config(&args, verbosity, quiet)?;

    // A config file may ask for more detail than the command line did.
    if config.verbosity > verbosity {
        log::set_max_level(level_for(config.verbosity));
    }

    let container = ContainerBuilder::new(config).build_file(&args.input, &args.output)?;

    if !quiet {
        println!(
            "{} {} ({:#} -> {:#})",
            "Container created:".green(),
            args.output.display(),
            Byte::from_u64(container.header().original_image_len),
            Byte::from_u64(container.size() as u64),
        );
    }

    if args.print_info && !quiet {
        println!();
        println!("{}", container.header().summary());
    }

    Ok(())
}

fn handle_inspect(args: InspectArgs, verbosity: u8) -> Result<()> {
    if verbosity > 0 {
        info!("Reading container: {}", args.container.display());
    }

    let data = std::fs::read(&args.container)?;
    let header = ContainerHeader::from_bytes(&data)?;
    let header_crc_ok = header_crc_of(&data)? == header.header_crc;

    if args.json {
        let report = serde_json::json!({
            "magic": format!("0x{:08x}", header.magic),
            "version": u32::from(header.version),
            "compression": header.version,
            "header_length": header.header_length,
            "header_crc": format!("0x{:08x}", header.header_crc),
            "header_crc_ok": header_crc_ok,
            "compressed_crc": format!("0x{:08x}", header.compressed_crc),
            "original_crc": format!("0x{:08x}", header.original_crc),
            "compressed_image_len": header.compressed_image_len,
            "original_image_len": header.original_image_len,
            "hash": to_hex(&header.hash),
            "ecdsa_sig": to_hex(&header.ecdsa_sig),
            "file_size": data.len(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", header.summary());
        let status = if header_crc_ok { "OK".green() } else { "MISMATCH".red() };
        println!("Header CRC check:        {}", status);
    }

    Ok(())
}

fn handle_verify(args: VerifyArgs, verbosity: u8, quiet: bool) -> Result<()> {
    if verbosity > 0 {
        info!("Verifying container: {}", args.container.display());
    }

    let container = Container::from_file(&args.container)?;
    let original = container.verify()?;
    let header = container.header();

    if !quiet {
        println!("Header CRC:     0x{:08X} - {}", header.header_crc, "OK".green());
        println!("Compressed CRC: 0x{:08X} - {}", header.compressed_crc, "OK".green());
        println!("Original CRC:   0x{:08X} - {}", header.original_crc, "OK".green());
        println!(
            "Inflated {} bytes from {} bytes",
            original.len(),
            header.compressed_image_len
        );
        println!("Container verification successful");
    }

    Ok(())
}

fn handle_unpack(args: UnpackArgs, verbosity: u8, quiet: bool) -> Result<()> {
    if verbosity > 0 {
        info!("Unpacking container: {}", args.container.display());
    }

    let container = Container::from_file(&args.container)?;
    let original = container.verify()?;
    std::fs::write(&args.output, &original)?;

    if !quiet {
        println!(
            "{} {} ({:#})",
            "Image written:".green(),
            args.output.display(),
            Byte::from_u64(original.len() as u64),
        );
    }

    Ok(())
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
