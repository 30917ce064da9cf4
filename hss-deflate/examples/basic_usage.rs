//! Basic usage example for hss-deflate

use hss_deflate::{Container, ContainerBuilder, PackConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Packing a sample image with hss-deflate...");

    let image = b"This stands in for an HSS L2LIM image. ".repeat(64);

    let builder = ContainerBuilder::new(PackConfig::new(9));
    let container = builder.build(&image)?;
    let bytes = container.to_bytes()?;
    std::fs::write("sample.bin.deflate", &bytes)?;

    println!("✓ Created container: sample.bin.deflate");
    println!("  Original: {} bytes", image.len());
    println!("  Container: {} bytes (112-byte header)", bytes.len());

    let parsed = Container::from_bytes(&bytes)?;
    let restored = parsed.verify()?;
    assert_eq!(restored, image);

    println!();
    println!("{}", parsed.header().summary());

    Ok(())
}
