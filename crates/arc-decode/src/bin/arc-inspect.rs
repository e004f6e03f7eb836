//! Inspect DEFLATE block headers or TrueType glyphs
//!
//! Usage:
//!   arc-inspect deflate <file> [--zlib]
//!   arc-inspect glyphs <font>

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use arc_decode::{BlockKind, Config};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: arc-inspect deflate <file> [--zlib] | arc-inspect glyphs <font>";

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let command = args.next().context(USAGE)?;
    let path = PathBuf::from(args.next().context(USAGE)?);
    let rest: Vec<String> = args.collect();

    let data = std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
    let config = Config::default();

    match command.as_str() {
        "deflate" => {
            let zlib = rest.iter().any(|arg| arg == "--zlib");
            let headers = arc_decode::deflate_headers(&data, zlib, &config)
                .with_context(|| format!("decoding DEFLATE headers of {}", path.display()))?;
            for (i, header) in headers.iter().enumerate() {
                let detail = match &header.kind {
                    BlockKind::Stored { len } => format!("{len} bytes"),
                    BlockKind::FixedHuffman => String::new(),
                    BlockKind::DynamicHuffman(dynamic) => format!(
                        "HLIT {} HDIST {} HCLEN {} lengths {:?}",
                        dynamic.literal_count,
                        dynamic.distance_count,
                        dynamic.code_length_count,
                        dynamic.code_lengths
                    ),
                };
                let last = if header.is_final { " (final)" } else { "" };
                println!("block {i}: {:?}{last} {detail}", header.block_type());
            }
        }
        "glyphs" => {
            let glyphs = arc_decode::font_glyphs(&data, &config)
                .with_context(|| format!("decoding glyphs of {}", path.display()))?;
            println!("{} glyphs", glyphs.len());
            for (i, glyph) in glyphs.iter().enumerate() {
                if glyph.is_empty() {
                    println!("{i:5}: empty");
                } else if glyph.compound {
                    println!("{i:5}: compound {:?}", glyph.bounds);
                } else {
                    println!(
                        "{i:5}: {} contours, {} points, advance {}",
                        glyph.contours.len(),
                        glyph.point_count(),
                        glyph.advance_width
                    );
                }
            }
        }
        other => bail!("unknown command {other:?}\n{USAGE}"),
    }

    Ok(())
}
