//! Arclight Decode - Binary format decoding core
//!
//! Ties the decoders together behind one configuration:
//! - `stream`: bit and byte cursors
//! - `compress`: DEFLATE block headers
//! - `truetype`: glyph locations and outlines

pub use arc_compress as compress;
pub use arc_stream as stream;
pub use arc_truetype as truetype;

pub use arc_compress::{
    BlockHeader, BlockKind, BlockType, DeflateConfig, DeflateError, DeflateHeaderDecoder,
};
pub use arc_stream::{BitCursor, ByteReader, Endian, StreamError};
pub use arc_truetype::{DecodeConfig, FontTables, Glyph, GlyphLocation, TrueTypeError};

/// Version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Decoder configuration options
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// DEFLATE header walking
    pub deflate: DeflateConfig,

    /// Glyph decoding
    pub truetype: DecodeConfig,
}

/// Walk the block headers of a DEFLATE stream, optionally zlib wrapped
pub fn deflate_headers(
    data: &[u8],
    zlib: bool,
    config: &Config,
) -> Result<Vec<BlockHeader>, DeflateError> {
    let payload = if zlib {
        let (header, payload) = compress::ZlibHeader::payload(data)?;
        tracing::debug!(window = header.window_size, level = header.level, "zlib header");
        payload
    } else {
        data
    };
    compress::scan_block_headers(payload, config.deflate.clone())
}

/// Decode every glyph of a TrueType font
pub fn font_glyphs(data: &[u8], config: &Config) -> Result<Vec<Glyph>, TrueTypeError> {
    let tables = FontTables::parse(data)?;
    let glyphs = tables.glyphs(config.truetype.clone())?;
    tracing::info!(glyphs = glyphs.len(), "Decoded font glyphs");
    Ok(glyphs)
}
