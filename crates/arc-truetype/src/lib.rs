//! Arclight TrueType - Glyph tables
//!
//! Decoders for the glyph-related tables of TrueType fonts:
//! - `loca`: per-glyph offsets, with empty glyphs marked as having no outline
//! - `glyf`: simple glyph outlines (contours, flags, delta-coded points)
//! - `head`/`maxp` and the sfnt table directory, enough to drive the above
//!
//! Every size-dependent read is checked against the declared table size
//! before it happens. Compound glyphs keep their header but their component
//! records are not decoded.

pub mod budget;
pub mod glyph;
pub mod location;
pub mod sfnt;

pub use arc_stream::{ByteReader, StreamError};
pub use budget::SizeBudget;
pub use glyph::{decode_glyph_table, BoundingBox, Glyph, GlyphOutlineDecoder, Point};
pub use location::{GlyphLocation, GlyphLocationDecoder, LocationFormat};
pub use sfnt::{FontTables, HeadTable, MaxpTable, TableDirectory, TableRecord};

/// TrueType decoding error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrueTypeError {
    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("Table too small: {required} bytes required, {available} available")]
    TruncatedTable { required: u64, available: u64 },

    #[error("Glyph at offset {offset} needs {required} bytes, table holds {table_size}")]
    TruncatedGlyph {
        offset: usize,
        required: usize,
        table_size: usize,
    },

    #[error("Illegal glyph bounds")]
    InvalidBounds,

    #[error("Flag repeat of {count} at point {point} overruns {point_count} points")]
    InvalidRepeatCount {
        point: usize,
        count: usize,
        point_count: usize,
    },

    #[error("Contour {index} ends at {end}, before the previous end {previous}")]
    InvalidContourOrder { index: usize, end: u16, previous: u16 },

    #[error("Invalid magic number {0:#010x}")]
    InvalidMagic(u32),

    #[error("Table not found: {0}")]
    TableNotFound(&'static str),

    #[error("Invalid indexToLocFormat {0}")]
    InvalidLocationFormat(i16),
}

pub type Result<T> = std::result::Result<T, TrueTypeError>;

/// Glyph decoding options
#[derive(Debug, Clone)]
pub struct DecodeConfig {
    /// Keep each glyph's hinting instructions; otherwise they are skipped
    pub retain_instructions: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            retain_instructions: true,
        }
    }
}
