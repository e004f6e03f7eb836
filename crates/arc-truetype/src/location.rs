//! Glyph location table (`loca`)

use arc_stream::ByteReader;

use crate::{Result, TrueTypeError};

/// Entry width of the `loca` table, from `head.indexToLocFormat`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocationFormat {
    /// u16 entries holding offset / 2
    #[default]
    Short,
    /// u32 entries holding the offset
    Long,
}

impl LocationFormat {
    /// Map `head.indexToLocFormat`
    pub fn from_index_to_loc_format(value: i16) -> Result<Self> {
        match value {
            0 => Ok(Self::Short),
            1 => Ok(Self::Long),
            other => Err(TrueTypeError::InvalidLocationFormat(other)),
        }
    }

    /// Bytes per entry
    pub fn entry_size(self) -> usize {
        match self {
            Self::Short => 2,
            Self::Long => 4,
        }
    }

    fn read_offset(self, reader: &mut ByteReader<'_>) -> Result<u32> {
        Ok(match self {
            Self::Short => u32::from(reader.read_u16()?) * 2,
            Self::Long => reader.read_u32()?,
        })
    }
}

/// Where a glyph's record lives in the `glyf` table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphLocation {
    /// Byte offset of the glyph record
    Outline(u32),
    /// Zero-length entry (space and similar): nothing to decode
    NoOutline,
}

impl GlyphLocation {
    pub fn offset(self) -> Option<u32> {
        match self {
            Self::Outline(offset) => Some(offset),
            Self::NoOutline => None,
        }
    }

    pub fn has_outline(self) -> bool {
        matches!(self, Self::Outline(_))
    }
}

/// Decodes `loca` into one location per glyph
#[derive(Debug, Clone, Copy, Default)]
pub struct GlyphLocationDecoder {
    format: LocationFormat,
}

impl GlyphLocationDecoder {
    pub fn new(format: LocationFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> LocationFormat {
        self.format
    }

    /// Read `glyph_count + 1` entries from the reader's position
    ///
    /// Glyph `i` spans entries `i` and `i + 1`; equal entries mean the glyph
    /// has no outline. The table must hold every entry before any is read.
    pub fn decode(
        &self,
        reader: &mut ByteReader<'_>,
        table_size: usize,
        glyph_count: u32,
    ) -> Result<Vec<GlyphLocation>> {
        if glyph_count == 0 {
            return Err(TrueTypeError::InvalidArgument("glyph count cannot be 0"));
        }

        let required = (u64::from(glyph_count) + 1) * self.format.entry_size() as u64;
        if (table_size as u64) < required {
            return Err(TrueTypeError::TruncatedTable {
                required,
                available: table_size as u64,
            });
        }

        // The declared size may exceed the buffer; size from what is really there
        let readable = reader.remaining() / self.format.entry_size();
        let mut locations = Vec::with_capacity((glyph_count as usize).min(readable));
        let mut offset = self.format.read_offset(reader)?;

        for _ in 0..glyph_count {
            let next = self.format.read_offset(reader)?;
            locations.push(if next == offset {
                GlyphLocation::NoOutline
            } else {
                GlyphLocation::Outline(offset)
            });
            offset = next;
        }

        tracing::debug!(
            entries = locations.len(),
            format = ?self.format,
            "Loaded glyph location table"
        );

        Ok(locations)
    }
}
