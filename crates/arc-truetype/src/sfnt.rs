//! sfnt table directory and the tables that drive glyph decoding

use arc_stream::ByteReader;

use crate::glyph::{decode_glyph_table, BoundingBox, Glyph, GlyphOutlineDecoder};
use crate::location::{GlyphLocation, GlyphLocationDecoder, LocationFormat};
use crate::{DecodeConfig, Result, TrueTypeError};

/// sfnt version of TrueType outlines
pub const TRUETYPE_VERSION: u32 = 0x0001_0000;
/// 'true', used by older Apple fonts
pub const APPLE_TRUE_VERSION: u32 = 0x7472_7565;
/// head.magicNumber
pub const HEAD_MAGIC: u32 = 0x5F0F_3CF5;

/// Table directory record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRecord {
    pub tag: [u8; 4],
    pub checksum: u32,
    pub offset: u32,
    pub length: u32,
}

/// Offset table + table records of one font
#[derive(Debug, Clone)]
pub struct TableDirectory<'a> {
    data: &'a [u8],
    records: Vec<TableRecord>,
}

impl<'a> TableDirectory<'a> {
    /// Parse the offset table at the start of `data`
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut reader = ByteReader::big_endian(data);

        let sfnt_version = reader.read_u32()?;
        match sfnt_version {
            TRUETYPE_VERSION | APPLE_TRUE_VERSION => {}
            other => return Err(TrueTypeError::InvalidMagic(other)),
        }

        let num_tables = reader.read_u16()?;
        let _search_range = reader.read_u16()?;
        let _entry_selector = reader.read_u16()?;
        let _range_shift = reader.read_u16()?;

        let records = (0..num_tables)
            .map(|_| -> Result<TableRecord> {
                Ok(TableRecord {
                    tag: reader.read_tag()?,
                    checksum: reader.read_u32()?,
                    offset: reader.read_u32()?,
                    length: reader.read_u32()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { data, records })
    }

    pub fn records(&self) -> &[TableRecord] {
        &self.records
    }

    pub fn find(&self, tag: &[u8; 4]) -> Option<TableRecord> {
        self.records.iter().find(|record| &record.tag == tag).copied()
    }

    /// Raw table data, checked against the font's length
    pub fn table_data(&self, tag: &[u8; 4], name: &'static str) -> Result<&'a [u8]> {
        let record = self.find(tag).ok_or(TrueTypeError::TableNotFound(name))?;
        let start = record.offset as usize;
        let end = start.saturating_add(record.length as usize);
        self.data.get(start..end).ok_or(TrueTypeError::TruncatedTable {
            required: end as u64,
            available: self.data.len() as u64,
        })
    }
}

/// Fields of `head` used by the glyph decoders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadTable {
    pub units_per_em: u16,
    /// Union of all glyph bounding boxes
    pub bounds: BoundingBox,
    pub location_format: LocationFormat,
}

impl HeadTable {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::big_endian(data);
        let _version = reader.read_u32()?;
        let _font_revision = reader.read_u32()?;
        let _checksum_adjust = reader.read_u32()?;
        let magic = reader.read_u32()?;
        if magic != HEAD_MAGIC {
            return Err(TrueTypeError::InvalidMagic(magic));
        }
        let _flags = reader.read_u16()?;
        let units_per_em = reader.read_u16()?;
        reader.skip(16)?; // created, modified timestamps
        let bounds = BoundingBox {
            x_min: reader.read_i16()?,
            y_min: reader.read_i16()?,
            x_max: reader.read_i16()?,
            y_max: reader.read_i16()?,
        };
        let _mac_style = reader.read_u16()?;
        let _lowest_rec_ppem = reader.read_u16()?;
        let _direction_hint = reader.read_i16()?;
        let location_format = LocationFormat::from_index_to_loc_format(reader.read_i16()?)?;

        Ok(Self {
            units_per_em,
            bounds,
            location_format,
        })
    }
}

/// Fields of `maxp` used by the glyph decoders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxpTable {
    pub num_glyphs: u16,
}

impl MaxpTable {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::big_endian(data);
        let _version = reader.read_u32()?;
        let num_glyphs = reader.read_u16()?;
        Ok(Self { num_glyphs })
    }
}

/// The tables needed to decode every glyph of a TrueType font
#[derive(Debug, Clone)]
pub struct FontTables<'a> {
    pub directory: TableDirectory<'a>,
    pub head: HeadTable,
    pub maxp: MaxpTable,
    locations: Vec<GlyphLocation>,
    glyf: &'a [u8],
}

impl<'a> FontTables<'a> {
    /// Locate and parse `head`, `maxp`, `loca` and `glyf`
    ///
    /// `loca` is decoded here; glyph records are decoded on request.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let directory = TableDirectory::parse(data)?;
        let head = HeadTable::parse(directory.table_data(b"head", "head")?)?;
        let maxp = MaxpTable::parse(directory.table_data(b"maxp", "maxp")?)?;
        let loca = directory.table_data(b"loca", "loca")?;
        let glyf = directory.table_data(b"glyf", "glyf")?;

        let mut reader = ByteReader::big_endian(loca);
        let locations = GlyphLocationDecoder::new(head.location_format).decode(
            &mut reader,
            loca.len(),
            u32::from(maxp.num_glyphs),
        )?;

        tracing::debug!(
            tables = directory.records().len(),
            glyphs = maxp.num_glyphs,
            format = ?head.location_format,
            "Parsed font tables"
        );

        Ok(Self {
            directory,
            head,
            maxp,
            locations,
            glyf,
        })
    }

    pub fn num_glyphs(&self) -> u16 {
        self.maxp.num_glyphs
    }

    /// Decoded `loca`, one entry per glyph
    pub fn glyph_locations(&self) -> &[GlyphLocation] {
        &self.locations
    }

    /// Decode every glyph
    pub fn glyphs(&self, config: DecodeConfig) -> Result<Vec<Glyph>> {
        decode_glyph_table(self.glyf, self.glyf.len(), &self.locations, config)
    }

    /// Decode one glyph by index
    pub fn glyph(&self, index: u16, config: DecodeConfig) -> Result<Glyph> {
        let location = *self
            .locations
            .get(usize::from(index))
            .ok_or(TrueTypeError::InvalidArgument("glyph index out of range"))?;
        GlyphOutlineDecoder::new(self.glyf)
            .with_config(config)
            .decode(location)
    }
}
