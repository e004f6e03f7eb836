//! Glyph outline parsing (`glyf` table)

use std::ops::Range;

use arc_stream::ByteReader;

use crate::budget::SizeBudget;
use crate::location::GlyphLocation;
use crate::{DecodeConfig, Result, TrueTypeError};

/// numberOfContours + bounding box
const GLYPH_HEADER_SIZE: usize = 10;

// Simple glyph flag bits
const ON_CURVE: u8 = 0x01;
const X_SHORT: u8 = 0x02;
const Y_SHORT: u8 = 0x04;
const REPEAT: u8 = 0x08;
const X_SAME_OR_POSITIVE: u8 = 0x10;
const Y_SAME_OR_POSITIVE: u8 = 0x20;

/// Glyph bounding box in font units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundingBox {
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
}

impl BoundingBox {
    pub fn width(&self) -> i32 {
        i32::from(self.x_max) - i32::from(self.x_min)
    }

    pub fn height(&self) -> i32 {
        i32::from(self.y_max) - i32::from(self.y_min)
    }
}

/// Absolute outline point in font units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// One decoded glyph
///
/// The default value is the empty glyph produced for `NoOutline` locations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Glyph {
    pub compound: bool,
    pub bounds: BoundingBox,
    /// xMax - xMin
    pub advance_width: i32,
    /// Always 0; side bearings live in `hmtx`
    pub bearing: i32,
    /// Point index range of each contour
    pub contours: Vec<Range<u32>>,
    pub points: Vec<Point>,
    /// Parallel to `points`
    pub on_curve: Vec<bool>,
    /// Hinting instructions, uninterpreted
    pub instructions: Vec<u8>,
}

impl Glyph {
    /// True for glyphs without contours or components
    pub fn is_empty(&self) -> bool {
        !self.compound && self.points.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Points of one contour
    pub fn contour_points(&self, index: usize) -> Option<&[Point]> {
        let range = self.contours.get(index)?;
        self.points.get(range.start as usize..range.end as usize)
    }
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn short_bit(self) -> u8 {
        match self {
            Axis::X => X_SHORT,
            Axis::Y => Y_SHORT,
        }
    }

    fn same_or_positive_bit(self) -> u8 {
        match self {
            Axis::X => X_SAME_OR_POSITIVE,
            Axis::Y => Y_SAME_OR_POSITIVE,
        }
    }

    /// Coordinate bytes one point with `flag` stores on this axis
    fn coordinate_size(self, flag: u8) -> usize {
        if flag & self.short_bit() != 0 {
            1
        } else if flag & self.same_or_positive_bit() != 0 {
            0
        } else {
            2
        }
    }
}

/// Decodes glyph records from a `glyf` table
#[derive(Debug, Clone)]
pub struct GlyphOutlineDecoder<'a> {
    reader: ByteReader<'a>,
    table_size: usize,
    config: DecodeConfig,
}

impl<'a> GlyphOutlineDecoder<'a> {
    /// Decoder over a whole `glyf` table
    pub fn new(glyf: &'a [u8]) -> Self {
        Self::with_table_size(glyf, glyf.len())
    }

    /// Decoder whose bounds checks use a declared table size
    pub fn with_table_size(glyf: &'a [u8], table_size: usize) -> Self {
        Self {
            reader: ByteReader::big_endian(glyf),
            table_size,
            config: DecodeConfig::default(),
        }
    }

    pub fn with_config(mut self, config: DecodeConfig) -> Self {
        self.config = config;
        self
    }

    /// Decode the glyph at `location`
    pub fn decode(&mut self, location: GlyphLocation) -> Result<Glyph> {
        let offset = match location {
            GlyphLocation::NoOutline => return Ok(Glyph::default()),
            GlyphLocation::Outline(offset) => offset as usize,
        };

        let mut budget = SizeBudget::new(offset, self.table_size);
        budget.reserve(GLYPH_HEADER_SIZE)?;

        let reader = &mut self.reader;
        reader.seek(offset)?;
        let number_of_contours = reader.read_i16()?;
        let bounds = BoundingBox {
            x_min: reader.read_i16()?,
            y_min: reader.read_i16()?,
            x_max: reader.read_i16()?,
            y_max: reader.read_i16()?,
        };

        if bounds.x_max < bounds.x_min || bounds.y_max < bounds.y_min {
            return Err(TrueTypeError::InvalidBounds);
        }

        let mut glyph = Glyph {
            compound: number_of_contours < 0,
            bounds,
            advance_width: bounds.width(),
            bearing: 0,
            ..Glyph::default()
        };

        if glyph.compound {
            // Component records are not decoded
            tracing::debug!(offset, "Compound glyph left without components");
            return Ok(glyph);
        }

        self.decode_simple(&mut glyph, number_of_contours as usize, &mut budget)?;

        tracing::trace!(
            offset,
            contours = glyph.contours.len(),
            points = glyph.points.len(),
            "Decoded simple glyph"
        );

        Ok(glyph)
    }

    fn decode_simple(
        &mut self,
        glyph: &mut Glyph,
        contour_count: usize,
        budget: &mut SizeBudget,
    ) -> Result<()> {
        let reader = &mut self.reader;

        // Contour end points and instruction length
        budget.reserve(contour_count * 2 + 2)?;
        let mut contours = Vec::with_capacity(contour_count);
        let mut start = 0u32;
        let mut previous_end = None;
        for index in 0..contour_count {
            let end = reader.read_u16()?;
            if let Some(previous) = previous_end {
                if end < previous {
                    return Err(TrueTypeError::InvalidContourOrder { index, end, previous });
                }
            }
            contours.push(start..u32::from(end) + 1);
            start = u32::from(end) + 1;
            previous_end = Some(end);
        }

        let instruction_length = usize::from(reader.read_u16()?);
        budget.reserve(instruction_length)?;
        let instructions = reader.read_bytes(instruction_length)?;
        if self.config.retain_instructions {
            glyph.instructions = instructions.to_vec();
        }

        let Some(point_count) = contours.last().map(|contour| contour.end as usize) else {
            return Ok(());
        };

        // Flags, sizing the coordinate arrays as they go
        let mut flags = Vec::with_capacity(point_count);
        let mut x_size = 0usize;
        let mut y_size = 0usize;
        while flags.len() < point_count {
            budget.reserve(1)?;
            let flag = reader.read_u8()?;
            let mut count = 1;

            if flag & REPEAT != 0 {
                budget.reserve(1)?;
                count += usize::from(reader.read_u8()?);
            }

            if flags.len() + count > point_count {
                return Err(TrueTypeError::InvalidRepeatCount {
                    point: flags.len(),
                    count,
                    point_count,
                });
            }

            x_size += Axis::X.coordinate_size(flag) * count;
            y_size += Axis::Y.coordinate_size(flag) * count;
            flags.resize(flags.len() + count, flag);
        }

        budget.reserve(x_size + y_size)?;

        // All x coordinates precede all y coordinates
        let xs = read_coordinates(reader, &flags, Axis::X)?;
        let ys = read_coordinates(reader, &flags, Axis::Y)?;

        glyph.points = xs.into_iter().zip(ys).map(|(x, y)| Point { x, y }).collect();
        glyph.on_curve = flags.iter().map(|&flag| flag & ON_CURVE != 0).collect();
        glyph.contours = contours;

        Ok(())
    }
}

/// Turn one axis of delta-coded coordinates into absolute values
fn read_coordinates(reader: &mut ByteReader<'_>, flags: &[u8], axis: Axis) -> Result<Vec<i32>> {
    let mut value = 0i32;
    flags
        .iter()
        .map(|&flag| -> Result<i32> {
            let positive = flag & axis.same_or_positive_bit() != 0;
            let delta = if flag & axis.short_bit() != 0 {
                let magnitude = i32::from(reader.read_u8()?);
                if positive { magnitude } else { -magnitude }
            } else if positive {
                // same as previous
                0
            } else {
                i32::from(reader.read_i16()?)
            };
            value = value.wrapping_add(delta);
            Ok(value)
        })
        .collect()
}

/// Decode one glyph per location
pub fn decode_glyph_table(
    glyf: &[u8],
    table_size: usize,
    locations: &[GlyphLocation],
    config: DecodeConfig,
) -> Result<Vec<Glyph>> {
    let mut decoder = GlyphOutlineDecoder::with_table_size(glyf, table_size).with_config(config);
    let glyphs = locations
        .iter()
        .map(|&location| decoder.decode(location))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(entries = glyphs.len(), "Loaded glyph table");

    Ok(glyphs)
}
