//! Bit cursor for LSB-first bitstreams
//!
//! DEFLATE packs its fields starting at the least significant bit of each
//! byte, with no byte alignment between fields. A field may therefore start
//! at any of the eight intra-byte offsets and straddle several bytes.

use crate::{Result, StreamError};

/// Widest field a single read may return
pub const MAX_BITS: u32 = 32;

/// Bit-addressed cursor over a borrowed buffer
#[derive(Debug, Clone)]
pub struct BitCursor<'a> {
    data: &'a [u8],
    /// Position in bits from the start of `data`
    pos: usize,
}

impl<'a> BitCursor<'a> {
    /// Create a cursor at bit 0
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Create a cursor starting at an arbitrary bit offset
    pub fn at(data: &'a [u8], bit_pos: usize) -> Result<Self> {
        let total = data.len() * 8;
        if bit_pos > total {
            return Err(StreamError::OutOfRange {
                requested: bit_pos,
                available: total,
            });
        }
        Ok(Self { data, pos: bit_pos })
    }

    /// Current position in bits
    pub fn bit_position(&self) -> usize {
        self.pos
    }

    /// Index of the byte holding the next bit
    pub fn byte_position(&self) -> usize {
        self.pos / 8
    }

    /// Bits left before the end of the buffer
    pub fn remaining_bits(&self) -> usize {
        self.data.len() * 8 - self.pos
    }

    /// True once every bit has been consumed
    pub fn is_empty(&self) -> bool {
        self.remaining_bits() == 0
    }

    /// Whether the cursor sits on a byte boundary
    pub fn is_aligned(&self) -> bool {
        self.pos % 8 == 0
    }

    fn ensure(&self, count: usize) -> Result<()> {
        let available = self.remaining_bits();
        if count > available {
            return Err(StreamError::OutOfRange {
                requested: count,
                available,
            });
        }
        Ok(())
    }

    /// Look at the next `count` bits without consuming them
    ///
    /// The field is assembled from every byte it touches (at most five for a
    /// 32-bit field at offset 7), shifted down by the intra-byte offset and
    /// masked to `count` bits. The same expression covers all alignments.
    pub fn peek_bits(&self, count: u32) -> Result<u32> {
        if count > MAX_BITS {
            return Err(StreamError::InvalidBitCount(count));
        }
        if count == 0 {
            return Ok(0);
        }
        let count = count as usize;
        self.ensure(count)?;

        let first = self.pos / 8;
        let last = (self.pos + count - 1) / 8;
        let shift = self.pos % 8;

        let window = self.data[first..=last]
            .iter()
            .rev()
            .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte));
        let mask = (1u64 << count) - 1;

        Ok(((window >> shift) & mask) as u32)
    }

    /// Read the next `count` bits (0..=32), LSB first
    pub fn read_bits(&mut self, count: u32) -> Result<u32> {
        let value = self.peek_bits(count)?;
        self.pos += count as usize;
        Ok(value)
    }

    /// Read a single bit
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? != 0)
    }

    /// Advance without reading
    pub fn skip_bits(&mut self, count: usize) -> Result<()> {
        self.ensure(count)?;
        self.pos += count;
        Ok(())
    }

    /// Advance to the next byte boundary, returning the number of bits dropped
    pub fn align_to_byte(&mut self) -> usize {
        let dropped = (8 - self.pos % 8) % 8;
        self.pos += dropped;
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_bits_basic() {
        // 0b11010010: bit 0 = 0, bit 1 = 1, bits 2-3 = 00, bits 4-7 = 1101
        let data = [0b11010010, 0b10110100];
        let mut cursor = BitCursor::new(&data);

        assert_eq!(cursor.read_bits(1).unwrap(), 0);
        assert_eq!(cursor.read_bits(1).unwrap(), 1);
        assert_eq!(cursor.read_bits(2).unwrap(), 0b00);
        assert_eq!(cursor.read_bits(4).unwrap(), 0b1101);
        assert_eq!(cursor.bit_position(), 8);
        assert_eq!(cursor.read_bits(8).unwrap(), 0b10110100);
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_read_across_byte_boundary() {
        let data = [0b1000_0000, 0b0000_0011];
        let mut cursor = BitCursor::new(&data);
        cursor.skip_bits(7).unwrap();
        // low bit from byte 0 (1), next two from byte 1 (1, 1)
        assert_eq!(cursor.read_bits(3).unwrap(), 0b111);
    }

    #[test]
    fn test_peek_does_not_advance() {
        let data = [0xAB, 0xCD];
        let mut cursor = BitCursor::new(&data);
        assert_eq!(cursor.peek_bits(12).unwrap(), 0xDAB);
        assert_eq!(cursor.bit_position(), 0);
        assert_eq!(cursor.read_bits(12).unwrap(), 0xDAB);
        assert_eq!(cursor.bit_position(), 12);
    }

    #[test]
    fn test_read_32_bits_unaligned() {
        let data = [0xFF, 0x12, 0x34, 0x56, 0x78];
        let mut cursor = BitCursor::at(&data, 7).unwrap();
        let expected = (u64::from_le_bytes([0xFF, 0x12, 0x34, 0x56, 0x78, 0, 0, 0]) >> 7) as u32;
        assert_eq!(cursor.read_bits(32).unwrap(), expected);
        assert_eq!(cursor.remaining_bits(), 1);
    }

    #[test]
    fn test_out_of_range() {
        let data = [0x00];
        let mut cursor = BitCursor::new(&data);
        cursor.skip_bits(5).unwrap();
        assert_eq!(
            cursor.read_bits(4),
            Err(StreamError::OutOfRange { requested: 4, available: 3 })
        );
        // position untouched on failure
        assert_eq!(cursor.bit_position(), 5);
    }

    #[test]
    fn test_invalid_bit_count() {
        let data = [0u8; 8];
        let cursor = BitCursor::new(&data);
        assert_eq!(cursor.peek_bits(33), Err(StreamError::InvalidBitCount(33)));
        assert_eq!(cursor.peek_bits(0), Ok(0));
    }

    #[test]
    fn test_align_to_byte() {
        let data = [0u8; 2];
        let mut cursor = BitCursor::new(&data);
        assert_eq!(cursor.align_to_byte(), 0);
        cursor.skip_bits(3).unwrap();
        assert_eq!(cursor.align_to_byte(), 5);
        assert!(cursor.is_aligned());
        assert_eq!(cursor.byte_position(), 1);
    }

    #[test]
    fn test_cursor_at_end() {
        let data = [0u8; 2];
        assert!(BitCursor::at(&data, 16).unwrap().is_empty());
        assert!(BitCursor::at(&data, 17).is_err());
    }
}
