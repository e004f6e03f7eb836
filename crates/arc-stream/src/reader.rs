//! Binary reader for byte-granular data

use crate::{Result, StreamError};

/// Byte order of multi-byte fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    /// Network order, used by every sfnt table
    #[default]
    Big,
    Little,
}

/// Binary reader with bounds checking
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
    endian: Endian,
}

impl<'a> ByteReader<'a> {
    /// Create a reader with the given byte order
    pub fn new(data: &'a [u8], endian: Endian) -> Self {
        Self { data, pos: 0, endian }
    }

    /// Create a big-endian reader
    pub fn big_endian(data: &'a [u8]) -> Self {
        Self::new(data, Endian::Big)
    }

    /// Create a little-endian reader
    pub fn little_endian(data: &'a [u8]) -> Self {
        Self::new(data, Endian::Little)
    }

    /// Byte order used for multi-byte reads
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Total length of the underlying buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current offset
    pub fn tell(&self) -> usize {
        self.pos
    }

    /// Reposition to an absolute offset (the end of the buffer is allowed)
    pub fn seek(&mut self, offset: usize) -> Result<()> {
        if offset > self.data.len() {
            return Err(StreamError::SeekOutOfBounds {
                offset,
                len: self.data.len(),
            });
        }
        self.pos = offset;
        Ok(())
    }

    /// Remaining bytes
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Consume `n` bytes, returning them as a borrowed slice
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(StreamError::EndOfStream { needed: n, remaining });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(self.take(N)?);
        Ok(bytes)
    }

    /// Skip bytes
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    /// Read u8
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take_array::<1>()?[0])
    }

    /// Read i8
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Read u16 in the reader's byte order
    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.take_array()?;
        Ok(match self.endian {
            Endian::Big => u16::from_be_bytes(bytes),
            Endian::Little => u16::from_le_bytes(bytes),
        })
    }

    /// Read i16 in the reader's byte order
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_u16()? as i16)
    }

    /// Read u32 in the reader's byte order
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.take_array()?;
        Ok(match self.endian {
            Endian::Big => u32::from_be_bytes(bytes),
            Endian::Little => u32::from_le_bytes(bytes),
        })
    }

    /// Read i32 in the reader's byte order
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    /// Read 4-byte tag
    pub fn read_tag(&mut self) -> Result<[u8; 4]> {
        self.take_array()
    }

    /// Read bytes
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_u16() {
        let data = [0x12, 0x34, 0x56, 0x78];
        let mut reader = ByteReader::big_endian(&data);
        assert_eq!(reader.read_u16().unwrap(), 0x1234);
        assert_eq!(reader.read_u16().unwrap(), 0x5678);
    }

    #[test]
    fn test_little_endian() {
        let data = [0x12, 0x34, 0x56, 0x78];
        let mut reader = ByteReader::little_endian(&data);
        assert_eq!(reader.read_u32().unwrap(), 0x7856_3412);
    }

    #[test]
    fn test_read_signed() {
        let data = [0xFF, 0xFE, 0x80];
        let mut reader = ByteReader::big_endian(&data);
        assert_eq!(reader.read_i16().unwrap(), -2);
        assert_eq!(reader.read_i8().unwrap(), -128);
    }

    #[test]
    fn test_read_tag() {
        let data = b"headtest";
        let mut reader = ByteReader::big_endian(data);
        assert_eq!(reader.read_tag().unwrap(), *b"head");
        assert_eq!(reader.tell(), 4);
    }

    #[test]
    fn test_end_of_stream() {
        let data = [0x01, 0x02, 0x03];
        let mut reader = ByteReader::big_endian(&data);
        reader.skip(2).unwrap();
        assert_eq!(
            reader.read_u16(),
            Err(StreamError::EndOfStream { needed: 2, remaining: 1 })
        );
        assert_eq!(reader.tell(), 2);
        assert_eq!(reader.read_u8().unwrap(), 0x03);
        assert!(reader.read_u8().is_err());
    }

    #[test]
    fn test_seek() {
        let data = [0xAA, 0xBB, 0xCC];
        let mut reader = ByteReader::big_endian(&data);
        reader.seek(2).unwrap();
        assert_eq!(reader.read_u8().unwrap(), 0xCC);
        reader.seek(3).unwrap();
        assert_eq!(reader.remaining(), 0);
        assert!(reader.seek(4).is_err());
    }

    #[test]
    fn test_read_bytes_borrows() {
        let data = [1, 2, 3, 4, 5];
        let mut reader = ByteReader::big_endian(&data);
        reader.skip(1).unwrap();
        assert_eq!(reader.read_bytes(3).unwrap(), &[2, 3, 4]);
        assert_eq!(reader.remaining(), 1);
    }
}
