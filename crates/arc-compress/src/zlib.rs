//! zlib wrapper (RFC 1950)

use crate::{DeflateError, Result};

/// CMF + FLG
pub const ZLIB_HEADER_LEN: usize = 2;

/// Adler-32 trailer
pub const ZLIB_TRAILER_LEN: usize = 4;

/// Parsed zlib stream header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZlibHeader {
    /// LZ77 window size in bytes
    pub window_size: u32,
    /// FLEVEL compression level hint (0-3)
    pub level: u8,
}

impl ZlibHeader {
    /// Validate CMF/FLG at the start of `data`
    pub fn parse(data: &[u8]) -> Result<Self> {
        let [cmf, flg, ..] = *data else {
            return Err(DeflateError::InvalidZlibHeader("stream too short"));
        };

        // CM
        if cmf & 0x0F != 8 {
            return Err(DeflateError::InvalidZlibHeader("compression method is not deflate"));
        }

        let cinfo = cmf >> 4;
        if cinfo > 7 {
            return Err(DeflateError::InvalidZlibHeader("window size above 32K"));
        }

        // CMF:FLG as a big-endian u16 is a multiple of 31
        if ((u16::from(cmf) << 8) | u16::from(flg)) % 31 != 0 {
            return Err(DeflateError::InvalidZlibHeader("header checksum mismatch"));
        }

        // FDICT
        if flg & 0x20 != 0 {
            return Err(DeflateError::InvalidZlibHeader("preset dictionary"));
        }

        Ok(Self {
            window_size: 1 << (u32::from(cinfo) + 8),
            level: flg >> 6,
        })
    }

    /// Raw DEFLATE data between the header and the Adler-32 trailer
    pub fn payload(data: &[u8]) -> Result<(Self, &[u8])> {
        let header = Self::parse(data)?;
        if data.len() < ZLIB_HEADER_LEN + ZLIB_TRAILER_LEN {
            return Err(DeflateError::InvalidZlibHeader("stream too short"));
        }
        Ok((header, &data[ZLIB_HEADER_LEN..data.len() - ZLIB_TRAILER_LEN]))
    }
}
