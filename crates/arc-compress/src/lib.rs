//! Arclight Compress - DEFLATE stream structure
//!
//! Decodes the structural parts of DEFLATE (RFC 1951) streams:
//! - 3-bit block headers (final flag + block type)
//! - Dynamic block counts (HLIT/HDIST/HCLEN) and the 19-entry code-length table
//! - Stored block LEN/NLEN framing
//! - zlib (RFC 1950) wrapper headers
//! - Canonical code assignment from code lengths
//!
//! Expanding compressed block bodies is left to the caller.

pub mod deflate;
pub mod huffman;
pub mod zlib;

pub use arc_stream::{BitCursor, StreamError};
pub use deflate::{
    decode_block_header, scan_block_headers, BlockHeader, BlockKind, BlockType,
    DeflateHeaderDecoder, DynamicHeader, CODE_LENGTH_ORDER,
};
pub use huffman::{CanonicalCode, Codeword};
pub use zlib::ZlibHeader;

/// DEFLATE decoding error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeflateError {
    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error("Invalid block type")]
    InvalidBlockType,

    #[error("Stored block length {len:#06x} does not match its complement {nlen:#06x}")]
    StoredLengthMismatch { len: u16, nlen: u16 },

    #[error("Compressed block body has not been consumed")]
    BodyPending,

    #[error("Stream exceeds the limit of {0} blocks")]
    BlockLimitExceeded(usize),

    #[error("Invalid zlib header: {0}")]
    InvalidZlibHeader(&'static str),

    #[error("Invalid code length {0}")]
    InvalidCodeLength(u8),

    #[error("Code lengths oversubscribe the code space")]
    OversubscribedCode,
}

pub type Result<T> = std::result::Result<T, DeflateError>;

/// Header walker configuration
#[derive(Debug, Clone)]
pub struct DeflateConfig {
    /// Maximum number of blocks walked before giving up
    pub max_blocks: usize,

    /// Skip over stored block bodies instead of handing them to the caller
    pub skip_stored_bodies: bool,
}

impl Default for DeflateConfig {
    fn default() -> Self {
        Self {
            max_blocks: 1 << 16,
            skip_stored_bodies: true,
        }
    }
}
