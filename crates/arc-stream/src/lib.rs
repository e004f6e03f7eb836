//! Arclight Stream - Binary cursors
//!
//! Safe cursors over borrowed byte buffers, shared by the decoders:
//! - `BitCursor`: LSB-first bit fields at arbitrary bit alignment (DEFLATE)
//! - `ByteReader`: bounds-checked typed reads in a fixed byte order (sfnt)
//!
//! Neither cursor owns its buffer, and every read is validated against the
//! remaining length before anything is consumed.

pub mod bits;
pub mod reader;

pub use bits::BitCursor;
pub use reader::{ByteReader, Endian};

/// Cursor error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    #[error("Bit read out of range: requested {requested} bits, {available} available")]
    OutOfRange { requested: usize, available: usize },

    #[error("Unexpected end of stream: needed {needed} bytes, {remaining} remaining")]
    EndOfStream { needed: usize, remaining: usize },

    #[error("Invalid bit count: {0} (at most 32)")]
    InvalidBitCount(u32),

    #[error("Seek to {offset} outside buffer of {len} bytes")]
    SeekOutOfBounds { offset: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, StreamError>;
