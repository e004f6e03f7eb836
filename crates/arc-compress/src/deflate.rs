//! DEFLATE block headers (RFC 1951 §3.2.3, §3.2.7)
//!
//! Blocks are not byte aligned: each header starts at whatever bit the
//! previous block ended on. Only stored blocks realign, after their header.

use arc_stream::{BitCursor, StreamError};

use crate::huffman::CanonicalCode;
use crate::{DeflateConfig, DeflateError, Result};

/// Number of symbols in the code-length alphabet
pub const CODE_LENGTH_SYMBOLS: usize = 19;

/// Order in which code-length code lengths appear in a dynamic header
pub const CODE_LENGTH_ORDER: [usize; CODE_LENGTH_SYMBOLS] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// Width of HLIT + HDIST + HCLEN
const DYNAMIC_COUNTS_BITS: u32 = 5 + 5 + 4;

/// Width of one code-length code length
const CODE_LENGTH_BITS: u32 = 3;

/// BTYPE field values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    Stored,
    FixedHuffman,
    DynamicHuffman,
    Reserved,
}

impl BlockType {
    /// Map the 2-bit BTYPE field
    pub fn from_bits(bits: u32) -> Self {
        match bits & 0b11 {
            0 => Self::Stored,
            1 => Self::FixedHuffman,
            2 => Self::DynamicHuffman,
            _ => Self::Reserved,
        }
    }
}

/// Counts and code-length table of a dynamic Huffman block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicHeader {
    /// HLIT + 257, in 257..=288
    pub literal_count: u16,
    /// HDIST + 1, in 1..=32
    pub distance_count: u8,
    /// HCLEN + 4, in 4..=19
    pub code_length_count: u8,
    /// Code lengths indexed by code-length symbol; unsent entries are 0
    pub code_lengths: [u8; CODE_LENGTH_SYMBOLS],
}

impl DynamicHeader {
    /// Read the fields following BTYPE = 2
    fn read(cursor: &mut BitCursor<'_>) -> Result<Self> {
        // HLIT, HDIST and HCLEN are taken as one 14-bit record
        let counts = cursor.read_bits(DYNAMIC_COUNTS_BITS)?;
        let literal_count = (counts & 0x1F) as u16 + 257;
        let distance_count = ((counts >> 5) & 0x1F) as u8 + 1;
        let code_length_count = ((counts >> 10) & 0x0F) as u8 + 4;

        let table_bits = code_length_count as usize * CODE_LENGTH_BITS as usize;
        if cursor.remaining_bits() < table_bits {
            return Err(StreamError::OutOfRange {
                requested: table_bits,
                available: cursor.remaining_bits(),
            }
            .into());
        }

        let mut code_lengths = [0u8; CODE_LENGTH_SYMBOLS];
        for &symbol in &CODE_LENGTH_ORDER[..code_length_count as usize] {
            code_lengths[symbol] = cursor.read_bits(CODE_LENGTH_BITS)? as u8;
        }

        tracing::debug!(
            hlit = literal_count,
            hdist = distance_count,
            hclen = code_length_count,
            "DEFLATE dynamic block counts"
        );
        tracing::trace!(?code_lengths, "DEFLATE code-length table");

        Ok(Self {
            literal_count,
            distance_count,
            code_length_count,
            code_lengths,
        })
    }

    /// Canonical codes for the code-length alphabet
    pub fn code_length_code(&self) -> Result<CanonicalCode> {
        CanonicalCode::from_lengths(&self.code_lengths)
    }
}

/// Block type with its decoded header fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    /// Uncompressed; the cursor is left byte aligned at the first body byte
    Stored { len: u16 },
    FixedHuffman,
    DynamicHuffman(DynamicHeader),
}

impl BlockKind {
    pub fn block_type(&self) -> BlockType {
        match self {
            Self::Stored { .. } => BlockType::Stored,
            Self::FixedHuffman => BlockType::FixedHuffman,
            Self::DynamicHuffman(_) => BlockType::DynamicHuffman,
        }
    }
}

/// One decoded block header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    /// BFINAL
    pub is_final: bool,
    pub kind: BlockKind,
}

impl BlockHeader {
    pub fn block_type(&self) -> BlockType {
        self.kind.block_type()
    }

    /// Dynamic block fields, if this is a dynamic block
    pub fn dynamic(&self) -> Option<&DynamicHeader> {
        match &self.kind {
            BlockKind::DynamicHuffman(header) => Some(header),
            _ => None,
        }
    }
}

/// Decode one block header at the cursor
///
/// The cursor only advances when the whole header decodes. On success it
/// sits at the first bit of the block body.
pub fn decode_block_header(cursor: &mut BitCursor<'_>) -> Result<BlockHeader> {
    let mut probe = cursor.clone();

    let is_final = probe.read_bit()?;
    let kind = match BlockType::from_bits(probe.read_bits(2)?) {
        BlockType::Stored => {
            probe.align_to_byte();
            let len = probe.read_bits(16)? as u16;
            let nlen = probe.read_bits(16)? as u16;
            if len != !nlen {
                return Err(DeflateError::StoredLengthMismatch { len, nlen });
            }
            BlockKind::Stored { len }
        }
        BlockType::FixedHuffman => BlockKind::FixedHuffman,
        BlockType::DynamicHuffman => BlockKind::DynamicHuffman(DynamicHeader::read(&mut probe)?),
        BlockType::Reserved => return Err(DeflateError::InvalidBlockType),
    };

    *cursor = probe;
    Ok(BlockHeader { is_final, kind })
}

/// Walker state between headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    BlockStart,
    Body { is_final: bool },
    Finished,
}

/// Walks the block headers of one DEFLATE stream
///
/// Stored bodies are skipped in place. Compressed bodies have no length
/// field, so after a Huffman header the walker pauses until the caller has
/// consumed the body through [`body_cursor`](Self::body_cursor) and called
/// [`finish_body`](Self::finish_body).
#[derive(Debug, Clone)]
pub struct DeflateHeaderDecoder<'a> {
    cursor: BitCursor<'a>,
    config: DeflateConfig,
    state: State,
    blocks: usize,
}

impl<'a> DeflateHeaderDecoder<'a> {
    /// Walk a raw DEFLATE stream from its first bit
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_config(BitCursor::new(data), DeflateConfig::default())
    }

    pub fn with_config(cursor: BitCursor<'a>, config: DeflateConfig) -> Self {
        Self {
            cursor,
            config,
            state: State::BlockStart,
            blocks: 0,
        }
    }

    /// Decode the next block header
    ///
    /// Returns `Ok(None)` once the final block has been passed. A failed
    /// decode ends the walk.
    pub fn next_header(&mut self) -> Result<Option<BlockHeader>> {
        match self.state {
            State::Finished => return Ok(None),
            State::Body { .. } => return Err(DeflateError::BodyPending),
            State::BlockStart => {}
        }

        if self.blocks >= self.config.max_blocks {
            self.state = State::Finished;
            return Err(DeflateError::BlockLimitExceeded(self.config.max_blocks));
        }

        let start = self.cursor.bit_position();
        let header = match decode_block_header(&mut self.cursor) {
            Ok(header) => header,
            Err(err) => {
                self.state = State::Finished;
                return Err(err);
            }
        };
        self.blocks += 1;

        tracing::debug!(
            block = self.blocks,
            bit = start,
            is_final = header.is_final,
            block_type = ?header.block_type(),
            "DEFLATE block header"
        );

        self.state = State::Body { is_final: header.is_final };
        if let BlockKind::Stored { len } = header.kind {
            if self.config.skip_stored_bodies {
                if let Err(err) = self.cursor.skip_bits(usize::from(len) * 8) {
                    self.state = State::Finished;
                    return Err(err.into());
                }
                self.finish_body();
            }
        }

        Ok(Some(header))
    }

    /// Cursor positioned in the pending block body, if any
    pub fn body_cursor(&mut self) -> Option<&mut BitCursor<'a>> {
        match self.state {
            State::Body { .. } => Some(&mut self.cursor),
            _ => None,
        }
    }

    /// Mark the pending body as consumed
    pub fn finish_body(&mut self) {
        if let State::Body { is_final } = self.state {
            self.state = if is_final {
                State::Finished
            } else {
                State::BlockStart
            };
        }
    }

    /// True while a block body waits to be consumed
    pub fn body_pending(&self) -> bool {
        matches!(self.state, State::Body { .. })
    }

    /// True after the final block or a failed decode
    pub fn is_finished(&self) -> bool {
        self.state == State::Finished
    }

    /// Number of headers decoded so far
    pub fn blocks_read(&self) -> usize {
        self.blocks
    }

    /// Current position in bits
    pub fn bit_position(&self) -> usize {
        self.cursor.bit_position()
    }
}

/// Collect the headers reachable without decoding a compressed body
///
/// Walks stored blocks and stops after the final block or the first
/// Huffman-coded header, whichever comes first.
pub fn scan_block_headers(data: &[u8], config: DeflateConfig) -> Result<Vec<BlockHeader>> {
    let config = DeflateConfig {
        skip_stored_bodies: true,
        ..config
    };
    let mut decoder = DeflateHeaderDecoder::with_config(BitCursor::new(data), config);
    let mut headers = Vec::new();

    while let Some(header) = decoder.next_header()? {
        headers.push(header);
        if decoder.body_pending() {
            break;
        }
    }

    Ok(headers)
}
