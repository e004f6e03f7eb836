//! Edge case tests for arc-compress
//!
//! Header decoding at every bit alignment, truncated streams and malformed
//! block framing.

use arc_compress::*;

/// LSB-first bit packer
#[derive(Default)]
struct Bits {
    bytes: Vec<u8>,
    len: usize,
}

impl Bits {
    fn push(&mut self, value: u32, count: u32) -> &mut Self {
        for i in 0..count {
            if self.len % 8 == 0 {
                self.bytes.push(0);
            }
            let last = self.bytes.len() - 1;
            self.bytes[last] |= (((value >> i) & 1) as u8) << (self.len % 8);
            self.len += 1;
        }
        self
    }
}

/// Dynamic header with every field distinguishable
fn dynamic_header(bits: &mut Bits, is_final: bool, hlit: u32, hdist: u32, lengths: &[u32]) {
    bits.push(is_final as u32, 1)
        .push(2, 2)
        .push(hlit, 5)
        .push(hdist, 5)
        .push(lengths.len() as u32 - 4, 4);
    for &len in lengths {
        bits.push(len, 3);
    }
}

// ============================================================================
// ALIGNMENT
// ============================================================================

#[test]
fn test_dynamic_header_at_every_alignment() {
    let lengths = [7, 6, 5, 4, 3, 2, 1, 0, 1, 2, 3, 4, 5, 6, 7, 1, 2, 3, 4];
    for offset in 0..8u32 {
        let mut bits = Bits::default();
        bits.push(0, offset);
        dynamic_header(&mut bits, true, 21, 13, &lengths);
        let end = bits.len;

        let mut cursor = BitCursor::at(&bits.bytes, offset as usize).unwrap();
        let header = decode_block_header(&mut cursor).unwrap();
        let dynamic = header.dynamic().unwrap();

        assert!(header.is_final);
        assert_eq!(dynamic.literal_count, 257 + 21, "offset {offset}");
        assert_eq!(dynamic.distance_count, 1 + 13, "offset {offset}");
        assert_eq!(dynamic.code_length_count, 19, "offset {offset}");
        for (i, &len) in lengths.iter().enumerate() {
            assert_eq!(
                dynamic.code_lengths[CODE_LENGTH_ORDER[i]] as u32, len,
                "offset {offset}, entry {i}"
            );
        }
        assert_eq!(cursor.bit_position(), end);
    }
}

#[test]
fn test_maximum_counts() {
    let mut bits = Bits::default();
    dynamic_header(&mut bits, false, 31, 31, &[0; 19]);
    let header = decode_block_header(&mut BitCursor::new(&bits.bytes)).unwrap();
    let dynamic = header.dynamic().unwrap();
    assert_eq!(dynamic.literal_count, 288);
    assert_eq!(dynamic.distance_count, 32);
    assert_eq!(dynamic.code_length_count, 19);
}

#[test]
fn test_code_length_code_from_header() {
    // symbols 16, 17, 18, 0 get lengths 2, 2, 2, 2: a complete code
    let mut bits = Bits::default();
    dynamic_header(&mut bits, true, 0, 0, &[2, 2, 2, 2]);
    let header = decode_block_header(&mut BitCursor::new(&bits.bytes)).unwrap();
    let code = header.dynamic().unwrap().code_length_code().unwrap();

    assert!(code.is_complete());
    assert_eq!(code.codeword(0), Some(Codeword { bits: 0b00, len: 2 }));
    assert_eq!(code.codeword(16), Some(Codeword { bits: 0b01, len: 2 }));
    assert_eq!(code.codeword(18), Some(Codeword { bits: 0b11, len: 2 }));
    assert_eq!(code.codeword(1), None);
}

// ============================================================================
// TRUNCATION
// ============================================================================

#[test]
fn test_truncated_dynamic_header_fails_without_advancing() {
    let mut bits = Bits::default();
    dynamic_header(&mut bits, true, 0, 0, &[1; 19]);
    assert_eq!(bits.bytes.len(), 10);

    // Every byte prefix is too short for the 74-bit header
    for len in 0..bits.bytes.len() {
        let mut cursor = BitCursor::new(&bits.bytes[..len]);
        assert!(decode_block_header(&mut cursor).is_err(), "prefix of {len} bytes decoded");
        assert_eq!(cursor.bit_position(), 0);
    }
    assert!(decode_block_header(&mut BitCursor::new(&bits.bytes)).is_ok());
}

#[test]
fn test_empty_stream() {
    let mut cursor = BitCursor::new(&[]);
    assert!(matches!(
        decode_block_header(&mut cursor),
        Err(DeflateError::Stream(StreamError::OutOfRange { .. }))
    ));
}

#[test]
fn test_stored_body_past_end() {
    // stored, final, LEN = 8 but only 2 body bytes
    let data = [0b0000_0001, 0x08, 0x00, 0xF7, 0xFF, 1, 2];
    let mut decoder = DeflateHeaderDecoder::new(&data);
    assert!(matches!(
        decoder.next_header(),
        Err(DeflateError::Stream(StreamError::OutOfRange { .. }))
    ));
    assert!(decoder.is_finished());
    assert_eq!(decoder.next_header(), Ok(None));
}

// ============================================================================
// BLOCK SEQUENCES
// ============================================================================

#[test]
fn test_final_reserved_block_fails() {
    let data = [0b0000_0111];
    let mut decoder = DeflateHeaderDecoder::new(&data);
    assert_eq!(decoder.next_header(), Err(DeflateError::InvalidBlockType));
    assert!(decoder.is_finished());
}

#[test]
fn test_stored_blocks_then_dynamic() {
    let mut bits = Bits::default();
    // two empty stored blocks, then a final dynamic block
    for _ in 0..2 {
        bits.push(0, 1).push(0, 2);
        let pad = (8 - bits.len % 8) % 8;
        bits.push(0, pad as u32).push(0x0000, 16).push(0xFFFF, 16);
    }
    dynamic_header(&mut bits, true, 1, 2, &[3, 3, 3, 3]);

    let headers = scan_block_headers(&bits.bytes, DeflateConfig::default()).unwrap();
    assert_eq!(headers.len(), 3);
    assert_eq!(headers[0].kind, BlockKind::Stored { len: 0 });
    assert_eq!(headers[1].kind, BlockKind::Stored { len: 0 });
    assert!(headers[2].is_final);
    assert_eq!(headers[2].dynamic().unwrap().literal_count, 258);
}

#[test]
fn test_body_cursor_handoff() {
    // fixed block (not final) followed by a fixed final block 5 bits later
    let mut bits = Bits::default();
    bits.push(0, 1).push(1, 2).push(0b10101, 5).push(1, 1).push(1, 2);

    let mut decoder = DeflateHeaderDecoder::new(&bits.bytes);
    let first = decoder.next_header().unwrap().unwrap();
    assert_eq!(first.block_type(), BlockType::FixedHuffman);

    // stand-in for a body decoder consuming 5 bits
    let body = decoder.body_cursor().unwrap();
    assert_eq!(body.read_bits(5).unwrap(), 0b10101);
    decoder.finish_body();

    let second = decoder.next_header().unwrap().unwrap();
    assert!(second.is_final);
    assert_eq!(second.block_type(), BlockType::FixedHuffman);
    decoder.finish_body();
    assert!(decoder.body_cursor().is_none());
    assert_eq!(decoder.next_header(), Ok(None));
}

#[test]
fn test_block_limit() {
    // endless run of empty stored blocks
    let mut data = Vec::new();
    for _ in 0..4 {
        data.extend_from_slice(&[0x00, 0x00, 0x00, 0xFF, 0xFF]);
    }
    let config = DeflateConfig {
        max_blocks: 3,
        ..DeflateConfig::default()
    };
    let mut decoder = DeflateHeaderDecoder::with_config(BitCursor::new(&data), config);
    for _ in 0..3 {
        decoder.next_header().unwrap().unwrap();
    }
    assert_eq!(decoder.next_header(), Err(DeflateError::BlockLimitExceeded(3)));
}

#[test]
fn test_stored_body_left_to_caller() {
    let data = [0b0000_0001, 0x03, 0x00, 0xFC, 0xFF, b'a', b'b', b'c'];
    let config = DeflateConfig {
        skip_stored_bodies: false,
        ..DeflateConfig::default()
    };
    let mut decoder = DeflateHeaderDecoder::with_config(BitCursor::new(&data), config);
    let header = decoder.next_header().unwrap().unwrap();
    assert_eq!(header.kind, BlockKind::Stored { len: 3 });

    let body = decoder.body_cursor().unwrap();
    assert_eq!(body.byte_position(), 5);
    assert_eq!(body.read_bits(8).unwrap(), u32::from(b'a'));
}

#[test]
fn test_zlib_wrapped_stream() {
    // zlib header, empty final stored block, Adler-32 of nothing (1)
    let data = [0x78, 0x01, 0x01, 0x00, 0x00, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x01];
    let (header, payload) = ZlibHeader::payload(&data).unwrap();
    assert_eq!(header.window_size, 32768);

    let headers = scan_block_headers(payload, DeflateConfig::default()).unwrap();
    assert_eq!(headers.len(), 1);
    assert!(headers[0].is_final);
    assert_eq!(headers[0].kind, BlockKind::Stored { len: 0 });
}
