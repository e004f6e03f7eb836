//! Canonical Huffman code assignment (RFC 1951 §3.2.2)

use crate::{DeflateError, Result};

/// Longest code DEFLATE allows
pub const MAX_CODE_LENGTH: u8 = 15;

/// One assigned code, MSB-first as written in RFC 1951
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codeword {
    pub bits: u16,
    pub len: u8,
}

impl Codeword {
    /// The code with its bits reversed, as it appears in an LSB-first stream
    pub fn lsb_first(&self) -> u16 {
        if self.len == 0 {
            return 0;
        }
        self.bits.reverse_bits() >> (16 - u32::from(self.len))
    }
}

/// Codes assigned to an alphabet from its code lengths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCode {
    /// Indexed by symbol; `None` for symbols with length 0
    codes: Vec<Option<Codeword>>,
    max_len: u8,
    complete: bool,
}

impl CanonicalCode {
    /// Assign codes to `lengths` (0 = symbol unused)
    ///
    /// Shorter codes sort first; codes of equal length follow symbol order.
    /// Fails if the lengths claim more code space than exists.
    pub fn from_lengths(lengths: &[u8]) -> Result<Self> {
        // Count codes of each length
        let mut bl_count = [0u32; MAX_CODE_LENGTH as usize + 1];
        for &len in lengths {
            if len > MAX_CODE_LENGTH {
                return Err(DeflateError::InvalidCodeLength(len));
            }
            bl_count[len as usize] += 1;
        }
        bl_count[0] = 0;

        let max_len = lengths.iter().copied().max().unwrap_or(0);

        // Kraft check: unused code space left after each length
        let mut left = 1i64;
        for &count in &bl_count[1..] {
            left = (left << 1) - i64::from(count);
            if left < 0 {
                return Err(DeflateError::OversubscribedCode);
            }
        }

        // Generate next_code values
        let mut next_code = [0u32; MAX_CODE_LENGTH as usize + 1];
        let mut code = 0u32;
        for bits in 1..=MAX_CODE_LENGTH as usize {
            code = (code + bl_count[bits - 1]) << 1;
            next_code[bits] = code;
        }

        let codes = lengths
            .iter()
            .map(|&len| {
                (len != 0).then(|| {
                    let slot = &mut next_code[len as usize];
                    let bits = *slot as u16;
                    *slot += 1;
                    Codeword { bits, len }
                })
            })
            .collect();

        Ok(Self {
            codes,
            max_len,
            complete: left == 0 && max_len > 0,
        })
    }

    /// Code assigned to `symbol`
    pub fn codeword(&self, symbol: usize) -> Option<Codeword> {
        self.codes.get(symbol).copied().flatten()
    }

    /// Alphabet size, including unused symbols
    pub fn symbol_count(&self) -> usize {
        self.codes.len()
    }

    /// Longest assigned code
    pub fn max_len(&self) -> u8 {
        self.max_len
    }

    /// Whether the assigned codes fill the whole code space
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Symbols that received a code
    pub fn used_symbols(&self) -> impl Iterator<Item = (usize, Codeword)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.map(|code| (symbol, code)))
    }
}
