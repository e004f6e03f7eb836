//! Required-size accounting for glyph records
//!
//! A glyph record's length is only known as it is read: the contour count
//! sizes the end-point array, the instruction length sizes the instructions,
//! the flags size the coordinates. `SizeBudget` grows the number of bytes the
//! record needs one structured unit at a time and checks it against the
//! enclosing table before that unit is read.

use crate::{Result, TrueTypeError};

/// Running byte requirement of one record inside a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeBudget {
    offset: usize,
    required: usize,
    table_size: usize,
}

impl SizeBudget {
    /// Start accounting for a record at `offset` in a table of `table_size` bytes
    pub fn new(offset: usize, table_size: usize) -> Self {
        Self {
            offset,
            required: 0,
            table_size,
        }
    }

    /// Extend the requirement by `bytes`, failing if the table cannot hold it
    pub fn reserve(&mut self, bytes: usize) -> Result<()> {
        let required = self.required.saturating_add(bytes);
        let fits = self
            .offset
            .checked_add(required)
            .is_some_and(|end| end <= self.table_size);
        if !fits {
            return Err(TrueTypeError::TruncatedGlyph {
                offset: self.offset,
                required,
                table_size: self.table_size,
            });
        }
        self.required = required;
        Ok(())
    }

    /// Bytes reserved so far
    pub fn required(&self) -> usize {
        self.required
    }
}
