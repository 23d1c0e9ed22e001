//! BitReader: reads a packed bitstream back one bit at a time, most significant bit first.
//!
//! The trailing pad bits written by the BitPacker are excluded up front, so the reader
//! reports the end of data exactly where the last real code ended.

use crate::error::HuffError;

const BIT_MASK: u8 = 0xff;

/// Reads bits from an in-memory buffer.
#[derive(Debug)]
pub struct BitReader<'a> {
    buffer: &'a [u8],
    cursor: usize,
    bit_index: usize,
    /// Total number of readable bits (buffer bits less padding).
    end: usize,
}

impl<'a> BitReader<'a> {
    /// Creates a new BitReader over `buffer`, ignoring the last `padding` bits.
    pub fn new(buffer: &'a [u8], padding: u8) -> Result<Self, HuffError> {
        if padding > 7 || (buffer.is_empty() && padding > 0) {
            return Err(HuffError::InvalidPadding(padding));
        }
        Ok(Self {
            buffer,
            cursor: 0,
            bit_index: 0,
            end: buffer.len() * 8 - padding as usize,
        })
    }

    /// Bits read so far
    pub fn position(&self) -> usize {
        self.cursor * 8 + self.bit_index
    }

    /// Bits left before the padding
    pub fn remaining(&self) -> usize {
        self.end - self.position()
    }

    /// Return bit as Option<usize> (1 or 0), or None if there is no more data to read
    pub fn bit(&mut self) -> Option<usize> {
        if self.position() >= self.end {
            return None;
        }
        let bit =
            (self.buffer[self.cursor] & BIT_MASK >> self.bit_index) >> (7 - self.bit_index);
        self.bit_index += 1;
        self.bit_index %= 8;
        if self.bit_index == 0 {
            self.cursor += 1;
        }
        Some(bit as usize)
    }

    /// Return Option<Bool> *true* if the next bit is 1, *false* if 0, consuming the bit,
    /// or None if there is no more data to read
    pub fn bool_bit(&mut self) -> Option<bool> {
        self.bit().map(|bit| bit == 1)
    }

    /// Debugging function. Report current position in the buffer.
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.cursor, self.bit_index)
    }
}
