use log::error;

use crate::huffman_coding::code_table::Code;

/// Packs variable length codes into bytes, most significant bit first.
pub struct BitPacker {
    pub output: Vec<u8>,
    /// Zero bits added to the last byte by flush(). Always 0-7.
    pub padding: u8,
    queue: u64,
    q_bits: u8,
}

impl BitPacker {
    /// Create a new BitPacker with an output buffer of the size specified. Call flush()
    /// before reading the output or the last partial byte will be missing.
    pub fn new(size: usize) -> Self {
        Self {
            output: Vec::with_capacity(size),
            padding: 0,
            queue: 0,
            q_bits: 0,
        }
    }

    /// Internal bitstream write function common to all out functions.
    fn write_stream(&mut self) {
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push(byte); //push the packed byte out
            self.q_bits -= 8; //adjust the count of bits left in the queue
        }
    }

    /// Writes the low `depth` bits of data (0-32 bits).
    pub fn out_bits(&mut self, data: u32, depth: u8) {
        if depth == 0 {
            return;
        }
        debug_assert!(depth <= 32);
        self.queue <<= depth; //shift queue by bit length
        self.queue |= (data & (0xffffffff >> (32 - depth))) as u64; //add data portion to queue
        self.q_bits += depth; //update depth of queue bits
        self.write_stream();
    }

    /// Writes a Huffman code, 32 bits at a time starting from its most significant end.
    pub fn put_code(&mut self, code: Code) {
        let mut remaining = code.len;
        while remaining > 0 {
            let take = remaining.min(32);
            remaining -= take;
            self.out_bits((code.bits >> remaining) as u32, take);
        }
    }

    /// Flushes the remaining bits (1-7) from the queue, padding with 0s in the least
    /// signficant bits, and records how many pad bits were used.
    pub fn flush(&mut self) -> u8 {
        self.padding = (8 - self.q_bits % 8) % 8;
        if self.q_bits > 0 {
            self.queue <<= self.padding; //pad the queue with zeros
            self.q_bits += self.padding;
            self.write_stream(); // write out all that is left
            if self.q_bits > 0 {
                error!("Stuff left in the BitPacker queue.");
            }
        }
        self.padding
    }

    /// Number of bits written so far, not counting padding
    pub fn bit_len(&self) -> usize {
        self.output.len() * 8 + self.q_bits as usize - self.padding as usize
    }

    /// Debugging function to return the number of bytes.bits output so far
    pub fn loc(&self) -> String {
        format! {"[{}.{}]",((self.output.len() * 8) + self.q_bits as usize)/8, ((self.output.len() * 8) + self.q_bits as usize)%8}
    }
}
