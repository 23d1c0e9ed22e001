//! The bitstream module packs Huffman codes into bytes and reads them back.
//!
//! Bits are stored most significant bit first. The packed data is padded with zero bits up
//! to the next byte boundary; the number of pad bits (0-7) travels with the payload so the
//! reader can stop exactly where the data ends.
//!
pub mod bitpacker;
pub mod bitreader;
