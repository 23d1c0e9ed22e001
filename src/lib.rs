//! Byte oriented Huffman compression.
//!
//! Turns any byte buffer into a serialized code tree plus a packed bitstream, and back.
//! Each call is a pure function of its input: no state is shared between calls.
//!
//! ```
//! use huffzip::{compress, decompress, CompressedPayload};
//!
//! let (payload, stats) = compress(b"aaabbc");
//! let bytes = payload.to_bytes()?;
//! assert_eq!(bytes.len(), stats.compressed_size);
//!
//! let restored = decompress(&CompressedPayload::from_bytes(&bytes)?)?;
//! assert_eq!(restored, b"aaabbc");
//! # Ok::<(), huffzip::HuffError>(())
//! ```
//!
//! The `huffzip` binary wraps this in a small bzip2 style command line tool:
//!
//! `$> huffzip -k notes.txt`
//!
//! This writes notes.txt.huf and keeps the original.
//!
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use compression::compress::{compress, CompressionStats};
pub use compression::decompress::decompress;
pub use compression::payload::CompressedPayload;
pub use error::{HuffError, TreeFault};
