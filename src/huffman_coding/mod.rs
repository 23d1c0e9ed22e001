//! The huffman module builds the code tree and everything derived from it.
//!
//! - huffman: the tree node type and the min-heap tree builder.
//! - code_table: walks a tree into per-symbol bit codes.
//! - tree_codec: writes a tree to bytes and reads it back.
//!
//! Ties between equal weights are broken first-in-first-out, which makes the tree for a
//! given input reproducible. Nothing outside this crate should rely on that: only the
//! round trip through the serialized tree is guaranteed.

pub mod code_table;
pub mod huffman;
pub mod tree_codec;
