//! The compression module composes the pieces into whole compress and decompress calls.
//!
//! Compression walks through these stages for each call:
//! - Frequency count: how often each byte value occurs.
//! - Tree build: merge the two lightest nodes until one root is left.
//! - Code generation: walk the tree, 0 for left and 1 for right.
//! - Encoding: pack each byte's code into bytes and record the pad bits.
//!
//! Two inputs skip most of that. Empty input gives an empty payload, and input made of one
//! repeated byte gives a degenerate payload holding just the byte and its count.
//!
//! Decompression restores the tree from its serialized form and walks it bit by bit,
//! stopping after the recorded original length.
//!
//! Nothing is kept between calls, so independent calls can run on separate threads. The
//! batch runner does that for files written to disk, and keeps argument order for stdout.
//!

pub mod batch;
pub mod compress;
pub mod decompress;
pub mod payload;
