//! Error types for huffzip.
//!
//! Every failure is returned to the caller as a `HuffError`. Decoding never attempts a
//! best-effort partial result: a Huffman bitstream has no error correction, so any damage
//! is reported rather than papered over.

use std::path::PathBuf;

use thiserror::Error;

/// What went wrong while reading a serialized tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeFault {
    /// Marker byte was neither 0 (internal) nor 1 (leaf)
    #[error("invalid node marker {0}")]
    BadMarker(u8),
    /// The structure asked for more bytes than the buffer holds
    #[error("ran past the end of the tree data")]
    Overrun,
    /// Nesting deeper than any tree over 256 symbols can be
    #[error("tree nesting too deep")]
    TooDeep,
    /// Bytes left over after the root was complete
    #[error("unexpected bytes after the tree")]
    TrailingBytes,
    /// A bit asked for a branch the tree does not have
    #[error("bitstream follows a branch missing from the tree")]
    MissingBranch,
}

#[derive(Debug, Error)]
pub enum HuffError {
    #[error("corrupt tree at byte {offset}: {fault}")]
    CorruptTree { offset: usize, fault: TreeFault },

    #[error("truncated payload: needed {needed} bytes, found {available}")]
    TruncatedPayload { needed: usize, available: usize },

    #[error("invalid padding count {0} (must be 0-7)")]
    InvalidPadding(u8),

    #[error("payload has packed bits but no tree")]
    EmptyTreeForNonEmptyPayload,

    #[error("{size} bytes exceeds the limit of {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("{extra} unexpected bytes after the payload")]
    TrailingData { extra: usize },

    #[error("output file {0:?} already exists (use --force to overwrite)")]
    OutputExists(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HuffError {
    pub(crate) fn tree(offset: usize, fault: TreeFault) -> Self {
        HuffError::CorruptTree { offset, fault }
    }
}
