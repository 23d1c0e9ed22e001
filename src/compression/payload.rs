use log::trace;

use crate::error::HuffError;
use crate::huffman_coding::huffman::TreeNode;
use crate::huffman_coding::tree_codec::deserialize_tree_prefix;

/// Bytes used on the wire for a repeat count or original length.
const LEN_BYTES: usize = 4;

/// The result of compressing one buffer.
///
/// On the wire (see `to_bytes`):
/// - Empty: nothing at all.
/// - Degenerate: the serialized single leaf `[1, symbol]`, then the count as u32 LE.
/// - General: the serialized tree, the original length as u32 LE, the packed bits, and
///   one final byte holding the padding count.
///
/// The root marker of the tree tells a reader which of the last two it is looking at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressedPayload {
    Empty,
    /// One distinct symbol repeated `count` times
    Degenerate { symbol: u8, count: usize },
    General {
        tree: Vec<u8>,
        packed: Vec<u8>,
        padding: u8,
        original_length: usize,
    },
}

impl CompressedPayload {
    /// Length of the data this payload decodes to.
    pub fn original_len(&self) -> usize {
        match self {
            CompressedPayload::Empty => 0,
            CompressedPayload::Degenerate { count, .. } => *count,
            CompressedPayload::General {
                original_length, ..
            } => *original_length,
        }
    }

    /// Size in bytes of `to_bytes()`.
    pub fn wire_len(&self) -> usize {
        match self {
            CompressedPayload::Empty => 0,
            CompressedPayload::Degenerate { .. } => 2 + LEN_BYTES,
            CompressedPayload::General { tree, packed, .. } => {
                tree.len() + LEN_BYTES + packed.len() + 1
            }
        }
    }

    /// Lay the payload out as one contiguous buffer. Fails only when a length does not
    /// fit the four byte field.
    pub fn to_bytes(&self) -> Result<Vec<u8>, HuffError> {
        let mut out = Vec::with_capacity(self.wire_len());
        match self {
            CompressedPayload::Empty => {}
            CompressedPayload::Degenerate { symbol, count } => {
                out.push(1);
                out.push(*symbol);
                out.extend_from_slice(&len_field(*count)?);
            }
            CompressedPayload::General {
                tree,
                packed,
                padding,
                original_length,
            } => {
                out.extend_from_slice(tree);
                out.extend_from_slice(&len_field(*original_length)?);
                out.extend_from_slice(packed);
                out.push(*padding);
            }
        }
        Ok(out)
    }

    /// Parse a buffer produced by `to_bytes`. The tree is checked for structure here; the
    /// bitstream is only checked when it is decoded.
    pub fn from_bytes(data: &[u8]) -> Result<Self, HuffError> {
        if data.is_empty() {
            return Ok(CompressedPayload::Empty);
        }

        let (root, used) = deserialize_tree_prefix(data)?;
        let len_end = used + LEN_BYTES;
        let length = read_len(data, used)?;

        match root {
            TreeNode::Leaf(symbol) => {
                if data.len() > len_end {
                    return Err(HuffError::TrailingData {
                        extra: data.len() - len_end,
                    });
                }
                trace!("Found degenerate payload: {} x {}", symbol, length);
                Ok(CompressedPayload::Degenerate {
                    symbol,
                    count: length,
                })
            }
            TreeNode::Kids(..) => {
                // The padding byte must follow the length even when no bits were packed.
                if data.len() < len_end + 1 {
                    return Err(HuffError::TruncatedPayload {
                        needed: len_end + 1,
                        available: data.len(),
                    });
                }
                let padding = data[data.len() - 1];
                if padding > 7 {
                    return Err(HuffError::InvalidPadding(padding));
                }
                trace!(
                    "Found payload: {} tree bytes, {} packed bytes, padding {}",
                    used,
                    data.len() - len_end - 1,
                    padding
                );
                Ok(CompressedPayload::General {
                    tree: data[..used].to_vec(),
                    packed: data[len_end..data.len() - 1].to_vec(),
                    padding,
                    original_length: length,
                })
            }
        }
    }
}

fn len_field(len: usize) -> Result<[u8; LEN_BYTES], HuffError> {
    let len = u32::try_from(len).map_err(|_| HuffError::TooLarge {
        size: len,
        max: u32::MAX as usize,
    })?;
    Ok(len.to_le_bytes())
}

fn read_len(data: &[u8], at: usize) -> Result<usize, HuffError> {
    let bytes: [u8; LEN_BYTES] = data
        .get(at..at + LEN_BYTES)
        .and_then(|s| s.try_into().ok())
        .ok_or(HuffError::TruncatedPayload {
            needed: at + LEN_BYTES,
            available: data.len(),
        })?;
    Ok(u32::from_le_bytes(bytes) as usize)
}
