//! Pre-order byte serialization of a Huffman tree.
//!
//! A leaf is written as the marker `1` followed by its symbol. An internal node is written
//! as the marker `0` followed by its left subtree and then its right subtree. There is no
//! length field; the reader consumes exactly as many bytes as the structure calls for.

use log::trace;

use super::huffman::TreeNode;
use crate::error::{HuffError, TreeFault};

const INTERNAL: u8 = 0;
const LEAF: u8 = 1;

/// Deepest nesting a strict binary tree over 256 distinct leaves can reach.
pub const MAX_DEPTH: usize = 255;

/// Number of bytes `serialize_tree` will produce for this tree.
pub fn serialized_len(root: &TreeNode) -> usize {
    // Every leaf takes two bytes and every internal node one. A strict binary tree has one
    // fewer internal node than leaves.
    let leaves = root.leaf_count();
    2 * leaves + (leaves - 1)
}

/// Append the serialized tree to `out`.
pub fn serialize_tree(root: &TreeNode, out: &mut Vec<u8>) {
    match root {
        TreeNode::Leaf(sym) => {
            out.push(LEAF);
            out.push(*sym);
        }
        TreeNode::Kids(left, right) => {
            out.push(INTERNAL);
            serialize_tree(left, out);
            serialize_tree(right, out);
        }
    }
}

/// Shared read position for the whole recursive descent.
struct TreeReader<'a> {
    data: &'a [u8],
    cursor: usize,
}

impl<'a> TreeReader<'a> {
    fn byte(&mut self) -> Result<u8, HuffError> {
        let byte = *self
            .data
            .get(self.cursor)
            .ok_or_else(|| HuffError::tree(self.cursor, TreeFault::Overrun))?;
        self.cursor += 1;
        Ok(byte)
    }

    fn node(&mut self, depth: usize) -> Result<TreeNode, HuffError> {
        if depth > MAX_DEPTH {
            return Err(HuffError::tree(self.cursor, TreeFault::TooDeep));
        }
        let at = self.cursor;
        match self.byte()? {
            LEAF => Ok(TreeNode::Leaf(self.byte()?)),
            INTERNAL => {
                let left = self.node(depth + 1)?;
                let right = self.node(depth + 1)?;
                Ok(TreeNode::join(left, right))
            }
            other => Err(HuffError::tree(at, TreeFault::BadMarker(other))),
        }
    }
}

/// Read one tree from the front of `data`. Returns the tree and the number of bytes it
/// occupied, so the caller can carry on reading whatever follows.
pub fn deserialize_tree_prefix(data: &[u8]) -> Result<(TreeNode, usize), HuffError> {
    let mut reader = TreeReader { data, cursor: 0 };
    let root = reader.node(0)?;
    trace!("Read tree of {} leaves from {} bytes", root.leaf_count(), reader.cursor);
    Ok((root, reader.cursor))
}

/// Read a tree that must occupy all of `data`.
pub fn deserialize_tree(data: &[u8]) -> Result<TreeNode, HuffError> {
    let (root, used) = deserialize_tree_prefix(data)?;
    if used != data.len() {
        return Err(HuffError::tree(used, TreeFault::TrailingBytes));
    }
    Ok(root)
}
