//! Turns a Huffman tree into the per-symbol bit codes used by the encoder.
//!
//! Left edges contribute a 0 bit and right edges a 1 bit. A tree that is a single leaf has
//! no edges at all; that symbol gets the one-bit code `0` so every symbol present has a code.
//! The decoder mirrors this: a lone-leaf root emits its symbol for every 0 bit it reads.

use rustc_hash::FxHashMap;
use std::fmt::{Display, Formatter};

use super::huffman::TreeNode;

/// A code of up to 128 bits, stored right aligned (the first bit sent is bit `len - 1`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Code {
    pub bits: u128,
    pub len: u8,
}

impl Code {
    /// Extend the code by one bit
    fn push(self, bit: bool) -> Code {
        debug_assert!(self.len < 128, "Huffman code longer than 128 bits");
        Code {
            bits: (self.bits << 1) | bit as u128,
            len: self.len + 1,
        }
    }

    /// True if self is a (not necessarily proper) prefix of other.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        if self.len == 0 {
            return true;
        }
        self.len <= other.len && (other.bits >> (other.len - self.len)) == self.bits
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for i in (0..self.len).rev() {
            write!(f, "{}", (self.bits >> i) & 1)?;
        }
        Ok(())
    }
}

/// Symbol to code mapping, one entry per symbol present in the tree.
#[derive(Clone, Debug)]
pub struct CodeTable {
    codes: [Option<Code>; 256],
}

impl CodeTable {
    /// Walk the tree depth first and record a code for every leaf.
    pub fn from_tree(root: &TreeNode) -> Self {
        let mut table = CodeTable { codes: [None; 256] };
        match root {
            TreeNode::Leaf(sym) => {
                table.codes[*sym as usize] = Some(Code { bits: 0, len: 1 });
            }
            TreeNode::Kids(..) => table.walk(root, Code { bits: 0, len: 0 }),
        }
        table
    }

    /// Recursively walk the tree. The path so far travels down by value, so sibling calls
    /// never see each other's bits.
    fn walk(&mut self, node: &TreeNode, path: Code) {
        match node {
            TreeNode::Kids(left, right) => {
                self.walk(left, path.push(false));
                self.walk(right, path.push(true));
            }
            TreeNode::Leaf(sym) => {
                self.codes[*sym as usize] = Some(path);
            }
        }
    }

    pub fn get(&self, symbol: u8) -> Option<Code> {
        self.codes[symbol as usize]
    }

    /// Number of symbols that have a code
    pub fn len(&self) -> usize {
        self.codes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// (symbol, code) pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(sym, code)| code.map(|c| (sym as u8, c)))
    }

    /// Code to symbol mapping for table-driven decoders.
    pub fn inverse(&self) -> FxHashMap<Code, u8> {
        self.iter().map(|(sym, code)| (code, sym)).collect()
    }

    /// Total number of bits needed to encode `data` with this table, or None if some
    /// byte of data has no code.
    pub fn encoded_bits(&self, data: &[u8]) -> Option<usize> {
        data.iter()
            .try_fold(0_usize, |acc, &b| self.get(b).map(|c| acc + c.len as usize))
    }
}
