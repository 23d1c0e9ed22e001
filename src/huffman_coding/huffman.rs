use log::trace;

use crate::tools::freq_count::FrequencyTable;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A node of a Huffman tree. Internal nodes always own exactly two children.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TreeNode {
    Leaf(u8),
    Kids(Box<TreeNode>, Box<TreeNode>),
}

impl TreeNode {
    /// Join two subtrees under a new internal node
    pub fn join(left: TreeNode, right: TreeNode) -> TreeNode {
        TreeNode::Kids(Box::new(left), Box::new(right))
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf(_))
    }

    /// Number of leaves below (and including) this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            TreeNode::Leaf(_) => 1,
            TreeNode::Kids(left, right) => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Longest path from this node to a leaf. A lone leaf has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf(_) => 0,
            TreeNode::Kids(left, right) => 1 + left.depth().max(right.depth()),
        }
    }
}

/// Heap entry used while building the tree. `seq` records insertion order so that
/// equal weights always come out first-in-first-out.
#[derive(Eq, PartialEq, Debug)]
struct Node {
    weight: usize,
    seq: usize,
    node_data: TreeNode,
}

impl Ord for Node {
    /// BinaryHeap is a max-heap, so sort Nodes by decreasing weight and decreasing sequence
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Build a Huffman tree from a frequency table holding at least one symbol. Returns None
/// for an empty table; callers handle empty input before getting here.
///
/// With a single symbol no merge happens and the root is that symbol's leaf.
pub fn build_tree(freqs: &FrequencyTable) -> Option<TreeNode> {
    // Leaves go in by ascending symbol so the tie-break is reproducible.
    let mut heap: BinaryHeap<Node> = freqs
        .sorted()
        .into_iter()
        .enumerate()
        .map(|(seq, (sym, weight))| Node {
            weight,
            seq,
            node_data: TreeNode::Leaf(sym),
        })
        .collect();
    let mut seq = heap.len();

    // Pare it down to one single node, always merging the two lightest.
    while heap.len() > 1 {
        let left = heap.pop()?;
        let right = heap.pop()?;
        trace!(
            "Merging weights {} and {} (seq {}, {})",
            left.weight,
            right.weight,
            left.seq,
            right.seq
        );
        heap.push(Node {
            weight: left.weight + right.weight,
            seq,
            node_data: TreeNode::join(left.node_data, right.node_data),
        });
        seq += 1;
    }
    heap.pop().map(|node| node.node_data)
}

#[cfg(test)]
mod test {
    use super::{build_tree, TreeNode};
    use crate::tools::freq_count::freqs;

    #[test]
    fn empty_test() {
        assert_eq!(build_tree(&freqs(&[])), None);
    }

    #[test]
    fn single_symbol_test() {
        let tree = build_tree(&freqs(&[65, 65, 65])).unwrap();
        assert_eq!(tree, TreeNode::Leaf(65));
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn aaabbc_test() {
        // c(1) and b(2) merge first; a(3) then ties with that subtree and wins by age.
        let tree = build_tree(&freqs("aaabbc".as_bytes())).unwrap();
        let expected = TreeNode::join(
            TreeNode::Leaf(b'a'),
            TreeNode::join(TreeNode::Leaf(b'c'), TreeNode::Leaf(b'b')),
        );
        assert_eq!(tree, expected);
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn deterministic_test() {
        let data = "the quick brown fox jumps over the lazy dog".as_bytes();
        let first = build_tree(&freqs(data));
        let second = build_tree(&freqs(data));
        assert_eq!(first, second);
    }

    #[test]
    fn all_symbols_test() {
        let data: Vec<u8> = (0..=255).collect();
        let tree = build_tree(&freqs(&data)).unwrap();
        assert_eq!(tree.leaf_count(), 256);
        // 256 equal weights make a perfectly balanced tree.
        assert_eq!(tree.depth(), 8);
    }
}
