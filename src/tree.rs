use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::code::CodeTable;
use crate::frequency::FrequencyTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode {
    Leaf {
        symbol: u8,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<HuffmanNode>,
        right: Box<HuffmanNode>,
    },
}

impl HuffmanNode {
    pub fn weight(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { weight, .. } | HuffmanNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf { .. })
    }

    fn merge(left: HuffmanNode, right: HuffmanNode) -> HuffmanNode {
        HuffmanNode::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// Heap entry: a subtree plus the order it was created in.
struct Pending {
    weight: u64,
    seq: usize,
    node: HuffmanNode,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.seq == other.seq
    }
}

impl Eq for Pending {}

// Reversed so BinaryHeap pops the lightest, then the oldest, entry first.
impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A Huffman prefix tree built from a [`FrequencyTable`].
///
/// Ties between equal weights go to the node created first. Leaves are
/// created in ascending symbol order and every merged node gets the next
/// sequence number, so one table always yields the same tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: HuffmanNode,
}

impl HuffmanTree {
    /// Build the tree, or `None` for an empty table.
    pub fn build(table: &FrequencyTable) -> Option<Self> {
        let mut heap: BinaryHeap<Pending> = table
            .iter()
            .enumerate()
            .map(|(seq, (symbol, weight))| Pending {
                weight,
                seq,
                node: HuffmanNode::Leaf { symbol, weight },
            })
            .collect();

        let mut next_seq = heap.len();
        while heap.len() > 1 {
            let (Some(left), Some(right)) = (heap.pop(), heap.pop()) else {
                break;
            };
            let node = HuffmanNode::merge(left.node, right.node);
            heap.push(Pending {
                weight: node.weight(),
                seq: next_seq,
                node,
            });
            next_seq += 1;
        }

        let tree = HuffmanTree {
            root: heap.pop()?.node,
        };
        debug!(
            alphabet = table.len(),
            depth = tree.depth(),
            "built huffman tree"
        );
        Some(tree)
    }

    pub fn root(&self) -> &HuffmanNode {
        &self.root
    }

    /// Derive the symbol -> code mapping for this tree.
    pub fn codes(&self) -> CodeTable {
        CodeTable::from_tree(self)
    }

    pub fn leaf_count(&self) -> usize {
        self.count(|node| node.is_leaf())
    }

    pub fn internal_count(&self) -> usize {
        self.count(|node| !node.is_leaf())
    }

    /// Sum of leaf weights. Equals the input length the table came from.
    pub fn total_weight(&self) -> u64 {
        let mut total = 0;
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            match node {
                HuffmanNode::Leaf { weight, .. } => total += weight,
                HuffmanNode::Internal { left, right, .. } => {
                    stack.push(left.as_ref());
                    stack.push(right.as_ref());
                }
            }
        }
        total
    }

    /// Length of the longest root-to-leaf path. A lone leaf has depth 0.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(&self.root, 0)];
        while let Some((node, depth)) = stack.pop() {
            match node {
                HuffmanNode::Leaf { .. } => deepest = deepest.max(depth),
                HuffmanNode::Internal { left, right, .. } => {
                    stack.push((left.as_ref(), depth + 1));
                    stack.push((right.as_ref(), depth + 1));
                }
            }
        }
        deepest
    }

    fn count(&self, pred: impl Fn(&HuffmanNode) -> bool) -> usize {
        let mut n = 0;
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            if pred(node) {
                n += 1;
            }
            if let HuffmanNode::Internal { left, right, .. } = node {
                stack.push(left.as_ref());
                stack.push(right.as_ref());
            }
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_for(data: &[u8]) -> HuffmanTree {
        HuffmanTree::build(&FrequencyTable::from_bytes(data)).unwrap()
    }

    #[test]
    fn empty_table_has_no_tree() {
        assert!(HuffmanTree::build(&FrequencyTable::new()).is_none());
    }

    #[test]
    fn single_symbol_is_a_lone_leaf() {
        let tree = tree_for(b"aaaa");
        assert_eq!(
            tree.root(),
            &HuffmanNode::Leaf {
                symbol: b'a',
                weight: 4
            }
        );
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.internal_count(), 0);
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn abracadabra_shape() {
        let tree = tree_for(b"abracadabra");
        assert_eq!(tree.leaf_count(), 5);
        assert_eq!(tree.internal_count(), 4);
        assert_eq!(tree.total_weight(), 11);
        assert_eq!(tree.root().weight(), 11);
    }

    #[test]
    fn internal_weights_sum_children() {
        let tree = tree_for(b"the quick brown fox jumps over the lazy dog");
        let mut stack = vec![tree.root()];
        while let Some(node) = stack.pop() {
            if let HuffmanNode::Internal {
                weight,
                left,
                right,
            } = node
            {
                assert_eq!(*weight, left.weight() + right.weight());
                stack.push(left.as_ref());
                stack.push(right.as_ref());
            }
        }
    }

    #[test]
    fn ties_go_to_the_older_node() {
        // a:1 b:1 c:1 d:1 -> (a,b) then (c,d), then the two pairs.
        let tree = tree_for(b"abcd");
        let HuffmanNode::Internal { left, right, .. } = tree.root() else {
            panic!("expected internal root");
        };
        let HuffmanNode::Internal { left: ll, right: lr, .. } = left.as_ref() else {
            panic!("expected internal left child");
        };
        let HuffmanNode::Internal { left: rl, right: rr, .. } = right.as_ref() else {
            panic!("expected internal right child");
        };
        fn symbol(node: &HuffmanNode) -> u8 {
            match node {
                HuffmanNode::Leaf { symbol, .. } => *symbol,
                HuffmanNode::Internal { .. } => panic!("expected leaf"),
            }
        }
        assert_eq!(
            [symbol(ll), symbol(lr), symbol(rl), symbol(rr)],
            [b'a', b'b', b'c', b'd']
        );
    }

    #[test]
    fn same_table_same_tree() {
        let table = FrequencyTable::from_bytes(b"mississippi river banks");
        assert_eq!(HuffmanTree::build(&table), HuffmanTree::build(&table));
    }

    #[test]
    fn full_byte_alphabet() {
        let data: Vec<u8> = (0..=255).collect();
        let tree = tree_for(&data);
        assert_eq!(tree.leaf_count(), 256);
        assert_eq!(tree.internal_count(), 255);
        // Uniform weights over 256 symbols form a perfect tree.
        assert_eq!(tree.depth(), 8);
    }
}
