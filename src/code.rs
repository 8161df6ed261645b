use std::collections::BTreeMap;
use std::fmt;

use crate::frequency::FrequencyTable;
use crate::tree::{HuffmanNode, HuffmanTree};

/// Root-to-leaf path of one symbol; `false` is left, `true` is right.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Code(Vec<bool>);

impl Code {
    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Mapping from symbol to its prefix-free code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<u8, Code>,
}

impl CodeTable {
    /// Walk `tree` depth-first and record every leaf's path.
    ///
    /// A tree that is a single leaf gets the one-bit code `0` so repeated
    /// occurrences stay countable in the bit stream.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = BTreeMap::new();
        match tree.root() {
            HuffmanNode::Leaf { symbol, .. } => {
                codes.insert(*symbol, Code(vec![false]));
            }
            root => {
                let mut path = Vec::new();
                collect(root, &mut path, &mut codes);
            }
        }
        CodeTable { codes }
    }

    /// Code table for an optional tree; no tree means no codes.
    pub fn from_optional(tree: Option<&HuffmanTree>) -> Self {
        tree.map(HuffmanTree::codes).unwrap_or_default()
    }

    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes.iter().map(|(&symbol, code)| (symbol, code))
    }

    /// Number of payload bits needed to encode an input with these counts.
    /// Symbols missing from the table contribute nothing.
    pub fn encoded_bits(&self, table: &FrequencyTable) -> u64 {
        table
            .iter()
            .filter_map(|(symbol, count)| self.get(symbol).map(|code| count * code.len() as u64))
            .sum()
    }
}

fn collect(node: &HuffmanNode, path: &mut Vec<bool>, codes: &mut BTreeMap<u8, Code>) {
    match node {
        HuffmanNode::Leaf { symbol, .. } => {
            codes.insert(*symbol, Code(path.clone()));
        }
        HuffmanNode::Internal { left, right, .. } => {
            path.push(false);
            collect(left, path, codes);
            path.pop();
            path.push(true);
            collect(right, path, codes);
            path.pop();
        }
    }
}
