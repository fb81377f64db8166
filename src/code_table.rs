use std::collections::BTreeMap;

use bitvec::prelude::*;

use crate::frequency::FrequencyTable;
use crate::hufftree::{HuffNode, HuffmanTree};

/// A code: the root-to-leaf path, `0` for left and `1` for right.
pub type Code = BitVec<u8, Msb0>;

/// Mapping from byte value to its code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<u8, Code>,
}

impl CodeTable {
    /// Walks the trie and records the path to every leaf.
    ///
    /// When a byte appears at several leaves (the single-symbol trie) the
    /// leftmost path is kept.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = BTreeMap::new();
        let mut path = Code::new();
        walk(&tree.root, &mut path, &mut codes);
        CodeTable { codes }
    }

    pub fn get(&self, byte: u8) -> Option<&BitSlice<u8, Msb0>> {
        self.codes.get(&byte).map(|code| code.as_bitslice())
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &BitSlice<u8, Msb0>)> + '_ {
        self.codes.iter().map(|(&byte, code)| (byte, code.as_bitslice()))
    }

    /// Total payload bits needed to encode input with these frequencies.
    /// Bytes without a code contribute nothing.
    pub fn payload_bits(&self, frequencies: &FrequencyTable) -> u64 {
        frequencies
            .iter()
            .filter_map(|(byte, count)| self.codes.get(&byte).map(|code| code.len() as u64 * count))
            .sum()
    }

    /// True when no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let mut sorted: Vec<&Code> = self.codes.values().collect();
        sorted.sort();
        // a prefix sorts directly before some code that extends it
        sorted.windows(2).all(|pair| !pair[1].starts_with(pair[0].as_bitslice()))
    }
}

fn walk(node: &HuffNode, path: &mut Code, codes: &mut BTreeMap<u8, Code>) {
    match node {
        HuffNode::Leaf { byte } => {
            codes.entry(*byte).or_insert_with(|| path.clone());
        }
        HuffNode::Internal { left, right } => {
            path.push(false);
            walk(left, path, codes);
            path.pop();

            path.push(true);
            walk(right, path, codes);
            path.pop();
        }
    }
}

/// Renders a code as a string of `0` and `1`.
pub fn bit_string(code: &BitSlice<u8, Msb0>) -> String {
    code.iter().by_vals().map(|bit| if bit { '1' } else { '0' }).collect()
}
