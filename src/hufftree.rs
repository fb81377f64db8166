use std::cmp::Ordering;
use std::io::{Read, Write};

use tracing::trace;

use crate::bit_io::{BitReader, BitWriter};
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::min_heap::MinHeap;

/// Deepest node level a trie built from 256 symbols can reach.
pub const MAX_DEPTH: usize = 255;

/// Most leaves a serialized trie may carry.
pub const MAX_LEAVES: usize = 256;

/// A node of the code trie: a leaf holding one byte, or an internal node with
/// exactly two children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        byte: u8,
    },
    Internal {
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn leaf(byte: u8) -> Self {
        HuffNode::Leaf { byte }
    }

    pub fn merge(left: Self, right: Self) -> Self {
        HuffNode::Internal {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    // Preorder: marker bit, then the byte for a leaf or both subtrees.
    fn write_to<W: Write>(&self, writer: &mut BitWriter<W>) -> Result<()> {
        match self {
            HuffNode::Leaf { byte } => {
                writer.write_bit(true)?;
                writer.write_byte(*byte)
            }
            HuffNode::Internal { left, right } => {
                writer.write_bit(false)?;
                left.write_to(writer)?;
                right.write_to(writer)
            }
        }
    }

    fn read_from<R: Read>(
        reader: &mut BitReader<R>,
        depth: usize,
        leaves: &mut usize,
    ) -> Result<Self> {
        if depth > MAX_DEPTH {
            return Err(HuffmanError::corrupt(format!(
                "trie deeper than {MAX_DEPTH} levels"
            )));
        }

        if reader.read_bit()? {
            *leaves += 1;
            if *leaves > MAX_LEAVES {
                return Err(HuffmanError::corrupt(format!(
                    "trie has more than {MAX_LEAVES} leaves"
                )));
            }
            let byte = reader.read_byte()?;
            return Ok(HuffNode::leaf(byte));
        }

        let left = Self::read_from(reader, depth + 1, leaves)?;
        let right = Self::read_from(reader, depth + 1, leaves)?;
        Ok(HuffNode::merge(left, right))
    }

    fn count(&self, leaves: &mut u64, internals: &mut u64) {
        match self {
            HuffNode::Leaf { .. } => *leaves += 1,
            HuffNode::Internal { left, right } => {
                *internals += 1;
                left.count(leaves, internals);
                right.count(leaves, internals);
            }
        }
    }
}

/// Heap entry used while building: a subtree with its total weight.
///
/// Ordered by weight, then by sequence number. Leaves are numbered in
/// ascending byte order and every merged node takes the next number, so equal
/// weights always resolve the same way.
#[derive(Debug)]
struct Weighted {
    weight: u64,
    seq: usize,
    node: HuffNode,
}

impl PartialEq for Weighted {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Weighted {}

impl PartialOrd for Weighted {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Weighted {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .cmp(&other.weight)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Prefix-free code trie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    pub root: HuffNode,
}

impl HuffmanTree {
    /// Builds the trie for `bytes`, or `None` when `bytes` is empty.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        Self::from_frequencies(&FrequencyTable::from_bytes(bytes))
    }

    /// Greedy two-smallest merge over the table. The first node extracted
    /// becomes the left child.
    ///
    /// A table with a single byte yields an internal root whose children are
    /// both that byte's leaf, so every occurrence costs one bit.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Option<Self> {
        let nodes: Vec<Weighted> = frequencies
            .iter()
            .enumerate()
            .map(|(seq, (byte, weight))| Weighted {
                weight,
                seq,
                node: HuffNode::leaf(byte),
            })
            .collect();

        if nodes.len() == 1 {
            let only = nodes.into_iter().next()?.node;
            return Some(HuffmanTree {
                root: HuffNode::merge(only.clone(), only),
            });
        }

        let mut next_seq = nodes.len();
        let mut heap = MinHeap::build(nodes);
        while heap.heap_size() > 1 {
            let x = heap.extract_min()?;
            let y = heap.extract_min()?;
            trace!(left = x.weight, right = y.weight, seq = next_seq, "merging subtrees");

            heap.insert(Weighted {
                weight: x.weight + y.weight,
                seq: next_seq,
                node: HuffNode::merge(x.node, y.node),
            });
            next_seq += 1;
        }

        heap.extract_min().map(|entry| HuffmanTree { root: entry.node })
    }

    /// Writes the trie in preorder: `1` plus eight value bits per leaf, `0`
    /// then left and right subtrees per internal node.
    pub fn serialize<W: Write>(&self, writer: &mut BitWriter<W>) -> Result<()> {
        self.root.write_to(writer)
    }

    /// Reads a trie written by [`HuffmanTree::serialize`].
    pub fn deserialize<R: Read>(reader: &mut BitReader<R>) -> Result<Self> {
        let mut leaves = 0;
        let root = HuffNode::read_from(reader, 0, &mut leaves)?;
        Ok(HuffmanTree { root })
    }

    /// Number of bits [`HuffmanTree::serialize`] emits.
    pub fn serialized_bits(&self) -> u64 {
        let (mut leaves, mut internals) = (0, 0);
        self.root.count(&mut leaves, &mut internals);
        leaves * 9 + internals
    }
}
