//! # huffpack
//!
//! Byte-oriented Huffman compression with a self-describing stream: the code
//! trie is written in preorder ahead of the payload, so decompression needs
//! nothing but the compressed bytes.
//!
//! ## Quick Start
//!
//! ```rust
//! use huffpack::HuffmanCodec;
//!
//! let compressed = HuffmanCodec::encode(b"AAABBC")?;
//! let original = HuffmanCodec::decode(&compressed)?;
//! assert_eq!(original, b"AAABBC");
//! # Ok::<(), huffpack::HuffmanError>(())
//! ```
//!
//! ## Stream format
//!
//! All fields are MSB-first:
//!
//! 1. the trie in preorder: `1` and eight value bits for a leaf, `0` then the
//!    left and right subtrees for an internal node
//! 2. the original length as a big-endian `u32`
//! 3. the code of every input byte, in input order
//! 4. zero bits up to the next byte boundary
//!
//! Empty input is stored as an empty stream.

pub mod bit_io;
pub mod code_table;
pub mod error;
pub mod files;
pub mod frequency;
pub mod huffman_codec;
pub mod hufftree;
pub mod report;

// Internal modules - not part of public API
mod min_heap;

// Re-export main types for convenience
pub use code_table::CodeTable;
pub use error::{HuffmanError, Result};
pub use frequency::FrequencyTable;
pub use huffman_codec::HuffmanCodec;
pub use hufftree::HuffmanTree;
