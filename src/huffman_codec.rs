use std::io::{Read, Write};

use tracing::debug;

use crate::bit_io::{BitReader, BitWriter};
use crate::code_table::CodeTable;
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::hufftree::{HuffNode, HuffmanTree};

/// One-shot compressor and decompressor.
///
/// Every call builds its own frequency table, trie and code table, so the
/// codec holds no state between calls.
///
/// Stream layout, MSB-first: the preorder trie, the original length as a
/// big-endian `u32`, one code per input byte, then zero padding to the next
/// byte boundary. Empty input compresses to an empty stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct HuffmanCodec;

impl HuffmanCodec {
    pub fn encode(data: &[u8]) -> Result<Vec<u8>> {
        Self::encode_to(data, Vec::new())
    }

    /// Compresses `data` into `sink` and returns the flushed sink.
    pub fn encode_to<W: Write>(data: &[u8], sink: W) -> Result<W> {
        let length = checked_length(data.len())?;
        let frequencies = FrequencyTable::from_bytes(data);
        let Some(tree) = HuffmanTree::from_frequencies(&frequencies) else {
            debug!("empty input, writing empty stream");
            return Ok(sink);
        };
        let table = CodeTable::from_tree(&tree);

        let mut writer = BitWriter::new(sink);
        tree.serialize(&mut writer)?;
        writer.write_u32(length)?;
        for &byte in data {
            let code = table.get(byte).ok_or_else(|| {
                HuffmanError::corrupt(format!("byte {byte:#04x} missing from code table"))
            })?;
            writer.write_code(code)?;
        }

        debug!(
            input_len = data.len(),
            symbols = frequencies.len(),
            trie_bits = tree.serialized_bits(),
            payload_bits = table.payload_bits(&frequencies),
            "encoded"
        );
        writer.finish()
    }

    pub fn decode(compressed: &[u8]) -> Result<Vec<u8>> {
        if compressed.is_empty() {
            debug!("empty stream, nothing to decode");
            return Ok(Vec::new());
        }

        let mut reader = BitReader::new(compressed);
        let tree = HuffmanTree::deserialize(&mut reader).map_err(|e| e.truncated("trie"))?;
        if tree.root.is_leaf() {
            return Err(HuffmanError::corrupt("trie root is a leaf"));
        }
        let length = reader.read_u32().map_err(|e| e.truncated("length field"))?;

        // every byte costs at least one bit
        let available = (compressed.len() as u64 * 8).saturating_sub(reader.bits_read());
        if u64::from(length) > available {
            return Err(HuffmanError::corrupt(format!(
                "length {length} exceeds the {available} payload bits present"
            )));
        }

        let mut output = Vec::with_capacity(length as usize);
        for _ in 0..length {
            let byte = decode_symbol(&tree.root, &mut reader).map_err(|e| match e {
                HuffmanError::EndOfStream { bits_read } => HuffmanError::corrupt(format!(
                    "payload truncated after {bits_read} bits, decoded {} of {length} bytes",
                    output.len()
                )),
                other => other,
            })?;
            output.push(byte);
        }
        reader.expect_end()?;

        debug!(
            compressed_len = compressed.len(),
            output_len = output.len(),
            "decoded"
        );
        Ok(output)
    }

    /// Reads `source` to the end and decompresses it.
    pub fn decode_from<R: Read>(mut source: R) -> Result<Vec<u8>> {
        let mut compressed = Vec::new();
        source.read_to_end(&mut compressed)?;
        Self::decode(&compressed)
    }
}

/// Converts an input length to the 32-bit length field.
pub fn checked_length(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| HuffmanError::InputTooLarge { len })
}

fn decode_symbol<R: Read>(root: &HuffNode, reader: &mut BitReader<R>) -> Result<u8> {
    let mut node = root;
    loop {
        match node {
            HuffNode::Leaf { byte } => return Ok(*byte),
            HuffNode::Internal { left, right } => {
                node = if reader.read_bit()? { right } else { left };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_stream_bytes() {
        let compressed = HuffmanCodec::encode(b"AAABBC").unwrap();
        // trie 0 1'A' 0 1'C' 1'B', length 6, payload 000 11 11 10
        assert_eq!(
            compressed,
            vec![0x50, 0x54, 0x3A, 0x10, 0x00, 0x00, 0x00, 0x30, 0xF8]
        );
        assert_eq!(HuffmanCodec::decode(&compressed).unwrap(), b"AAABBC");
    }

    #[test]
    fn test_empty_roundtrip() {
        let compressed = HuffmanCodec::encode(&[]).unwrap();
        assert!(compressed.is_empty());
        assert!(HuffmanCodec::decode(&compressed).unwrap().is_empty());
    }

    #[test]
    fn test_single_symbol_costs_one_bit_each() {
        let data = vec![0x42u8; 1000];
        let compressed = HuffmanCodec::encode(&data).unwrap();
        // 19 trie bits + 32 length bits + 1000 payload bits, rounded up
        assert_eq!(compressed.len(), (19 + 32 + 1000 + 7) / 8);
        assert_eq!(HuffmanCodec::decode(&compressed).unwrap(), data);
    }

    #[test]
    fn test_single_byte_input() {
        let compressed = HuffmanCodec::encode(&[0x00]).unwrap();
        assert_eq!(HuffmanCodec::decode(&compressed).unwrap(), vec![0x00]);
    }

    #[test]
    fn test_binary_roundtrip() {
        let data: Vec<u8> = (0..20_000u32)
            .map(|i| (i * 31 % 251) as u8 ^ (i >> 7) as u8)
            .collect();
        let compressed = HuffmanCodec::encode(&data).unwrap();
        assert_eq!(HuffmanCodec::decode(&compressed).unwrap(), data);
    }

    #[test]
    fn test_stream_helpers() {
        let data = b"streams in, streams out".to_vec();
        let sink = HuffmanCodec::encode_to(&data, Vec::new()).unwrap();
        let decoded = HuffmanCodec::decode_from(sink.as_slice()).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_truncated_payload_is_corrupt() {
        let compressed = HuffmanCodec::encode(b"hello, hello, hello world").unwrap();
        for cut in 1..compressed.len() {
            let err = HuffmanCodec::decode(&compressed[..cut]).unwrap_err();
            assert!(
                matches!(err, HuffmanError::CorruptStream(_)),
                "cut at {cut}: {err}"
            );
        }
    }

    #[test]
    fn test_trailing_bytes_are_corrupt() {
        let mut compressed = HuffmanCodec::encode(b"abcabc").unwrap();
        compressed.push(0);
        assert!(matches!(
            HuffmanCodec::decode(&compressed),
            Err(HuffmanError::CorruptStream(_))
        ));
    }

    #[test]
    fn test_inflated_length_is_corrupt() {
        let mut compressed = HuffmanCodec::encode(b"AAABBC").unwrap();
        // byte 4 lies inside the length field, which starts at bit 29
        compressed[4] |= 0x40;
        assert!(matches!(
            HuffmanCodec::decode(&compressed),
            Err(HuffmanError::CorruptStream(_))
        ));
    }

    #[test]
    fn test_leaf_root_is_corrupt() {
        // 1 + 'A', then a zero length
        let compressed = [0b1010_0000, 0b1000_0000, 0, 0, 0];
        assert!(matches!(
            HuffmanCodec::decode(&compressed),
            Err(HuffmanError::CorruptStream(_))
        ));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_length_field_limit() {
        assert_eq!(checked_length(u32::MAX as usize).unwrap(), u32::MAX);
        let err = checked_length(u32::MAX as usize + 1).unwrap_err();
        assert!(matches!(err, HuffmanError::InputTooLarge { .. }));
    }
}
