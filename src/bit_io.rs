//! Bit-granular writer and reader over byte sinks and sources.
//!
//! Both sides use MSB-first order: the first bit written lands in the most
//! significant position of the first byte. Each side buffers at most one
//! partial byte.

use std::io::{self, Read, Write};

use bitvec::prelude::*;

use crate::error::{HuffmanError, Result};

/// Writes single bits and whole bytes to a byte sink.
///
/// The final partial byte is only emitted by [`BitWriter::finish`], which pads
/// it with zero bits. Dropping a writer without finishing loses those bits.
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    sink: W,
    buffer: u8,
    // bits held in `buffer`, always < 8
    pending: u8,
    bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(sink: W) -> Self {
        BitWriter {
            sink,
            buffer: 0,
            pending: 0,
            bits_written: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.buffer = (self.buffer << 1) | u8::from(bit);
        self.pending += 1;
        self.bits_written += 1;
        if self.pending == 8 {
            self.flush_buffer()?;
        }
        Ok(())
    }

    pub fn write_byte(&mut self, byte: u8) -> Result<()> {
        if self.pending == 0 {
            // aligned, skip the bit buffer
            self.sink.write_all(&[byte])?;
            self.bits_written += 8;
            return Ok(());
        }
        for shift in (0..8).rev() {
            self.write_bit((byte >> shift) & 1 == 1)?;
        }
        Ok(())
    }

    /// Writes `value` as four big-endian bytes.
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        for byte in value.to_be_bytes() {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    /// Writes every bit of `code` in order.
    pub fn write_code(&mut self, code: &BitSlice<u8, Msb0>) -> Result<()> {
        for bit in code.iter().by_vals() {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    /// Number of bits accepted so far, excluding padding.
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Pads the partial byte with zeros, flushes the sink and returns it.
    pub fn finish(mut self) -> Result<W> {
        if self.pending > 0 {
            self.buffer <<= 8 - self.pending;
            self.flush_buffer()?;
        }
        self.sink.flush()?;
        Ok(self.sink)
    }

    fn flush_buffer(&mut self) -> Result<()> {
        self.sink.write_all(&[self.buffer])?;
        self.buffer = 0;
        self.pending = 0;
        Ok(())
    }
}

/// Reads single bits and whole bytes from a byte source.
///
/// Holds one byte of lookahead. Running out of source bytes on a refill
/// yields [`HuffmanError::EndOfStream`].
#[derive(Debug)]
pub struct BitReader<R: Read> {
    source: R,
    buffer: u8,
    // unread bits of `buffer`, kept in its low positions
    remaining: u8,
    bits_read: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(source: R) -> Self {
        BitReader {
            source,
            buffer: 0,
            remaining: 0,
            bits_read: 0,
        }
    }

    pub fn read_bit(&mut self) -> Result<bool> {
        if self.remaining == 0 {
            self.buffer = self.next_byte()?;
            self.remaining = 8;
        }
        self.remaining -= 1;
        self.bits_read += 1;
        Ok((self.buffer >> self.remaining) & 1 == 1)
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        let held = self.remaining;
        if held == 0 {
            let byte = self.next_byte()?;
            self.bits_read += 8;
            return Ok(byte);
        }

        // straddles the buffered byte and the next one
        let high = self.buffer & low_mask(held);
        self.buffer = self.next_byte()?;
        let low = self.buffer >> held;
        self.bits_read += 8;
        Ok((high << (8 - held)) | low)
    }

    /// Reads four big-endian bytes.
    pub fn read_u32(&mut self) -> Result<u32> {
        let mut bytes = [0u8; 4];
        for byte in bytes.iter_mut() {
            *byte = self.read_byte()?;
        }
        Ok(u32::from_be_bytes(bytes))
    }

    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    /// Checks that only zero padding is left: the unread bits of the buffered
    /// byte must be zero and the source must be exhausted.
    pub fn expect_end(&mut self) -> Result<()> {
        if self.buffer & low_mask(self.remaining) != 0 {
            return Err(HuffmanError::corrupt("non-zero padding bits"));
        }
        match self.next_byte() {
            Ok(_) => Err(HuffmanError::corrupt(format!(
                "trailing data after {} bits",
                self.bits_read
            ))),
            Err(HuffmanError::EndOfStream { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn next_byte(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        match self.source.read_exact(&mut byte) {
            Ok(()) => Ok(byte[0]),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(HuffmanError::EndOfStream {
                bits_read: self.bits_read,
            }),
            Err(e) => Err(e.into()),
        }
    }
}

fn low_mask(bits: u8) -> u8 {
    ((1u16 << bits) - 1) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_byte_is_zero_padded() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bit(true).unwrap();
        writer.write_bit(false).unwrap();
        writer.write_bit(true).unwrap();
        assert_eq!(writer.bits_written(), 3);

        let bytes = writer.finish().unwrap();
        assert_eq!(bytes, vec![0b1010_0000]);
    }

    #[test]
    fn test_aligned_byte_and_u32() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_byte(0xAB).unwrap();
        writer.write_u32(0x0102_0304).unwrap();

        let bytes = writer.finish().unwrap();
        assert_eq!(bytes, vec![0xAB, 0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_unaligned_byte_spans_two_bytes() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bit(true).unwrap();
        writer.write_byte(0xFF).unwrap();

        let bytes = writer.finish().unwrap();
        assert_eq!(bytes, vec![0xFF, 0x80]);

        let mut reader = BitReader::new(bytes.as_slice());
        assert!(reader.read_bit().unwrap());
        assert_eq!(reader.read_byte().unwrap(), 0xFF);
        assert_eq!(reader.bits_read(), 9);
    }

    #[test]
    fn test_write_code() {
        let code = bitvec![u8, Msb0; 1, 1, 0];
        let mut writer = BitWriter::new(Vec::new());
        writer.write_code(&code).unwrap();
        writer.write_code(&code).unwrap();

        let bytes = writer.finish().unwrap();
        assert_eq!(bytes, vec![0b1101_1000]);
    }

    #[test]
    fn test_read_mixed_widths() {
        let mut writer = BitWriter::new(Vec::new());
        for bit in [false, true, true] {
            writer.write_bit(bit).unwrap();
        }
        writer.write_u32(0xDEAD_BEEF).unwrap();
        writer.write_byte(0x5A).unwrap();
        writer.write_bit(true).unwrap();
        let bytes = writer.finish().unwrap();

        let mut reader = BitReader::new(bytes.as_slice());
        assert!(!reader.read_bit().unwrap());
        assert!(reader.read_bit().unwrap());
        assert!(reader.read_bit().unwrap());
        assert_eq!(reader.read_u32().unwrap(), 0xDEAD_BEEF);
        assert_eq!(reader.read_byte().unwrap(), 0x5A);
        assert!(reader.read_bit().unwrap());
        reader.expect_end().unwrap();
    }

    #[test]
    fn test_read_past_end() {
        let data = [0b1010_1010u8];
        let mut reader = BitReader::new(&data[..]);
        assert_eq!(reader.read_byte().unwrap(), 0b1010_1010);

        let err = reader.read_bit().unwrap_err();
        assert!(matches!(err, HuffmanError::EndOfStream { bits_read: 8 }));
    }

    #[test]
    fn test_straddling_read_past_end() {
        let data = [0xFFu8];
        let mut reader = BitReader::new(&data[..]);
        reader.read_bit().unwrap();

        let err = reader.read_byte().unwrap_err();
        assert!(matches!(err, HuffmanError::EndOfStream { .. }));
    }

    #[test]
    fn test_expect_end_rejects_trailing_data() {
        let data = [0x80u8, 0x00];
        let mut reader = BitReader::new(&data[..]);
        reader.read_bit().unwrap();
        assert!(matches!(
            reader.expect_end(),
            Err(HuffmanError::CorruptStream(_))
        ));
    }

    #[test]
    fn test_expect_end_rejects_dirty_padding() {
        let data = [0b1100_0000u8];
        let mut reader = BitReader::new(&data[..]);
        reader.read_bit().unwrap();
        assert!(matches!(
            reader.expect_end(),
            Err(HuffmanError::CorruptStream(_))
        ));
    }
}
