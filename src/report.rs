//! Comparison of an original file with its compressed and decompressed forms.

use std::fmt;

/// Outcome of comparing the original with the decompressed bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Lossless,
    DataLost,
    DataAdded,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Lossless => f.write_str("lossless"),
            Verdict::DataLost => f.write_str("some data is lost"),
            Verdict::DataAdded => f.write_str("some unnecessary data is added"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompressionReport {
    pub original_len: usize,
    pub compressed_len: usize,
    pub decompressed_len: usize,
    pub verdict: Verdict,
}

impl CompressionReport {
    pub fn new(original: &[u8], compressed: &[u8], decompressed: &[u8]) -> Self {
        let verdict = if original == decompressed {
            Verdict::Lossless
        } else if original.len() > decompressed.len() {
            Verdict::DataLost
        } else {
            Verdict::DataAdded
        };

        CompressionReport {
            original_len: original.len(),
            compressed_len: compressed.len(),
            decompressed_len: decompressed.len(),
            verdict,
        }
    }

    /// Compressed size over original size; `None` for an empty original.
    pub fn ratio(&self) -> Option<f64> {
        (self.original_len > 0).then(|| self.compressed_len as f64 / self.original_len as f64)
    }
}

impl fmt::Display for CompressionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Input binary file size: {} bytes", self.original_len)?;
        writeln!(f, "Compressed binary file size: {} bytes", self.compressed_len)?;
        writeln!(f, "Decompressed binary file size: {} bytes", self.decompressed_len)?;
        writeln!(f)?;
        match self.ratio() {
            Some(ratio) => writeln!(f, "==> Compression Ratio: {ratio:.4}")?,
            None => writeln!(f, "==> Compression Ratio: n/a")?,
        }
        write!(f, "==> Compression result: {}", self.verdict)
    }
}
