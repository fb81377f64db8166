//! Error types for the codec.

use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T> = core::result::Result<T, HuffmanError>;

/// Failures raised while compressing or decompressing.
#[derive(Debug, Error)]
pub enum HuffmanError {
    /// A bit or byte was requested past the end of the source.
    #[error("unexpected end of stream after {bits_read} bits")]
    EndOfStream { bits_read: u64 },

    /// The input does not fit the 32-bit original-length field.
    #[error("input of {len} bytes exceeds the 32-bit length field")]
    InputTooLarge { len: usize },

    /// The compressed stream is structurally inconsistent or truncated.
    #[error("corrupt stream: {0}")]
    CorruptStream(String),

    /// I/O error from the underlying sink or source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HuffmanError {
    /// Create a corrupt stream error.
    pub fn corrupt(message: impl Into<String>) -> Self {
        HuffmanError::CorruptStream(message.into())
    }

    /// Turn an end-of-stream into a corrupt stream error naming the
    /// truncated section. Other errors pass through.
    pub fn truncated(self, section: &str) -> Self {
        match self {
            HuffmanError::EndOfStream { bits_read } => HuffmanError::CorruptStream(format!(
                "{section} truncated after {bits_read} bits"
            )),
            other => other,
        }
    }

    /// Short label for the error kind, for logs.
    pub fn category(&self) -> &'static str {
        match self {
            HuffmanError::EndOfStream { .. } => "end_of_stream",
            HuffmanError::InputTooLarge { .. } => "input_too_large",
            HuffmanError::CorruptStream(_) => "corrupt_stream",
            HuffmanError::Io(_) => "io_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_rewrites_end_of_stream() {
        let err = HuffmanError::EndOfStream { bits_read: 12 }.truncated("trie");
        assert_eq!(err.category(), "corrupt_stream");
        assert_eq!(err.to_string(), "corrupt stream: trie truncated after 12 bits");
    }

    #[test]
    fn truncated_keeps_other_errors() {
        let err = HuffmanError::InputTooLarge { len: 7 }.truncated("payload");
        assert!(matches!(err, HuffmanError::InputTooLarge { len: 7 }));
    }
}
