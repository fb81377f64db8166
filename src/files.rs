//! File-level helpers for the command-line shell: output naming and whole-file
//! compress/decompress.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::error::HuffmanError;
use crate::huffman_codec::HuffmanCodec;

pub const COMPRESSED_SUFFIX: &str = "Compressed.bin";
pub const DECOMPRESSED_SUFFIX: &str = "Decompressed.bin";

/// Length of the extension stripped before appending a suffix, e.g. `.bin`.
const EXTENSION_LEN: usize = 4;

/// Failures of the file shell, kept apart from codec failures.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Codec(#[from] HuffmanError),
}

/// Sizes seen by a whole-file operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub bytes_in: usize,
    pub bytes_out: usize,
}

/// Drops the last four characters of the file name and appends `suffix`.
/// Names of four characters or fewer keep their full name.
pub fn derive_output_path(input: &Path, suffix: &str) -> PathBuf {
    let name = input.file_name().unwrap_or_default();
    let stem: OsString = match name.to_str() {
        Some(name) if name.chars().count() > EXTENSION_LEN => {
            let keep = name.chars().count() - EXTENSION_LEN;
            name.chars().take(keep).collect::<String>().into()
        }
        _ => name.to_os_string(),
    };

    let mut file_name = stem;
    file_name.push(suffix);
    input.with_file_name(file_name)
}

pub fn read_file(path: &Path) -> Result<Vec<u8>, FileError> {
    fs::read(path).map_err(|source| FileError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_file(path: &Path, bytes: &[u8]) -> Result<(), FileError> {
    fs::write(path, bytes).map_err(|source| FileError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub fn compress_file(input: &Path, output: &Path) -> Result<Transfer, FileError> {
    let data = read_file(input)?;
    let compressed = HuffmanCodec::encode(&data)?;
    write_file(output, &compressed)?;

    info!(
        input = %input.display(),
        output = %output.display(),
        bytes_in = data.len(),
        bytes_out = compressed.len(),
        "compressed"
    );
    Ok(Transfer {
        bytes_in: data.len(),
        bytes_out: compressed.len(),
    })
}

pub fn decompress_file(input: &Path, output: &Path) -> Result<Transfer, FileError> {
    let compressed = read_file(input)?;
    let data = HuffmanCodec::decode(&compressed)?;
    write_file(output, &data)?;

    info!(
        input = %input.display(),
        output = %output.display(),
        bytes_in = compressed.len(),
        bytes_out = data.len(),
        "decompressed"
    );
    Ok(Transfer {
        bytes_in: compressed.len(),
        bytes_out: data.len(),
    })
}
