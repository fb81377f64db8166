//! huffpack command-line shell.
//!
//! ```bash
//! # writes data/testcase1Compressed.bin
//! huffpack compress data/testcase1.bin
//!
//! # writes data/testcase1CompressedDecompressed.bin
//! huffpack decompress data/testcase1Compressed.bin
//!
//! # compare all three
//! huffpack check data/testcase1.bin data/testcase1Compressed.bin \
//!     data/testcase1CompressedDecompressed.bin
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

use huffpack::code_table::bit_string;
use huffpack::files::{self, FileError, COMPRESSED_SUFFIX, DECOMPRESSED_SUFFIX};
use huffpack::report::CompressionReport;
use huffpack::{CodeTable, FrequencyTable, HuffmanTree};

#[derive(Parser, Debug)]
#[command(name = "huffpack")]
#[command(version)]
#[command(about = "Byte-oriented Huffman compressor", long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "HUFFPACK_LOG", default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress a file
    Compress {
        input: PathBuf,

        /// Output path, defaults to the input name with its extension
        /// replaced by `Compressed.bin`
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decompress a file produced by `compress`
    Decompress {
        input: PathBuf,

        /// Output path, defaults to the input name with its extension
        /// replaced by `Decompressed.bin`
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compare an original file with its compressed and decompressed forms
    Check {
        original: PathBuf,
        compressed: PathBuf,
        decompressed: PathBuf,
    },

    /// Print the code assigned to every byte of a file
    Codes { input: PathBuf },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("huffpack: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), FileError> {
    match command {
        Command::Compress { input, output } => {
            let output =
                output.unwrap_or_else(|| files::derive_output_path(&input, COMPRESSED_SUFFIX));
            let transfer = files::compress_file(&input, &output)?;
            println!(
                "{} -> {} ({} -> {} bytes)",
                input.display(),
                output.display(),
                transfer.bytes_in,
                transfer.bytes_out
            );
        }
        Command::Decompress { input, output } => {
            let output =
                output.unwrap_or_else(|| files::derive_output_path(&input, DECOMPRESSED_SUFFIX));
            let transfer = files::decompress_file(&input, &output)?;
            println!(
                "{} -> {} ({} -> {} bytes)",
                input.display(),
                output.display(),
                transfer.bytes_in,
                transfer.bytes_out
            );
        }
        Command::Check {
            original,
            compressed,
            decompressed,
        } => {
            let report = CompressionReport::new(
                &files::read_file(&original)?,
                &files::read_file(&compressed)?,
                &files::read_file(&decompressed)?,
            );
            println!();
            println!("{report}");
        }
        Command::Codes { input } => {
            let data = files::read_file(&input)?;
            let frequencies = FrequencyTable::from_bytes(&data);
            let Some(tree) = HuffmanTree::from_frequencies(&frequencies) else {
                println!("{} is empty, no codes", input.display());
                return Ok(());
            };
            let table = CodeTable::from_tree(&tree);

            println!("{:>4}  {:>10}  code", "byte", "count");
            for (byte, code) in table.iter() {
                let count = frequencies.get(byte).unwrap_or(0);
                println!("0x{byte:02x}  {count:>10}  {}", bit_string(code));
            }
            println!(
                "trie: {} bits, payload: {} bits",
                tree.serialized_bits(),
                table.payload_bits(&frequencies)
            );
        }
    }
    Ok(())
}
