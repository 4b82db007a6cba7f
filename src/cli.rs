//! Command-line interface definitions.
//!
//! # Example
//!
//! ```bash
//! # Report byte-identical pairs among the given files
//! filematch a.bin b.bin c.bin
//!
//! # Read the candidate list from a pipeline, four comparison workers
//! find /data -type f | filematch -j 4
//!
//! # Report (and remove) the disposable copy under a scratch prefix
//! filematch --delete-prefix /tmp/scratch/ --delete *.iso /tmp/scratch/*.iso
//!
//! # NUL-delimited in and out, for paths with unusual characters
//! find /data -type f -print0 | filematch -0
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Find byte-identical files among an explicit list of paths.
///
/// Candidates are compared pairwise with an incremental, early-exit content
/// comparison; confirmed pairs are always verified byte-for-byte. With
/// --delete-prefix, the member of each pair under the prefix is reported as
/// disposable, and --delete unlinks it.
#[derive(Debug, Parser)]
#[command(name = "filematch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Files to match; reads the list from stdin when empty
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors and results
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Only compare files whose base names are identical
    #[arg(long)]
    pub name_match: bool,

    /// Report the pair member under this path prefix as disposable
    #[arg(long, value_name = "PREFIX")]
    pub delete_prefix: Option<PathBuf>,

    /// Unlink the disposable member of each pair
    ///
    /// Only ever removes a file whose byte-identical twin lies outside the
    /// prefix, and at most one member per pair.
    #[arg(long, requires = "delete_prefix")]
    pub delete: bool,

    /// Compare pairs across N worker threads instead of sequentially
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Field delimiter for stdin splitting and plain output (default: tab
    /// for output, newline-delimited lines for stdin)
    ///
    /// Accepts a single character or one of the escapes \t, \n, \0.
    #[arg(short = 'd', long, value_name = "CHAR", value_parser = parse_delimiter, conflicts_with = "null")]
    pub delimiter: Option<char>,

    /// Use NUL as the delimiter for stdin splitting and output termination
    #[arg(short = '0', long = "null", conflicts_with = "output")]
    pub null: bool,

    /// Output rendering
    #[arg(short, long, value_enum, default_value = "plain")]
    pub output: OutputFormat,

    /// Emit fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}

/// Output rendering for confirmed pairs and deletion notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One delimiter-joined pair per line
    Plain,
    /// Human-structured multi-line rendering with sizes
    Pretty,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Plain => write!(f, "plain"),
            OutputFormat::Pretty => write!(f, "pretty"),
        }
    }
}

/// Parse a delimiter argument: a single character or a `\t`/`\n`/`\0` escape.
///
/// # Errors
///
/// Returns a message suitable for clap when the value is not exactly one
/// character or a recognized escape.
pub fn parse_delimiter(value: &str) -> Result<char, String> {
    match value {
        "\\t" => return Ok('\t'),
        "\\n" => return Ok('\n'),
        "\\0" => return Ok('\0'),
        _ => {}
    }
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c),
        _ => Err(format!(
            "delimiter must be a single ASCII character or \\t, \\n, \\0 (got {value:?})"
        )),
    }
}
