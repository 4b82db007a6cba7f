//! Candidate files with resolved metadata and memoized hash state.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use super::checkpoint::Checkpoint;

/// One input path with its metadata resolved and hash state memoized.
///
/// Identity is the raw path string, never the content: two distinct paths
/// pointing at identical bytes are two distinct candidates and are
/// legitimately reported as a duplicate pair. Content equality is a separate
/// relation evaluated pairwise by [`compare`](crate::matcher::compare).
///
/// The checkpoint sequence is published at most once per instance, only
/// after a complete traversal of the file, via a one-time-write cell. This
/// makes it safe for parallel workers to compare the same candidate in two
/// different pairs concurrently: whichever traversal finishes first wins,
/// the other result is discarded.
#[derive(Debug)]
pub struct FileCandidate {
    path: PathBuf,
    size: u64,
    checkpoints: OnceLock<Arc<Vec<Checkpoint>>>,
}

impl FileCandidate {
    /// Resolve `path` into a candidate by querying its metadata once.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the path does not exist or its
    /// metadata cannot be read. Callers exclude such paths from the working
    /// set and log them; resolution failures are never fatal to the run.
    pub fn resolve(path: PathBuf) -> io::Result<Self> {
        let metadata = fs::metadata(&path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a regular file: {}", path.display()),
            ));
        }
        Ok(Self {
            path,
            size: metadata.len(),
            checkpoints: OnceLock::new(),
        })
    }

    /// The path this candidate was resolved from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File size in bytes, as resolved at construction.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Final path component, used by the name-match pair filter.
    #[must_use]
    pub fn file_name(&self) -> Option<&OsStr> {
        self.path.file_name()
    }

    /// The memoized checkpoint sequence, if a full traversal has completed.
    #[must_use]
    pub fn cached_checkpoints(&self) -> Option<Arc<Vec<Checkpoint>>> {
        self.checkpoints.get().cloned()
    }

    /// Publish a completed checkpoint sequence.
    ///
    /// Only a sequence ending in a final checkpoint may be published. If
    /// another traversal published first, that earlier sequence is kept and
    /// returned.
    pub fn publish_checkpoints(&self, sequence: Vec<Checkpoint>) -> Arc<Vec<Checkpoint>> {
        debug_assert!(sequence.last().is_some_and(|c| c.is_final));
        self.checkpoints
            .get_or_init(|| Arc::new(sequence))
            .clone()
    }

    /// Whole-file digest, available once the checkpoint sequence has been
    /// memoized. Taken from the terminal checkpoint.
    #[must_use]
    pub fn full_digest(&self) -> Option<u64> {
        self.checkpoints
            .get()
            .and_then(|seq| seq.last())
            .map(|c| c.digest)
    }
}
