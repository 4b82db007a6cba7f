//! Byte-exact equality decision for a pair of candidates.
//!
//! # Overview
//!
//! [`compare`] decides whether two candidates have identical content, short
//! circuiting at the cheapest stage that can prove inequality:
//!
//! 1. **Size compare** - no content I/O at all.
//! 2. **Lock-step checkpoint compare** - one checkpoint from each side per
//!    round; a digest mismatch ends the comparison without reading the rest
//!    of either file. This is the principal early exit for large files that
//!    diverge early.
//! 3. **Whole-file digest compare** - defense in depth against a bug in the
//!    incremental path, using the terminal checkpoints.
//! 4. **Byte-exact compare** - the authoritative decision. A 64-bit hash
//!    match alone is never reported as a duplicate.
//!
//! A completed traversal memoizes the candidate's checkpoint sequence, so a
//! candidate compared against many others is hashed at most once. A file
//! vanishing mid-comparison yields [`Outcome::Undetermined`]; the engine
//! tolerates concurrent external mutation of the input set.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use super::candidate::FileCandidate;
use super::checkpoint::{read_block, Checkpoint, CheckpointStream, Schedule, BLOCK_SIZE};

/// Result of comparing one pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Contents are byte-identical.
    Equal,
    /// Contents differ.
    NotEqual,
    /// A file vanished between metadata resolution and a read; treated as
    /// not-equal, never fatal.
    Undetermined,
}

/// Errors a comparison can surface. Content mismatches are not errors.
///
/// Sources are wrapped in `Arc` so errors stay clonable for aggregation
/// into run statistics.
#[derive(Debug, Clone, Error)]
pub enum CompareError {
    /// Checkpoint streams went final on different rounds even though sizes
    /// matched. This is an internal-consistency defect, not a normal
    /// not-equal outcome, and is surfaced loudly.
    #[error("checkpoint streams desynchronized for {a} and {b}: sizes matched but block counts differ")]
    CheckpointDesync {
        /// First side of the pair.
        a: PathBuf,
        /// Second side of the pair.
        b: PathBuf,
    },

    /// Checkpoints produced by different schedules were compared.
    #[error("checkpoint schedule mismatch for {a} and {b}")]
    ScheduleMismatch {
        /// First side of the pair.
        a: PathBuf,
        /// Second side of the pair.
        b: PathBuf,
    },

    /// An unexpected I/O error (anything other than a vanished file).
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// Path where the error occurred.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },
}

/// Internal control flow: a stage either aborts the pair as undetermined or
/// fails the comparison outright.
enum Abort {
    Undetermined,
    Failed(CompareError),
}

fn io_abort(err: io::Error, path: &Path) -> Abort {
    if err.kind() == io::ErrorKind::NotFound {
        log::warn!("file vanished mid-comparison: {}", path.display());
        Abort::Undetermined
    } else {
        Abort::Failed(CompareError::Io {
            path: path.to_path_buf(),
            source: Arc::new(err),
        })
    }
}

/// Decide byte-exact equality of two candidates.
///
/// Total for ordinary content mismatches; only unexpected I/O errors and
/// internal-consistency violations surface as `Err`.
///
/// # Errors
///
/// Returns [`CompareError::CheckpointDesync`] or
/// [`CompareError::ScheduleMismatch`] when the lock-step invariants are
/// violated after sizes were confirmed equal, and [`CompareError::Io`] for
/// unexpected read failures.
pub fn compare(a: &FileCandidate, b: &FileCandidate) -> Result<Outcome, CompareError> {
    // Stage 1: size. The cheapest possible discriminator; no content I/O.
    if a.size() != b.size() {
        return Ok(Outcome::NotEqual);
    }

    match compare_content(a, b) {
        Ok(outcome) => Ok(outcome),
        Err(Abort::Undetermined) => Ok(Outcome::Undetermined),
        Err(Abort::Failed(e)) => Err(e),
    }
}

fn compare_content(a: &FileCandidate, b: &FileCandidate) -> Result<Outcome, Abort> {
    // Stage 2: lock-step checkpoint compare.
    let mut source_a = CheckpointSource::open(a)?;
    let mut source_b = CheckpointSource::open(b)?;

    loop {
        let ca = source_a.next_checkpoint(a.path())?;
        let cb = source_b.next_checkpoint(b.path())?;

        let (ca, cb) = match (ca, cb) {
            (Some(ca), Some(cb)) => (ca, cb),
            // Sizes matched, so both sequences must terminate on the same
            // round. Anything else is a defect signal.
            _ => {
                return Err(Abort::Failed(CompareError::CheckpointDesync {
                    a: a.path().to_path_buf(),
                    b: b.path().to_path_buf(),
                }))
            }
        };

        if ca.schedule != cb.schedule {
            return Err(Abort::Failed(CompareError::ScheduleMismatch {
                a: a.path().to_path_buf(),
                b: b.path().to_path_buf(),
            }));
        }
        if ca.is_final != cb.is_final || ca.iteration != cb.iteration {
            return Err(Abort::Failed(CompareError::CheckpointDesync {
                a: a.path().to_path_buf(),
                b: b.path().to_path_buf(),
            }));
        }
        if ca.digest != cb.digest {
            log::trace!(
                "checkpoint divergence at block {} for {} vs {}",
                ca.iteration,
                a.path().display(),
                b.path().display()
            );
            return Ok(Outcome::NotEqual);
        }
        if ca.is_final {
            break;
        }
    }

    // Both sides traversed fully: memoize so a candidate compared against
    // multiple others is hashed at most once.
    source_a.publish(a);
    source_b.publish(b);

    // Stage 3: whole-file digest, from the terminal checkpoints.
    match (a.full_digest(), b.full_digest()) {
        (Some(da), Some(db)) if da == db => {}
        _ => return Ok(Outcome::NotEqual),
    }

    // Stage 4: byte-exact compare. Authoritative; never trust the hash.
    bytes_equal(a.path(), b.path())
}

/// Checkpoint supply for one side of a comparison: either a replay of the
/// memoized sequence or a live single-pass stream over the file.
enum CheckpointSource {
    Cached {
        sequence: Arc<Vec<Checkpoint>>,
        next: usize,
    },
    Live {
        stream: CheckpointStream,
        seen: Vec<Checkpoint>,
    },
}

impl CheckpointSource {
    fn open(candidate: &FileCandidate) -> Result<Self, Abort> {
        if let Some(sequence) = candidate.cached_checkpoints() {
            return Ok(Self::Cached { sequence, next: 0 });
        }
        match CheckpointStream::open(candidate.path(), Schedule::default()) {
            Ok(stream) => Ok(Self::Live {
                stream,
                seen: Vec::new(),
            }),
            Err(e) => Err(io_abort(e, candidate.path())),
        }
    }

    fn next_checkpoint(&mut self, path: &Path) -> Result<Option<Checkpoint>, Abort> {
        match self {
            Self::Cached { sequence, next } => {
                let checkpoint = sequence.get(*next).copied();
                *next += 1;
                Ok(checkpoint)
            }
            Self::Live { stream, seen } => match stream.next() {
                Some(Ok(checkpoint)) => {
                    seen.push(checkpoint);
                    Ok(Some(checkpoint))
                }
                Some(Err(e)) => Err(io_abort(e, path)),
                None => Ok(None),
            },
        }
    }

    /// Memoize a fully traversed live sequence on its candidate.
    fn publish(self, candidate: &FileCandidate) {
        if let Self::Live { seen, .. } = self {
            if seen.last().is_some_and(|c| c.is_final) {
                candidate.publish_checkpoints(seen);
            }
        }
    }
}

/// Full byte-for-byte comparison of two files.
fn bytes_equal(a: &Path, b: &Path) -> Result<Outcome, Abort> {
    let mut file_a = File::open(a).map_err(|e| io_abort(e, a))?;
    let mut file_b = File::open(b).map_err(|e| io_abort(e, b))?;

    let mut buf_a = vec![0u8; BLOCK_SIZE];
    let mut buf_b = vec![0u8; BLOCK_SIZE];

    loop {
        let na = read_block(&mut file_a, &mut buf_a).map_err(|e| io_abort(e, a))?;
        let nb = read_block(&mut file_b, &mut buf_b).map_err(|e| io_abort(e, b))?;
        // A length mismatch here means a file was truncated or grew since
        // resolution; the byte stage is authoritative, so report not-equal.
        if na != nb || buf_a[..na] != buf_b[..nb] {
            return Ok(Outcome::NotEqual);
        }
        if na == 0 {
            return Ok(Outcome::Equal);
        }
    }
}
