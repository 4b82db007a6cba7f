//! Incremental content hashing with checkpoint emission.
//!
//! # Overview
//!
//! A [`CheckpointStream`] reads a file in fixed 4 KiB blocks and yields a
//! [`Checkpoint`] (the running XxHash64 digest so far) whenever the active
//! [`Schedule`] fires. The final checkpoint is always emitted, even when it
//! falls between scheduled boundaries, and carries the whole-stream digest.
//!
//! The stream is single-pass: consuming it advances the file cursor, and a
//! fresh stream must be opened to re-derive the sequence. Callers that need
//! the sequence more than once memoize it (see
//! [`FileCandidate`](crate::matcher::FileCandidate)).

use std::fs::File;
use std::hash::Hasher as _;
use std::io::{self, Read};
use std::path::Path;

use twox_hash::XxHash64;

/// Size of one read block in bytes.
pub const BLOCK_SIZE: usize = 4096;

/// Seed for all XxHash64 digests produced by this crate.
const HASH_SEED: u64 = 0;

/// Identifies the cadence at which checkpoints fire.
///
/// Two checkpoints are only comparable when produced by the same schedule.
/// `EveryBlock` fires after every block consumed, which gives the
/// finest-grained early exit when two files diverge early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Schedule {
    /// One checkpoint per block read.
    #[default]
    EveryBlock,
}

impl Schedule {
    /// Whether a checkpoint fires after consuming block number `iteration`.
    fn fires_at(self, iteration: u64) -> bool {
        match self {
            Schedule::EveryBlock => iteration > 0,
        }
    }
}

/// A hash progress record: the running digest after `iteration` blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    /// Number of blocks consumed when this checkpoint was taken.
    pub iteration: u64,
    /// Running XxHash64 digest over all bytes consumed so far.
    pub digest: u64,
    /// Schedule that produced this record.
    pub schedule: Schedule,
    /// Whether this checkpoint represents end-of-stream. The final
    /// checkpoint's digest covers the complete file content.
    pub is_final: bool,
}

/// Lazy, single-pass checkpoint sequence over a reader.
///
/// One block of lookahead is kept so the stream knows, when yielding a
/// checkpoint, whether it is the last one. Pulling K checkpoints therefore
/// reads at most K + 1 blocks from the underlying reader.
pub struct CheckpointStream<R = File> {
    reader: R,
    schedule: Schedule,
    hasher: XxHash64,
    buf: Box<[u8; BLOCK_SIZE]>,
    lookahead: usize,
    iteration: u64,
    done: bool,
}

impl CheckpointStream<File> {
    /// Open a checkpoint stream over the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or the first block
    /// cannot be read. Not retried; a vanished file surfaces as
    /// `ErrorKind::NotFound`.
    pub fn open(path: &Path, schedule: Schedule) -> io::Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file, schedule)
    }
}

impl<R: Read> CheckpointStream<R> {
    /// Build a checkpoint stream over an arbitrary reader.
    ///
    /// Reads the first block eagerly so construction surfaces I/O errors.
    pub fn from_reader(mut reader: R, schedule: Schedule) -> io::Result<Self> {
        let mut buf = Box::new([0u8; BLOCK_SIZE]);
        let lookahead = read_block(&mut reader, &mut buf[..])?;
        Ok(Self {
            reader,
            schedule,
            hasher: XxHash64::with_seed(HASH_SEED),
            buf,
            lookahead,
            iteration: 0,
            done: false,
        })
    }

    fn checkpoint(&self, is_final: bool) -> Checkpoint {
        Checkpoint {
            iteration: self.iteration,
            digest: self.hasher.finish(),
            schedule: self.schedule,
            is_final,
        }
    }
}

impl<R: Read> Iterator for CheckpointStream<R> {
    type Item = io::Result<Checkpoint>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            // No buffered data left: everything has been hashed, so the
            // running digest is the whole-stream digest. Covers the empty
            // file, which yields a single final checkpoint at iteration 0.
            if self.lookahead == 0 {
                self.done = true;
                return Some(Ok(self.checkpoint(true)));
            }

            self.hasher.write(&self.buf[..self.lookahead]);
            self.iteration += 1;

            // A short block can only happen at end-of-stream.
            let at_eof = self.lookahead < BLOCK_SIZE;
            self.lookahead = if at_eof {
                0
            } else {
                match read_block(&mut self.reader, &mut self.buf[..]) {
                    Ok(n) => n,
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                }
            };

            if self.lookahead == 0 {
                self.done = true;
                return Some(Ok(self.checkpoint(true)));
            }
            if self.schedule.fires_at(self.iteration) {
                return Some(Ok(self.checkpoint(false)));
            }
        }
    }
}

/// Read until `buf` is full or the reader hits end-of-stream.
///
/// Block boundaries must be deterministic for a given content length, so a
/// short `read` mid-file is not allowed to end a block early.
pub(crate) fn read_block<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
