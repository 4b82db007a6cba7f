//! Duplicate detection engine.
//!
//! The pipeline: a de-duplicated candidate set is expanded into all
//! unordered pairs, optionally pre-filtered by base name, and each surviving
//! pair is handed to the staged comparator, sequentially or across a
//! fixed-size worker pool. Only byte-verified pairs come out the other end.

pub mod candidate;
pub mod checkpoint;
pub mod compare;
pub mod dispatch;
pub mod pairs;

pub use candidate::FileCandidate;
pub use checkpoint::{Checkpoint, CheckpointStream, Schedule, BLOCK_SIZE};
pub use compare::{compare, CompareError, Outcome};
pub use dispatch::{run, DispatchConfig, DuplicatePair, MatchError, MatchStats};
pub use pairs::{all_pairs, filter_pairs, same_name, CandidatePair};
