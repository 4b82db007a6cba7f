//! Comparison dispatch over the filtered pair stream.
//!
//! Sequential mode folds over the pairs in input order. Parallel mode runs
//! the comparator on a fixed-size rayon pool and emits confirmed pairs in
//! completion order; callers must not assume output ordering there. Both
//! modes confirm the identical set of pairs for the same input.
//!
//! Workers never react to cancellation themselves: the coordinating signal
//! handler sets a shared flag (see [`crate::signal`]) and workers merely
//! observe it, skipping remaining work so the pool drains cleanly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

use thiserror::Error;

use super::candidate::FileCandidate;
use super::compare::{compare, CompareError, Outcome};
use super::pairs::CandidatePair;

/// A pair of distinct candidates verified content-equal. Immutable once
/// emitted; produced only by the comparator.
#[derive(Debug, Clone)]
pub struct DuplicatePair {
    /// First side, in input order.
    pub a: Arc<FileCandidate>,
    /// Second side, in input order.
    pub b: Arc<FileCandidate>,
}

/// Counters and non-fatal errors accumulated over one dispatch run.
#[derive(Debug, Clone, Default)]
pub struct MatchStats {
    /// Pairs handed to the comparator.
    pub pairs_examined: usize,
    /// Pairs confirmed byte-identical.
    pub confirmed: usize,
    /// Pairs that could not be decided because a file vanished mid-run.
    pub undetermined: usize,
    /// Comparison failures (unexpected I/O, internal-consistency defects).
    pub errors: Vec<CompareError>,
}

impl MatchStats {
    /// Whether any non-fatal problem occurred during the run.
    #[must_use]
    pub fn had_problems(&self) -> bool {
        self.undetermined > 0 || !self.errors.is_empty()
    }
}

/// Errors that abort a dispatch run.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The run was interrupted by the user (Ctrl+C or shutdown flag).
    #[error("comparison run interrupted by user")]
    Interrupted,

    /// The worker pool could not be constructed.
    #[error("failed to build worker pool: {0}")]
    PoolBuild(#[from] rayon::ThreadPoolBuildError),
}

/// Configuration for a dispatch run.
#[derive(Debug, Clone, Default)]
pub struct DispatchConfig {
    /// Worker count for parallel mode; `None` runs on the calling thread.
    pub workers: Option<usize>,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
}

impl DispatchConfig {
    /// Set the worker count. `Some(n)` enables the fixed-size pool.
    #[must_use]
    pub fn with_workers(mut self, workers: Option<usize>) -> Self {
        self.workers = workers.map(|n| n.max(1));
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Per-pair verdict flowing from workers back to the coordinator.
enum Verdict {
    Confirmed(DuplicatePair),
    NotEqual,
    Undetermined,
    Failed(CompareError),
    Skipped,
}

fn evaluate(pair: &CandidatePair) -> Verdict {
    match compare(&pair.0, &pair.1) {
        Ok(Outcome::Equal) => {
            log::debug!(
                "duplicate pair: {} and {}",
                pair.0.path().display(),
                pair.1.path().display()
            );
            Verdict::Confirmed(DuplicatePair {
                a: Arc::clone(&pair.0),
                b: Arc::clone(&pair.1),
            })
        }
        Ok(Outcome::NotEqual) => Verdict::NotEqual,
        Ok(Outcome::Undetermined) => Verdict::Undetermined,
        Err(e) => {
            log::error!(
                "comparison failed for {} vs {}: {}",
                pair.0.path().display(),
                pair.1.path().display(),
                e
            );
            Verdict::Failed(e)
        }
    }
}

/// Run the comparator over the filtered pair stream.
///
/// Returns confirmed duplicate pairs together with run statistics. Output
/// order is input pair order in sequential mode and completion order in
/// parallel mode.
///
/// # Errors
///
/// Returns [`MatchError::Interrupted`] when the shutdown flag is raised
/// before the stream is exhausted, and [`MatchError::PoolBuild`] when the
/// worker pool cannot be created.
pub fn run(
    pairs: Vec<CandidatePair>,
    config: &DispatchConfig,
) -> Result<(Vec<DuplicatePair>, MatchStats), MatchError> {
    match config.workers {
        None => run_sequential(pairs, config),
        Some(workers) => run_parallel(pairs, workers, config),
    }
}

fn run_sequential(
    pairs: Vec<CandidatePair>,
    config: &DispatchConfig,
) -> Result<(Vec<DuplicatePair>, MatchStats), MatchError> {
    let mut confirmed = Vec::new();
    let mut stats = MatchStats::default();

    for pair in &pairs {
        if config.is_shutdown_requested() {
            return Err(MatchError::Interrupted);
        }
        stats.pairs_examined += 1;
        match evaluate(pair) {
            Verdict::Confirmed(dup) => {
                stats.confirmed += 1;
                confirmed.push(dup);
            }
            Verdict::NotEqual => {}
            Verdict::Undetermined => stats.undetermined += 1,
            Verdict::Failed(e) => stats.errors.push(e),
            Verdict::Skipped => {}
        }
    }

    Ok((confirmed, stats))
}

fn run_parallel(
    pairs: Vec<CandidatePair>,
    workers: usize,
    config: &DispatchConfig,
) -> Result<(Vec<DuplicatePair>, MatchStats), MatchError> {
    use rayon::prelude::*;

    log::info!(
        "dispatching {} pairs across {} workers",
        pairs.len(),
        workers
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()?;

    let (sender, receiver) = mpsc::channel::<Verdict>();

    pool.install(|| {
        pairs.into_par_iter().for_each_with(sender, |sender, pair| {
            // Workers only observe the flag; the coordinator decides how to
            // act on the interrupt once the pool has drained.
            let verdict = if config.is_shutdown_requested() {
                Verdict::Skipped
            } else {
                evaluate(&pair)
            };
            // Receiver outlives the pool; a send failure means the
            // coordinator is gone and there is nothing left to report to.
            let _ = sender.send(verdict);
        });
    });

    let mut confirmed = Vec::new();
    let mut stats = MatchStats::default();
    for verdict in receiver {
        match verdict {
            Verdict::Confirmed(dup) => {
                stats.pairs_examined += 1;
                stats.confirmed += 1;
                confirmed.push(dup);
            }
            Verdict::NotEqual => stats.pairs_examined += 1,
            Verdict::Undetermined => {
                stats.pairs_examined += 1;
                stats.undetermined += 1;
            }
            Verdict::Failed(e) => {
                stats.pairs_examined += 1;
                stats.errors.push(e);
            }
            Verdict::Skipped => {}
        }
    }

    if config.is_shutdown_requested() {
        return Err(MatchError::Interrupted);
    }

    Ok((confirmed, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::pairs::all_pairs;
    use std::collections::BTreeSet;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    fn candidate(dir: &TempDir, name: &str, content: &[u8]) -> Arc<FileCandidate> {
        let path = dir.path().join(name);
        std::fs::File::create(&path)
            .unwrap()
            .write_all(content)
            .unwrap();
        Arc::new(FileCandidate::resolve(path).unwrap())
    }

    fn pair_set(pairs: &[DuplicatePair]) -> BTreeSet<(PathBuf, PathBuf)> {
        pairs
            .iter()
            .map(|p| {
                let (mut a, mut b) = (p.a.path().to_path_buf(), p.b.path().to_path_buf());
                if b < a {
                    std::mem::swap(&mut a, &mut b);
                }
                (a, b)
            })
            .collect()
    }

    fn fixture(dir: &TempDir) -> Vec<Arc<FileCandidate>> {
        vec![
            candidate(dir, "a.bin", &vec![1u8; 9000]),
            candidate(dir, "b.bin", &vec![1u8; 9000]),
            candidate(dir, "c.bin", &vec![2u8; 9000]), // same size, different bytes
            candidate(dir, "d.bin", &vec![1u8; 9000]),
            candidate(dir, "e.bin", b"unique"),
        ]
    }

    #[test]
    fn test_sequential_confirms_expected_pairs() {
        let dir = tempdir().unwrap();
        let pairs = all_pairs(&fixture(&dir));
        let (dupes, stats) = run(pairs, &DispatchConfig::default()).unwrap();

        // a, b, d are mutually identical: three pairs.
        assert_eq!(dupes.len(), 3);
        assert_eq!(stats.confirmed, 3);
        assert_eq!(stats.pairs_examined, 10);
        assert!(!stats.had_problems());
    }

    #[test]
    fn test_parallel_matches_sequential_set() {
        let dir = tempdir().unwrap();
        let candidates = fixture(&dir);

        let (seq, _) = run(all_pairs(&candidates), &DispatchConfig::default()).unwrap();
        for workers in [1, 2, 4] {
            let config = DispatchConfig::default().with_workers(Some(workers));
            let (par, stats) = run(all_pairs(&candidates), &config).unwrap();
            assert_eq!(pair_set(&par), pair_set(&seq), "workers = {workers}");
            assert_eq!(stats.pairs_examined, 10);
        }
    }

    #[test]
    fn test_sequential_interrupts_between_pairs() {
        let dir = tempdir().unwrap();
        let pairs = all_pairs(&fixture(&dir));

        let flag = Arc::new(AtomicBool::new(true));
        let config = DispatchConfig::default().with_shutdown_flag(flag);
        assert!(matches!(
            run(pairs, &config),
            Err(MatchError::Interrupted)
        ));
    }

    #[test]
    fn test_parallel_interrupt_is_a_controlled_abort() {
        let dir = tempdir().unwrap();
        let pairs = all_pairs(&fixture(&dir));

        let flag = Arc::new(AtomicBool::new(true));
        let config = DispatchConfig::default()
            .with_workers(Some(2))
            .with_shutdown_flag(flag);
        assert!(matches!(
            run(pairs, &config),
            Err(MatchError::Interrupted)
        ));
    }

    #[test]
    fn test_vanished_candidate_is_counted_not_fatal() {
        let dir = tempdir().unwrap();
        let a = candidate(&dir, "a.bin", &vec![1u8; 5000]);
        let b = candidate(&dir, "b.bin", &vec![1u8; 5000]);
        std::fs::remove_file(b.path()).unwrap();

        let (dupes, stats) = run(all_pairs(&[a, b]), &DispatchConfig::default()).unwrap();
        assert!(dupes.is_empty());
        assert_eq!(stats.undetermined, 1);
        assert!(stats.had_problems());
    }

    #[test]
    fn test_zero_worker_request_is_clamped() {
        let config = DispatchConfig::default().with_workers(Some(0));
        assert_eq!(config.workers, Some(1));
    }
}
