//! Path list acquisition and candidate resolution.
//!
//! Paths come from positional CLI arguments or, when none are given, from
//! standard input: newline-delimited trimmed lines by default, or split on a
//! caller-supplied single-byte delimiter (tab by default, NUL for
//! `xargs -0`-style pipelines).
//!
//! The working set is de-duplicated by exact path string before pairing:
//! the same path supplied twice collapses into one candidate with a warning.
//! Content-identical files at distinct paths remain distinct candidates.

use std::collections::HashSet;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use crate::matcher::FileCandidate;

/// How the stdin byte stream is split into paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// One path per line, surrounding whitespace trimmed.
    #[default]
    Lines,
    /// Split on a single delimiter byte, empty tokens dropped.
    Split(u8),
}

/// Collect the candidate path list.
///
/// Positional `files` win; stdin is only consulted when the list is empty.
///
/// # Errors
///
/// Returns an error when stdin cannot be read.
pub fn gather_paths(files: Vec<PathBuf>, mode: InputMode) -> io::Result<Vec<PathBuf>> {
    if !files.is_empty() {
        return Ok(files);
    }

    log::debug!("no positional paths, reading candidate list from stdin");
    let mut raw = Vec::new();
    io::stdin().lock().read_to_end(&mut raw)?;
    Ok(split_paths(&raw, mode))
}

/// Split a raw byte stream into path strings according to `mode`.
#[must_use]
pub fn split_paths(raw: &[u8], mode: InputMode) -> Vec<PathBuf> {
    let tokens: Vec<&[u8]> = match mode {
        InputMode::Lines => raw
            .split(|&b| b == b'\n')
            .map(trim_ascii_whitespace)
            .collect(),
        InputMode::Split(delimiter) => raw.split(|&b| b == delimiter).collect(),
    };

    tokens
        .into_iter()
        .filter(|t| !t.is_empty())
        .map(|t| PathBuf::from(String::from_utf8_lossy(t).into_owned()))
        .collect()
}

fn trim_ascii_whitespace(mut bytes: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = bytes {
        if first.is_ascii_whitespace() {
            bytes = rest;
        } else {
            break;
        }
    }
    while let [rest @ .., last] = bytes {
        if last.is_ascii_whitespace() {
            bytes = rest;
        } else {
            break;
        }
    }
    bytes
}

/// Outcome of resolving the path list into the working candidate set.
#[derive(Debug, Default)]
pub struct ResolvedSet {
    /// Unique, metadata-resolved candidates, in first-seen input order.
    pub candidates: Vec<Arc<FileCandidate>>,
    /// Paths supplied more than once (collapsed, warned about).
    pub duplicates_collapsed: usize,
    /// Paths excluded because metadata resolution failed.
    pub skipped: usize,
}

/// De-duplicate by path string and resolve metadata for each unique path.
///
/// A failed metadata query excludes that candidate from the working set and
/// is logged; it never aborts the run.
#[must_use]
pub fn resolve_candidates(paths: Vec<PathBuf>) -> ResolvedSet {
    let mut set = ResolvedSet::default();
    let mut seen: HashSet<PathBuf> = HashSet::with_capacity(paths.len());

    for path in paths {
        if !seen.insert(path.clone()) {
            log::warn!("path supplied more than once, ignoring repeat: {}", path.display());
            set.duplicates_collapsed += 1;
            continue;
        }
        match FileCandidate::resolve(path) {
            Ok(candidate) => set.candidates.push(Arc::new(candidate)),
            Err(e) => {
                log::warn!("skipping candidate: {}", e);
                set.skipped += 1;
            }
        }
    }

    log::debug!(
        "resolved {} candidates ({} repeats collapsed, {} skipped)",
        set.candidates.len(),
        set.duplicates_collapsed,
        set.skipped
    );
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_lines_mode_trims_and_drops_blanks() {
        let raw = b"  /a/one.txt \n/b/two.txt\n\n\t/c/three.txt\t\n";
        let paths = split_paths(raw, InputMode::Lines);
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/a/one.txt"),
                PathBuf::from("/b/two.txt"),
                PathBuf::from("/c/three.txt"),
            ]
        );
    }

    #[test]
    fn test_tab_split_preserves_spaces_inside_paths() {
        let raw = b"/a/with space.txt\t/b/two.txt\t";
        let paths = split_paths(raw, InputMode::Split(b'\t'));
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/a/with space.txt"),
                PathBuf::from("/b/two.txt"),
            ]
        );
    }

    #[test]
    fn test_nul_split_handles_embedded_newlines() {
        let raw = b"/a/one\n.txt\0/b/two.txt\0";
        let paths = split_paths(raw, InputMode::Split(0));
        assert_eq!(
            paths,
            vec![PathBuf::from("/a/one\n.txt"), PathBuf::from("/b/two.txt")]
        );
    }

    #[test]
    fn test_repeated_path_collapses_to_one_candidate() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.bin");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"x")
            .unwrap();

        let set = resolve_candidates(vec![path.clone(), path.clone(), path]);
        assert_eq!(set.candidates.len(), 1);
        assert_eq!(set.duplicates_collapsed, 2);
        assert_eq!(set.skipped, 0);
    }

    #[test]
    fn test_missing_path_is_skipped_not_fatal() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.bin");
        std::fs::File::create(&good)
            .unwrap()
            .write_all(b"x")
            .unwrap();

        let set = resolve_candidates(vec![dir.path().join("missing.bin"), good]);
        assert_eq!(set.candidates.len(), 1);
        assert_eq!(set.skipped, 1);
    }

    #[test]
    fn test_input_order_is_preserved() {
        let dir = tempdir().unwrap();
        let names = ["z.bin", "a.bin", "m.bin"];
        let mut paths = Vec::new();
        for name in names {
            let path = dir.path().join(name);
            std::fs::File::create(&path)
                .unwrap()
                .write_all(b"x")
                .unwrap();
            paths.push(path);
        }

        let set = resolve_candidates(paths.clone());
        let resolved: Vec<_> = set.candidates.iter().map(|c| c.path().to_path_buf()).collect();
        assert_eq!(resolved, paths);
    }
}
