//! Conservative deletion of one member of a confirmed duplicate pair.
//!
//! The safety invariant: a member is only ever disposable when it sits under
//! the configured prefix *and* its twin does not. Pairs with both or neither
//! member under the prefix are left alone, so the policy can never remove
//! the sole remaining copy of content, and at most one unlink happens per
//! pair.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::matcher::DuplicatePair;

/// Decides, per confirmed pair, whether one member is disposable.
#[derive(Debug, Clone)]
pub struct DeletionPolicy {
    prefix: PathBuf,
    delete: bool,
}

impl DeletionPolicy {
    /// Create a policy for the given path prefix.
    ///
    /// When `delete` is false the policy only reports disposable members;
    /// nothing is unlinked.
    #[must_use]
    pub fn new(prefix: PathBuf, delete: bool) -> Self {
        Self { prefix, delete }
    }

    /// Whether unlinking is enabled.
    #[must_use]
    pub fn deletes(&self) -> bool {
        self.delete
    }

    /// Apply the policy to one confirmed pair.
    ///
    /// Returns the disposable member's path when exactly one side lies under
    /// the prefix, after unlinking it if deletion is enabled. An
    /// already-gone file on unlink is tolerated and logged. Returns `None`
    /// when the asymmetry condition does not hold.
    pub fn apply(&self, pair: &DuplicatePair) -> Option<PathBuf> {
        // Both sides are checked independently; the prefix condition is not
        // assumed mutually exclusive by construction.
        let a_under = has_prefix(pair.a.path(), &self.prefix);
        let b_under = has_prefix(pair.b.path(), &self.prefix);

        let victim = match (a_under, b_under) {
            (true, false) => pair.a.path(),
            (false, true) => pair.b.path(),
            _ => {
                log::debug!(
                    "no disposable member for {} / {}: prefix match is not asymmetric",
                    pair.a.path().display(),
                    pair.b.path().display()
                );
                return None;
            }
        };

        if self.delete {
            match fs::remove_file(victim) {
                Ok(()) => log::info!("removed {}", victim.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    log::warn!("already gone: {}", victim.display());
                }
                Err(e) => log::error!("failed to remove {}: {}", victim.display(), e),
            }
        }

        Some(victim.to_path_buf())
    }
}

/// Byte-wise path-string prefix test.
///
/// Deliberately not component-wise: the prefix is an opaque string the
/// caller supplies, so `/tmp/scratch/` matches `/tmp/scratch/a` but not
/// `/tmp/scratchier/a` unless the caller omits the trailing separator.
fn has_prefix(path: &Path, prefix: &Path) -> bool {
    path.as_os_str()
        .as_encoded_bytes()
        .starts_with(prefix.as_os_str().as_encoded_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::FileCandidate;
    use std::io::Write;
    use std::sync::Arc;
    use tempfile::{tempdir, TempDir};

    fn pair_in(dir: &TempDir, a: &str, b: &str) -> DuplicatePair {
        let make = |rel: &str| {
            let path = dir.path().join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::File::create(&path)
                .unwrap()
                .write_all(b"same")
                .unwrap();
            Arc::new(FileCandidate::resolve(path).unwrap())
        };
        DuplicatePair {
            a: make(a),
            b: make(b),
        }
    }

    #[test]
    fn test_asymmetric_match_removes_prefixed_side_only() {
        let dir = tempdir().unwrap();
        let pair = pair_in(&dir, "keep/a.bin", "scratch/a.bin");
        let policy = DeletionPolicy::new(dir.path().join("scratch"), true);

        let removed = policy.apply(&pair).unwrap();
        assert_eq!(removed, pair.b.path());
        assert!(!pair.b.path().exists());
        assert!(pair.a.path().exists());
    }

    #[test]
    fn test_asymmetric_match_on_first_side() {
        let dir = tempdir().unwrap();
        let pair = pair_in(&dir, "scratch/a.bin", "keep/a.bin");
        let policy = DeletionPolicy::new(dir.path().join("scratch"), true);

        assert_eq!(policy.apply(&pair).unwrap(), pair.a.path());
        assert!(!pair.a.path().exists());
        assert!(pair.b.path().exists());
    }

    #[test]
    fn test_both_under_prefix_removes_nothing() {
        let dir = tempdir().unwrap();
        let pair = pair_in(&dir, "scratch/a.bin", "scratch/deeper/a.bin");
        let policy = DeletionPolicy::new(dir.path().join("scratch"), true);

        assert!(policy.apply(&pair).is_none());
        assert!(pair.a.path().exists());
        assert!(pair.b.path().exists());
    }

    #[test]
    fn test_neither_under_prefix_removes_nothing() {
        let dir = tempdir().unwrap();
        let pair = pair_in(&dir, "one/a.bin", "two/a.bin");
        let policy = DeletionPolicy::new(dir.path().join("scratch"), true);

        assert!(policy.apply(&pair).is_none());
        assert!(pair.a.path().exists());
        assert!(pair.b.path().exists());
    }

    #[test]
    fn test_report_only_mode_keeps_the_file() {
        let dir = tempdir().unwrap();
        let pair = pair_in(&dir, "keep/a.bin", "scratch/a.bin");
        let policy = DeletionPolicy::new(dir.path().join("scratch"), false);

        assert_eq!(policy.apply(&pair).unwrap(), pair.b.path());
        assert!(pair.b.path().exists());
    }

    #[test]
    fn test_already_gone_victim_is_tolerated() {
        let dir = tempdir().unwrap();
        let pair = pair_in(&dir, "keep/a.bin", "scratch/a.bin");
        std::fs::remove_file(pair.b.path()).unwrap();

        let policy = DeletionPolicy::new(dir.path().join("scratch"), true);
        assert_eq!(policy.apply(&pair).unwrap(), pair.b.path());
    }

    #[test]
    fn test_prefix_match_is_a_string_prefix() {
        let dir = tempdir().unwrap();
        let pair = pair_in(&dir, "scratchier/a.bin", "keep/a.bin");
        // Trailing separator excludes sibling directories sharing the stem.
        let mut prefix = dir.path().join("scratch").into_os_string();
        prefix.push(std::path::MAIN_SEPARATOR.to_string());
        let policy = DeletionPolicy::new(PathBuf::from(prefix), true);

        assert!(policy.apply(&pair).is_none());
        assert!(pair.a.path().exists());
    }
}
