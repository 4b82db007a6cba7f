//! Human-structured rendering with pair numbering and sizes.

use std::io::{self, Write};
use std::path::Path;

use crate::matcher::DuplicatePair;

use super::PairWriter;

/// Multi-line, human-readable rendering.
///
/// ```text
/// [1] 10485760 bytes
///     /tmp/a.bin
///     /tmp/b.bin
///     removed /tmp/scratch/b.bin
/// ```
pub struct PrettyWriter<W: Write> {
    writer: W,
    pair_index: usize,
}

impl<W: Write> PrettyWriter<W> {
    /// Create a pretty writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pair_index: 0,
        }
    }
}

impl<W: Write> PairWriter for PrettyWriter<W> {
    fn write_pair(&mut self, pair: &DuplicatePair) -> io::Result<()> {
        self.pair_index += 1;
        let record = format!(
            "[{}] {} bytes\n    {}\n    {}\n",
            self.pair_index,
            pair.a.size(),
            pair.a.path().display(),
            pair.b.path().display()
        );
        self.writer.write_all(record.as_bytes())
    }

    fn write_removed(&mut self, path: &Path) -> io::Result<()> {
        let record = format!("    removed {}\n", path.display());
        self.writer.write_all(record.as_bytes())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::FileCandidate;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn test_pairs_are_numbered_with_sizes() {
        let dir = tempdir().unwrap();
        let make = |name: &str| {
            let path = dir.path().join(name);
            std::fs::write(&path, b"12345").unwrap();
            Arc::new(FileCandidate::resolve(path).unwrap())
        };
        let first = DuplicatePair {
            a: make("a.bin"),
            b: make("b.bin"),
        };
        let second = DuplicatePair {
            a: make("c.bin"),
            b: make("d.bin"),
        };

        let mut buf = Vec::new();
        {
            let mut writer = PrettyWriter::new(&mut buf);
            writer.write_pair(&first).unwrap();
            writer.write_removed(first.b.path()).unwrap();
            writer.write_pair(&second).unwrap();
            writer.finish().unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("[1] 5 bytes\n"));
        assert!(text.contains("\n[2] 5 bytes\n"));
        assert!(text.contains("    removed "));
    }
}
