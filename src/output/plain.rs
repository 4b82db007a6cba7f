//! Delimiter-joined pair rendering, one record per line.

use std::io::{self, Write};
use std::path::Path;

use crate::matcher::DuplicatePair;

use super::PairWriter;

/// Renders `pathA<delim>pathB` per pair and a bare path per deletion
/// notice. The delimiter defaults to a single tab.
pub struct PlainWriter<W: Write> {
    writer: W,
    delimiter: char,
}

impl<W: Write> PlainWriter<W> {
    /// Create a plain writer with the given field delimiter.
    pub fn new(writer: W, delimiter: char) -> Self {
        Self { writer, delimiter }
    }
}

impl<W: Write> PairWriter for PlainWriter<W> {
    fn write_pair(&mut self, pair: &DuplicatePair) -> io::Result<()> {
        let record = format!(
            "{}{}{}\n",
            pair.a.path().display(),
            self.delimiter,
            pair.b.path().display()
        );
        self.writer.write_all(record.as_bytes())
    }

    fn write_removed(&mut self, path: &Path) -> io::Result<()> {
        let record = format!("{}\n", path.display());
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

    fn sample_pair() -> (tempfile::TempDir, DuplicatePair) {
        let dir = tempdir().unwrap();
        let make = |name: &str| {
            let path = dir.path().join(name);
            std::fs::write(&path, b"x").unwrap();
            Arc::new(FileCandidate::resolve(path).unwrap())
        };
        let pair = DuplicatePair {
            a: make("a.bin"),
            b: make("b.bin"),
        };
        (dir, pair)
    }

    #[test]
    fn test_tab_delimited_record() {
        let (dir, pair) = sample_pair();
        let mut buf = Vec::new();
        {
            let mut writer = PlainWriter::new(&mut buf, '\t');
            writer.write_pair(&pair).unwrap();
            writer.write_removed(pair.b.path()).unwrap();
            writer.finish().unwrap();
        }
        let expected = format!(
            "{}\t{}\n{}\n",
            dir.path().join("a.bin").display(),
            dir.path().join("b.bin").display(),
            dir.path().join("b.bin").display()
        );
        assert_eq!(String::from_utf8(buf).unwrap(), expected);
    }

    #[test]
    fn test_custom_delimiter() {
        let (dir, pair) = sample_pair();
        let mut buf = Vec::new();
        {
            let mut writer = PlainWriter::new(&mut buf, ',');
            writer.write_pair(&pair).unwrap();
        }
        let expected = format!(
            "{},{}\n",
            dir.path().join("a.bin").display(),
            dir.path().join("b.bin").display()
        );
        assert_eq!(String::from_utf8(buf).unwrap(), expected);
    }
}
