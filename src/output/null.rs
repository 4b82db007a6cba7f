//! NUL-terminated rendering for `xargs -0`-style consumers.

use std::io::{self, Write};
use std::path::Path;

use crate::matcher::DuplicatePair;

use super::PairWriter;

/// Renders `pathA\0pathB\0` per pair and `path\0` per deletion notice.
///
/// The only rendering safe for paths containing newlines or tabs.
pub struct NullWriter<W: Write> {
    writer: W,
}

impl<W: Write> NullWriter<W> {
    /// Create a NUL-terminated writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> PairWriter for NullWriter<W> {
    fn write_pair(&mut self, pair: &DuplicatePair) -> io::Result<()> {
        let mut record = Vec::new();
        record.extend_from_slice(pair.a.path().as_os_str().as_encoded_bytes());
        record.push(0);
        record.extend_from_slice(pair.b.path().as_os_str().as_encoded_bytes());
        record.push(0);
        self.writer.write_all(&record)
    }

    fn write_removed(&mut self, path: &Path) -> io::Result<()> {
        let mut record = Vec::new();
        record.extend_from_slice(path.as_os_str().as_encoded_bytes());
        record.push(0);
        self.writer.write_all(&record)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
