//! Output renderers for confirmed duplicate pairs and deletion notices.
//!
//! The engine only guarantees a stream of (pathA, pathB) tuples plus
//! single-path deletion notices; how they are rendered is a concern of this
//! module. Each record is produced with a single write so records from
//! parallel-produced results never interleave.

pub mod null;
pub mod plain;
pub mod pretty;

pub use null::NullWriter;
pub use plain::PlainWriter;
pub use pretty::PrettyWriter;

use std::io;

use crate::matcher::DuplicatePair;

/// Sink for the result stream.
pub trait PairWriter {
    /// Render one confirmed duplicate pair.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    fn write_pair(&mut self, pair: &DuplicatePair) -> io::Result<()>;

    /// Render one deletion notice for a disposable pair member.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    fn write_removed(&mut self, path: &std::path::Path) -> io::Result<()>;

    /// Flush and finish the stream.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    fn finish(&mut self) -> io::Result<()>;
}
