//! filematch - byte-identical file pair finder
//!
//! A batch, stateless CLI tool: given an explicit list of candidate paths,
//! it reports every pair whose contents are byte-identical, and can
//! optionally unlink one member of each pair under a designated path prefix.

mod app;
pub mod cli;
pub mod error;
pub mod input;
pub mod logging;
pub mod matcher;
pub mod output;
pub mod policy;
pub mod signal;

pub use app::run_app;
