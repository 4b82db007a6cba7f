//! Application orchestration: wire the CLI to the matching pipeline.

use std::io;

use anyhow::Context;

use crate::cli::{Cli, OutputFormat};
use crate::error::ExitCode;
use crate::input::{self, InputMode};
use crate::matcher::{self, DispatchConfig};
use crate::output::{NullWriter, PairWriter, PlainWriter, PrettyWriter};
use crate::policy::DeletionPolicy;
use crate::signal;

/// Run the full pipeline for one invocation.
///
/// Path list → candidate set → pair stream → dispatch → rendering and
/// deletion policy. Returns the exit code for a completed run; an
/// interrupted run surfaces as [`matcher::MatchError::Interrupted`] inside
/// the error chain, which `main` maps to exit code 130.
///
/// # Errors
///
/// Returns an error for interruption, stdin read failures, worker pool
/// construction failures, or a broken output stream.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    crate::logging::init_logging(cli.verbose, cli.quiet);
    let handler = signal::install_handler()?;

    let mode = if cli.null {
        InputMode::Split(0)
    } else if let Some(delimiter) = cli.delimiter {
        InputMode::Split(delimiter as u8)
    } else {
        InputMode::Lines
    };

    let paths = input::gather_paths(cli.files, mode).context("failed to read candidate list")?;
    let resolved = input::resolve_candidates(paths);

    if resolved.candidates.len() < 2 {
        log::info!(
            "{} usable candidate(s), nothing to compare",
            resolved.candidates.len()
        );
        return Ok(if resolved.skipped > 0 {
            ExitCode::PartialSuccess
        } else {
            ExitCode::NoDuplicates
        });
    }

    let pairs = matcher::filter_pairs(matcher::all_pairs(&resolved.candidates), cli.name_match);
    log::info!(
        "comparing {} candidates, {} pairs",
        resolved.candidates.len(),
        pairs.len()
    );

    let config = DispatchConfig::default()
        .with_workers(cli.jobs)
        .with_shutdown_flag(handler.get_flag());
    let (duplicates, stats) = matcher::run(pairs, &config)?;

    log::info!(
        "{} of {} pairs confirmed byte-identical ({} undetermined, {} errors)",
        stats.confirmed,
        stats.pairs_examined,
        stats.undetermined,
        stats.errors.len()
    );

    // Render results and apply the deletion policy pair by pair. Records
    // are written whole, so output never interleaves.
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    let mut writer: Box<dyn PairWriter + '_> = if cli.null {
        Box::new(NullWriter::new(&mut lock))
    } else {
        match cli.output {
            OutputFormat::Plain => Box::new(PlainWriter::new(
                &mut lock,
                cli.delimiter.unwrap_or('\t'),
            )),
            OutputFormat::Pretty => Box::new(PrettyWriter::new(&mut lock)),
        }
    };

    let policy = cli
        .delete_prefix
        .map(|prefix| DeletionPolicy::new(prefix, cli.delete));

    for pair in &duplicates {
        writer.write_pair(pair).context("failed to write result")?;
        if let Some(ref policy) = policy {
            if let Some(removed) = policy.apply(pair) {
                writer
                    .write_removed(&removed)
                    .context("failed to write deletion notice")?;
            }
        }
    }
    writer.finish().context("failed to flush results")?;
    drop(writer);
    drop(lock);

    if resolved.skipped > 0 || stats.had_problems() {
        Ok(ExitCode::PartialSuccess)
    } else if duplicates.is_empty() {
        Ok(ExitCode::NoDuplicates)
    } else {
        Ok(ExitCode::Success)
    }
}
