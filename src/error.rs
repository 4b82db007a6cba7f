//! Process exit codes and the JSON error rendering behind `--json-errors`.

use serde::Serialize;

/// Process exit code, chosen grep-style so shell pipelines can branch on
/// whether duplicates were found (0) or not (2) without parsing output.
///
/// Codes 1, 3 and 130 follow the usual Unix conventions: general failure,
/// completed-with-problems, and terminated by SIGINT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// At least one duplicate pair confirmed.
    Success = 0,
    /// Unexpected fatal failure.
    GeneralError = 1,
    /// Completed with nothing to report.
    NoDuplicates = 2,
    /// Completed, but candidates were skipped or comparisons failed;
    /// the reported pairs are valid but possibly incomplete.
    PartialSuccess = 3,
    /// Ctrl+C before the pair stream was exhausted.
    Interrupted = 130,
}

impl ExitCode {
    /// Numeric value for `process::exit`.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Stable machine-readable identifier for this code, used as the `code`
    /// field of [`StructuredError`] and in plain stderr messages.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "FM000",
            Self::GeneralError => "FM001",
            Self::NoDuplicates => "FM002",
            Self::PartialSuccess => "FM003",
            Self::Interrupted => "FM130",
        }
    }
}

/// Fatal-error shape emitted on stderr when `--json-errors` is set, for
/// supervisors that parse failures rather than scrape log lines.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// Identifier from [`ExitCode::code_prefix`], e.g. "FM001".
    pub code: String,
    /// Numeric exit code the process terminates with.
    pub exit_code: i32,
    /// Rendered error chain.
    pub message: String,
    /// True when the failure was a user interrupt rather than a defect.
    pub interrupted: bool,
}

impl StructuredError {
    /// Build the JSON shape from a fatal error and the code it maps to.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: err.to_string(),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
