//! CLI module for the exercise runner
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command logic returns `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::fmt;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;

use crate::runner::{self, ConsoleReporter, RunnerConfig};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Run every exercise's verification script and summarize pass/fail counts
#[derive(Parser, Debug)]
#[command(name = "exrun")]
#[command(version = VERSION)]
#[command(about = "Run every exercise's verification script and summarize results", long_about = None)]
pub struct Cli {
    /// Root directory containing one subdirectory per exercise
    #[arg(value_name = "PATH", default_value = "exercises")]
    pub path: PathBuf,

    /// Interpreter used to launch each verification script
    #[arg(long, value_name = "PROG", default_value = runner::DEFAULT_INTERPRETER)]
    pub interpreter: String,

    /// Entry point file name that marks a directory as an exercise
    #[arg(long, value_name = "FILE", default_value = runner::DEFAULT_ENTRY_POINT)]
    pub entry: String,

    /// Per-exercise time limit in seconds (0 disables the limit)
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Print a status line for every exercise
    #[arg(short, long)]
    pub verbose: bool,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. The command
/// implementation returns `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the run and map the summary to an exit code.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let config = RunnerConfig {
        base_dir: cli.path,
        entry_point: cli.entry,
        interpreter: cli.interpreter,
        timeout: (cli.timeout_secs > 0).then(|| Duration::from_secs(cli.timeout_secs)),
    };

    let mut reporter = ConsoleReporter::new(cli.verbose);
    let summary = runner::run_all(&config, &mut reporter).map_err(|e| CliError::failure(e.to_string()))?;

    if summary.all_passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

// ============================================================================
// Tests
// ============================================================================
