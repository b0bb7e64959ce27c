//! Exercise test runner
//!
//! ## RunReporter Trait
//!
//! The runner uses a `RunReporter` trait to separate reporting from
//! execution. This allows for custom output formats (JSON, TAP, etc.) by
//! implementing the trait.
//!
//! ## I/O Boundaries
//!
//! Unit discovery and execution are abstracted via `discover_units` and the
//! `UnitExecutor` trait to allow for:
//! - Mocking/testing of runner logic without spawning processes
//! - Custom execution strategies
//!
//! Default implementations preserve the console runner behavior.

pub mod discovery;
pub mod exec;
pub mod report;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use thiserror::Error;

pub use discovery::{ExerciseUnit, discover_units, is_qualifying_unit};
pub use exec::{ExecutionResult, ProcessExecutor, UnitExecutor, UnitOutcome};
pub use report::{ConsoleReporter, RunReporter};

/// Default verification entry point file name.
pub const DEFAULT_ENTRY_POINT: &str = "test.py";

/// Default interpreter used to launch verification scripts.
pub const DEFAULT_INTERPRETER: &str = "python3";

/// Default per-unit wall-clock ceiling.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that occur outside the per-unit loop.
///
/// Everything that goes wrong *inside* one unit (nonzero exit, spawn
/// failure, timeout) is captured in that unit's [`ExecutionResult`] and
/// never propagated as an error; the run always continues to the next unit.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to read exercise root '{path}': {source}")]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration for one invocation of the runner.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Root directory containing one subdirectory per exercise.
    pub base_dir: PathBuf,
    /// File name that marks a subdirectory as an exercise unit.
    pub entry_point: String,
    /// Interpreter used to launch each verification script.
    pub interpreter: String,
    /// Per-unit wall-clock ceiling; `None` waits unboundedly.
    pub timeout: Option<Duration>,
}

impl RunnerConfig {
    /// Config with the conventional defaults for the given root directory.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            interpreter: DEFAULT_INTERPRETER.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

/// Aggregate outcome of one run.
///
/// `passed` is derived, not stored, so the `passed + failed == total`
/// invariant holds structurally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub failed: usize,
    pub duration: Duration,
}

impl RunSummary {
    pub fn passed(&self) -> usize {
        self.total - self.failed
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Run every qualifying exercise unit under the configured root.
///
/// Discovers units (lexicographic order), executes each one as an isolated
/// child process, and reports results through `reporter`. A failing unit
/// never aborts the run; only an unreadable root directory is an error.
pub fn run_all(config: &RunnerConfig, reporter: &mut dyn RunReporter) -> Result<RunSummary, RunnerError> {
    let units = discover_units(&config.base_dir, &config.entry_point)?;
    reporter.on_collection_complete(units.len());

    let executor = ProcessExecutor::from_config(config);
    Ok(run_with_executor(&units, &executor, reporter))
}

/// Execute an already-discovered list of units with an arbitrary executor.
///
/// Split out from [`run_all`] so the orchestration loop can be exercised
/// without touching the filesystem or spawning processes.
pub fn run_with_executor(
    units: &[ExerciseUnit],
    executor: &dyn UnitExecutor,
    reporter: &mut dyn RunReporter,
) -> RunSummary {
    let start = Instant::now();
    let mut failed = 0;

    for unit in units {
        reporter.on_unit_start(unit);
        let result = executor.execute(unit);
        if result.outcome.is_failure() {
            failed += 1;
        }
        reporter.on_unit_complete(unit, &result);
    }

    let summary = RunSummary {
        total: units.len(),
        failed,
        duration: start.elapsed(),
    };
    reporter.on_run_complete(&summary);
    summary
}

// ============================================================================
// Tests
// ============================================================================
