#![forbid(unsafe_code)]
//! Exercise Test Runner
//!
//! This crate drives a directory of self-checking programming exercises.
//! Each exercise lives in its own subdirectory and exposes a verification
//! script; the runner executes every script as an isolated child process,
//! captures its output, and reports a pass/fail summary.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`.
//!   The `cli` module enforces `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod runner;

pub use runner::{RunSummary, RunnerConfig, RunnerError, run_all};
pub use runner::discovery::{ExerciseUnit, discover_units, is_qualifying_unit};
pub use runner::exec::{ExecutionResult, ProcessExecutor, UnitExecutor, UnitOutcome};
pub use runner::report::{ConsoleReporter, RunReporter};
