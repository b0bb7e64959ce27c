//! Run reporting
//!
//! The console format mirrors the runner's contract: a `=== <name> ===`
//! header per unit, the unit's captured stdout streamed as soon as the unit
//! finishes, captured stderr surfaced on the failure channel for failing
//! units, and one closing summary line.

use super::discovery::ExerciseUnit;
use super::exec::{ExecutionResult, UnitOutcome};
use super::RunSummary;

/// Trait for reporting run progress and results.
///
/// Implement this trait to customize output format (JSON, TAP, etc.)
pub trait RunReporter {
    /// Called once discovery is complete, before any unit runs
    fn on_collection_complete(&mut self, _unit_count: usize) {}

    /// Called when a unit's verification script is about to run
    fn on_unit_start(&mut self, unit: &ExerciseUnit);

    /// Called when a unit's verification script has finished
    fn on_unit_complete(&mut self, unit: &ExerciseUnit, result: &ExecutionResult);

    /// Called after all units have completed
    fn on_run_complete(&mut self, summary: &RunSummary);
}

/// Default console reporter.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    pub verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl RunReporter for ConsoleReporter {
    fn on_unit_start(&mut self, unit: &ExerciseUnit) {
        println!();
        println!("=== {} ===", unit.name);
    }

    fn on_unit_complete(&mut self, _unit: &ExerciseUnit, result: &ExecutionResult) {
        // Stream the unit's stdout verbatim; scripts own their trailing newline.
        print!("{}", result.stdout);

        match &result.outcome {
            UnitOutcome::Passed => {
                if self.verbose {
                    println!("\x1b[32mPASSED\x1b[0m ({:.0?})", result.duration);
                }
            }
            UnitOutcome::Failed(code) => {
                eprint!("{}", result.stderr);
                if self.verbose {
                    println!("\x1b[31mFAILED\x1b[0m (exit {code}, {:.0?})", result.duration);
                }
            }
            UnitOutcome::LaunchFailed(reason) => {
                eprintln!("failed to launch verification script: {reason}");
                if self.verbose {
                    println!("\x1b[31mFAILED\x1b[0m (launch)");
                }
            }
            UnitOutcome::TimedOut(limit) => {
                eprint!("{}", result.stderr);
                eprintln!("verification script timed out after {limit:.0?}");
                if self.verbose {
                    println!("\x1b[31mFAILED\x1b[0m (timeout)");
                }
            }
        }
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        println!();
        println!(
            "{} passed, {} failed, {} total.",
            summary.passed(),
            summary.failed,
            summary.total
        );
    }
}
