//! Verification script execution
//!
//! Each unit's entry point runs as an isolated child process with the unit's
//! own directory as working directory, so relative fixture paths resolve
//! inside the unit and units cannot touch each other's working files. The
//! parent's working directory is never mutated.
//!
//! Anything that goes wrong launching or waiting on the child is folded into
//! the unit's [`ExecutionResult`]; execution never returns an error that
//! could abort the surrounding run.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use super::discovery::ExerciseUnit;
use super::RunnerConfig;

/// How often a bounded wait polls the child for completion.
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Outcome of one unit's verification run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome {
    /// Entry point exited zero.
    Passed,
    /// Entry point exited nonzero; signal terminations map to -1.
    Failed(i32),
    /// Entry point could not be started (missing interpreter, spawn error).
    LaunchFailed(String),
    /// Entry point exceeded the configured wall-clock ceiling and was killed.
    TimedOut(Duration),
}

impl UnitOutcome {
    pub fn is_failure(&self) -> bool {
        !matches!(self, UnitOutcome::Passed)
    }

    fn from_status(status: ExitStatus) -> Self {
        if status.success() {
            UnitOutcome::Passed
        } else {
            UnitOutcome::Failed(status.code().unwrap_or(-1))
        }
    }
}

/// Per-unit result: captured output plus the outcome.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub outcome: UnitOutcome,
    pub duration: Duration,
}

/// Execute one unit's verification entry point.
///
/// Abstracted as a trait so the orchestration loop can be tested without
/// spawning processes, and to leave room for custom execution strategies
/// (resource limits, remote execution).
pub trait UnitExecutor {
    fn execute(&self, unit: &ExerciseUnit) -> ExecutionResult;
}

/// Child-process executor: `<interpreter> <entry_point>` in the unit's directory.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    interpreter: String,
    entry_point: String,
    timeout: Option<Duration>,
}

impl ProcessExecutor {
    pub fn new(interpreter: impl Into<String>, entry_point: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            interpreter: interpreter.into(),
            entry_point: entry_point.into(),
            timeout,
        }
    }

    pub fn from_config(config: &RunnerConfig) -> Self {
        Self::new(&config.interpreter, &config.entry_point, config.timeout)
    }
}

impl UnitExecutor for ProcessExecutor {
    fn execute(&self, unit: &ExerciseUnit) -> ExecutionResult {
        let start = Instant::now();
        tracing::debug!(unit = %unit.name, interpreter = %self.interpreter, "spawning verification script");

        let spawned = Command::new(&self.interpreter)
            .arg(&self.entry_point)
            .current_dir(&unit.dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();

        let child = match spawned {
            Ok(child) => child,
            Err(e) => {
                return ExecutionResult {
                    stdout: String::new(),
                    stderr: String::new(),
                    outcome: UnitOutcome::LaunchFailed(e.to_string()),
                    duration: start.elapsed(),
                };
            }
        };

        match self.timeout {
            Some(limit) => wait_bounded(child, limit, start),
            None => wait_unbounded(child, start),
        }
    }
}

fn wait_unbounded(child: Child, start: Instant) -> ExecutionResult {
    match child.wait_with_output() {
        Ok(output) => ExecutionResult {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            outcome: UnitOutcome::from_status(output.status),
            duration: start.elapsed(),
        },
        Err(e) => ExecutionResult {
            stdout: String::new(),
            stderr: String::new(),
            outcome: UnitOutcome::LaunchFailed(format!("failed to wait on child: {e}")),
            duration: start.elapsed(),
        },
    }
}

/// Wait for the child with a wall-clock ceiling, killing it on expiry.
///
/// The pipes are drained on background threads while this thread polls
/// `try_wait`; draining eagerly keeps a chatty child from blocking on a
/// full pipe buffer.
fn wait_bounded(mut child: Child, limit: Duration, start: Instant) -> ExecutionResult {
    let stdout_reader = child.stdout.take().map(spawn_pipe_reader);
    let stderr_reader = child.stderr.take().map(spawn_pipe_reader);

    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                let (stdout, stderr) = collect_pipes(stdout_reader, stderr_reader);
                return ExecutionResult {
                    stdout,
                    stderr,
                    outcome: UnitOutcome::from_status(status),
                    duration: start.elapsed(),
                };
            }
            Ok(None) => {
                if start.elapsed() >= limit {
                    tracing::debug!(limit = ?limit, "verification script exceeded time limit, killing");
                    let _ = child.kill();
                    let _ = child.wait();
                    let (stdout, stderr) = collect_pipes(stdout_reader, stderr_reader);
                    return ExecutionResult {
                        stdout,
                        stderr,
                        outcome: UnitOutcome::TimedOut(limit),
                        duration: start.elapsed(),
                    };
                }
                thread::sleep(WAIT_POLL_INTERVAL);
            }
            Err(e) => {
                let _ = child.kill();
                let (stdout, stderr) = collect_pipes(stdout_reader, stderr_reader);
                return ExecutionResult {
                    stdout,
                    stderr,
                    outcome: UnitOutcome::LaunchFailed(format!("failed to wait on child: {e}")),
                    duration: start.elapsed(),
                };
            }
        }
    }
}

fn spawn_pipe_reader<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn collect_pipes(
    stdout_reader: Option<thread::JoinHandle<Vec<u8>>>,
    stderr_reader: Option<thread::JoinHandle<Vec<u8>>>,
) -> (String, String) {
    let stdout = stdout_reader.and_then(|h| h.join().ok()).unwrap_or_default();
    let stderr = stderr_reader.and_then(|h| h.join().ok()).unwrap_or_default();
    (
        String::from_utf8_lossy(&stdout).into_owned(),
        String::from_utf8_lossy(&stderr).into_owned(),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    /// Shell-script unit so the tests run anywhere `sh` exists.
    fn sh_unit(base: &Path, name: &str, script: &str) -> ExerciseUnit {
        let dir = base.join(name);
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("test.sh"), script).unwrap();
        ExerciseUnit {
            name: name.to_string(),
            entry_point: dir.join("test.sh"),
            dir,
        }
    }

    fn sh_executor() -> ProcessExecutor {
        ProcessExecutor::new("sh", "test.sh", Some(Duration::from_secs(10)))
    }

    #[test]
    fn test_passing_script_captures_stdout() {
        let tmp = tempfile::tempdir().unwrap();
        let unit = sh_unit(tmp.path(), "greet", "echo OK\n");

        let result = sh_executor().execute(&unit);
        assert_eq!(result.outcome, UnitOutcome::Passed);
        assert_eq!(result.stdout, "OK\n");
        assert!(result.stderr.is_empty());
    }

    #[test]
    fn test_failing_script_reports_exit_code_and_stderr() {
        let tmp = tempfile::tempdir().unwrap();
        let unit = sh_unit(tmp.path(), "boom", "echo boom >&2\nexit 3\n");

        let result = sh_executor().execute(&unit);
        assert_eq!(result.outcome, UnitOutcome::Failed(3));
        assert!(result.outcome.is_failure());
        assert_eq!(result.stderr, "boom\n");
    }

    #[test]
    fn test_script_runs_in_its_own_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let unit = sh_unit(tmp.path(), "writer", "printf here > scratch.txt\n");

        let result = sh_executor().execute(&unit);
        assert_eq!(result.outcome, UnitOutcome::Passed);
        assert_eq!(fs::read_to_string(unit.dir.join("scratch.txt")).unwrap(), "here");
    }

    #[test]
    fn test_missing_interpreter_is_a_launch_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let unit = sh_unit(tmp.path(), "orphan", "echo never\n");

        let executor = ProcessExecutor::new("/no/such/interpreter", "test.sh", None);
        let result = executor.execute(&unit);
        assert!(matches!(result.outcome, UnitOutcome::LaunchFailed(_)));
        assert!(result.outcome.is_failure());
    }

    #[test]
    fn test_hung_script_times_out() {
        let tmp = tempfile::tempdir().unwrap();
        let unit = sh_unit(tmp.path(), "sleeper", "echo before\nsleep 30\necho after\n");

        let executor = ProcessExecutor::new("sh", "test.sh", Some(Duration::from_millis(300)));
        let result = executor.execute(&unit);
        assert!(matches!(result.outcome, UnitOutcome::TimedOut(_)));
        // Output produced before the kill is still captured.
        assert_eq!(result.stdout, "before\n");
        assert!(!result.stdout.contains("after"));
    }

    #[test]
    fn test_unbounded_wait_still_collects_output() {
        let tmp = tempfile::tempdir().unwrap();
        let unit = sh_unit(tmp.path(), "plain", "echo done\n");

        let executor = ProcessExecutor::new("sh", "test.sh", None);
        let result = executor.execute(&unit);
        assert_eq!(result.outcome, UnitOutcome::Passed);
        assert_eq!(result.stdout, "done\n");
    }
}
