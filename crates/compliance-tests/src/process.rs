//! External process execution.
//!
//! Runs one command to completion in a given directory and compares its exit
//! status against what the caller expects. There is no timeout: a hung tool
//! hangs the test run.

use crate::errors::HarnessError;
use std::fmt;
use std::path::Path;
use std::process::ExitStatus;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Outcome the caller requires from a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedOutcome {
    Success,
    Failure,
}

impl ExpectedOutcome {
    fn matches(self, status: ExitStatus) -> bool {
        match self {
            ExpectedOutcome::Success => status.success(),
            ExpectedOutcome::Failure => !status.success(),
        }
    }
}

impl fmt::Display for ExpectedOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedOutcome::Success => write!(f, "success"),
            ExpectedOutcome::Failure => write!(f, "failure"),
        }
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Render `program args...` for diagnostics.
pub fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run `program args...` in `dir`, waiting for it to exit.
///
/// Returns the captured output when the exit status matches `expected`,
/// otherwise [`HarnessError::UnexpectedOutcome`] carrying stdout and stderr.
#[instrument(name = "harness.exec", skip_all, fields(command = %command_line(program, args), dir = %dir.display()))]
pub async fn run(
    program: &str,
    args: &[String],
    dir: &Path,
    expected: ExpectedOutcome,
) -> Result<CommandOutput, HarnessError> {
    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .await
        .map_err(|source| HarnessError::Spawn {
            command: command_line(program, args),
            source,
        })?;

    let result = CommandOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    debug!(status = %result.status, "Command finished");

    if !expected.matches(result.status) {
        return Err(HarnessError::UnexpectedOutcome {
            command: command_line(program, args),
            expected,
            status: result.status.to_string(),
            stdout: result.stdout,
            stderr: result.stderr,
        });
    }

    Ok(result)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_command_line() {
        assert_eq!(command_line("docker", &args(&["compose", "up"])), "docker compose up");
        assert_eq!(command_line("true", &[]), "true");
    }

    #[tokio::test]
    async fn test_run_captures_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let output = run("echo", &args(&["hello"]), dir.path(), ExpectedOutcome::Success)
            .await
            .unwrap();

        assert!(output.status.success());
        assert_eq!(output.stdout, "hello\n");
    }

    #[tokio::test]
    async fn test_run_uses_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let output = run("pwd", &[], dir.path(), ExpectedOutcome::Success)
            .await
            .unwrap();

        let expected = dir.path().canonicalize().unwrap();
        assert_eq!(
            Path::new(output.stdout.trim()).canonicalize().unwrap(),
            expected
        );
    }

    #[tokio::test]
    async fn test_run_expected_failure() {
        let dir = tempfile::tempdir().unwrap();
        let output = run("false", &[], dir.path(), ExpectedOutcome::Failure)
            .await
            .unwrap();

        assert!(!output.status.success());
    }

    #[tokio::test]
    async fn test_run_unexpected_failure_carries_output() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(
            "sh",
            &args(&["-c", "echo out; echo err >&2; exit 3"]),
            dir.path(),
            ExpectedOutcome::Success,
        )
        .await
        .unwrap_err();

        match err {
            HarnessError::UnexpectedOutcome {
                stdout, stderr, expected, ..
            } => {
                assert_eq!(expected, ExpectedOutcome::Success);
                assert_eq!(stdout, "out\n");
                assert_eq!(stderr, "err\n");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_run_missing_binary() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(
            "definitely-not-a-compose-tool",
            &[],
            dir.path(),
            ExpectedOutcome::Success,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, HarnessError::Spawn { .. }));
    }
}
