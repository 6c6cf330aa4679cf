use std::fmt;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::environment::Shell;
use crate::util::{WorkingStatus, prefix_chars};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecStatus {
    Success,
    Error,
}

impl fmt::Display for ExecStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecStatus::Success => f.write_str("SUCCESS"),
            ExecStatus::Error => f.write_str("ERROR"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub status: ExecStatus,
    pub output: String,
}

impl ExecutionResult {
    fn success(stdout: &str, stderr: &str) -> Self {
        Self {
            status: ExecStatus::Success,
            output: format!("STDOUT:\n{stdout}\nSTDERR:\n{stderr}"),
        }
    }

    fn failure(description: impl fmt::Display, stderr: &str) -> Self {
        Self {
            status: ExecStatus::Error,
            output: format!("Command failed with error: {description}\n{stderr}"),
        }
    }
}

/// Runs one command string to completion. Failures of the command itself are
/// reported through [`ExecStatus::Error`], never as a call error.
#[async_trait(?Send)]
pub trait CommandRunner {
    async fn run(&self, command: &str) -> ExecutionResult;

    fn shell(&self) -> &Shell;
}

pub struct ShellExecutor {
    shell: Shell,
}

impl ShellExecutor {
    pub fn new(shell: Shell) -> Self {
        Self { shell }
    }
}

#[async_trait(?Send)]
impl CommandRunner for ShellExecutor {
    async fn run(&self, command: &str) -> ExecutionResult {
        let short = if command.chars().count() > 48 {
            format!("exec {}...", prefix_chars(command, 48))
        } else {
            format!("exec {command}")
        };
        let working = WorkingStatus::start(short);

        debug!(shell = %self.shell, command, "spawning shell");
        let output = Command::new(self.shell.program())
            .arg(self.shell.command_switch())
            .arg(command)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await;
        working.finish();

        match output {
            Ok(out) => {
                let stdout = String::from_utf8_lossy(&out.stdout);
                let stderr = String::from_utf8_lossy(&out.stderr);
                if out.status.success() {
                    ExecutionResult::success(&stdout, &stderr)
                } else {
                    debug!(status = %out.status, "command exited unsuccessfully");
                    ExecutionResult::failure(out.status, &stderr)
                }
            }
            Err(err) => {
                debug!(error = %err, "failed to spawn shell");
                ExecutionResult::failure(
                    format_args!("failed to start {}: {err}", self.shell.program()),
                    "",
                )
            }
        }
    }

    fn shell(&self) -> &Shell {
        &self.shell
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh() -> ShellExecutor {
        ShellExecutor::new(Shell::Posix("/bin/sh".to_string()))
    }

    #[tokio::test]
    async fn captures_stdout_on_success() {
        let result = sh().run("echo hello-shai").await;
        assert_eq!(result.status, ExecStatus::Success);
        assert!(result.output.starts_with("STDOUT:\nhello-shai\n"));
        assert!(result.output.contains("\nSTDERR:\n"));
    }

    #[tokio::test]
    async fn stderr_is_kept_on_success() {
        let result = sh().run("echo warn >&2").await;
        assert_eq!(result.status, ExecStatus::Success);
        assert!(result.output.ends_with("STDERR:\nwarn\n"));
    }

    #[tokio::test]
    async fn non_zero_exit_is_error_status() {
        let result = sh().run("echo boom >&2; exit 3").await;
        assert_eq!(result.status, ExecStatus::Error);
        assert!(result.output.starts_with("Command failed with error:"));
        assert!(result.output.contains('3'));
        assert!(result.output.contains("boom"));
    }

    #[tokio::test]
    async fn missing_command_is_error_status() {
        let result = sh().run("definitely-not-a-real-binary-xyz").await;
        assert_eq!(result.status, ExecStatus::Error);
    }

    #[tokio::test]
    async fn missing_shell_is_error_status() {
        let exec = ShellExecutor::new(Shell::Posix("/nonexistent/shell".to_string()));
        let result = exec.run("echo hi").await;
        assert_eq!(result.status, ExecStatus::Error);
        assert!(result.output.contains("/nonexistent/shell"));
    }

    #[tokio::test]
    async fn command_string_is_passed_verbatim() {
        let result = sh().run("printf '%s|%s' \"a b\" c").await;
        assert!(result.output.starts_with("STDOUT:\na b|c\n"));
    }
}
