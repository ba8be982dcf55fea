//! Process spawning behind a single-method capability.

use std::io;
use std::process::Command;

use printer_logging::printer_debug;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(status: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            status: Some(status),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Stdout and stderr, trimmed and joined.
    pub fn combined(&self) -> String {
        [self.stdout.trim(), self.stderr.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn describe_status(&self) -> String {
        match self.status {
            Some(code) => format!("exit status {code}"),
            None => "termination by signal".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to launch {program}: {message}")]
pub struct RunnerError {
    pub program: String,
    pub kind: io::ErrorKind,
    pub message: String,
}

/// Runs an external program to completion and captures its output.
pub trait ProcessRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, RunnerError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, RunnerError> {
        printer_debug!("Running {} {:?}", program, args);
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|err| RunnerError {
                program: program.to_string(),
                kind: err.kind(),
                message: err.to_string(),
            })?;
        Ok(CommandOutput {
            success: output.status.success(),
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_skips_empty_streams() {
        let output = CommandOutput {
            success: false,
            status: Some(1),
            stdout: "  \n".to_string(),
            stderr: "Access is denied.\r\n".to_string(),
        };
        assert_eq!(output.combined(), "Access is denied.");
        assert_eq!(output.describe_status(), "exit status 1");
    }

    #[test]
    fn missing_program_is_a_launch_error() {
        let err = SystemRunner
            .run("definitely-not-a-real-program-xyz", &[])
            .unwrap_err();
        assert_eq!(err.kind, io::ErrorKind::NotFound);
        assert_eq!(err.program, "definitely-not-a-real-program-xyz");
    }
}
