//! Hands queued commands to the system shell.
//!
//! The session only needs "run this string in a shell and wait", so that
//! capability is the [`CommandExecutor`] trait. [`ShellExecutor`] is the real
//! implementation; tests substitute a recorder.

use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::error::ExecError;

/// Runs a single command string to completion.
pub trait CommandExecutor {
    /// Executes `command` and blocks until it finishes.
    ///
    /// A command that runs and exits unsuccessfully is not an error: exit
    /// codes are the shell's concern.
    ///
    /// ## Errors
    ///
    /// Returns an error only if the command could not be started.
    fn execute(&mut self, command: &str) -> Result<(), ExecError>;
}

/// Executes commands through the platform shell with inherited stdio.
///
/// ## Examples
///
/// ```no_run
/// use quer_lib::{CommandExecutor, ShellExecutor};
///
/// let mut executor = ShellExecutor::default();
/// executor.execute("echo hello").unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellExecutor {
    program: String,
    flag: String,
}

impl ShellExecutor {
    /// Creates an executor that runs `<program> <flag> <command>`.
    #[must_use]
    pub fn new(program: impl Into<String>, flag: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            flag: flag.into(),
        }
    }
}

impl Default for ShellExecutor {
    #[cfg(windows)]
    fn default() -> Self {
        Self::new("cmd", "/C")
    }

    #[cfg(not(windows))]
    fn default() -> Self {
        Self::new("/bin/sh", "-c")
    }
}

impl CommandExecutor for ShellExecutor {
    #[tracing::instrument(skip(self), fields(shell = %self.program))]
    fn execute(&mut self, command: &str) -> Result<(), ExecError> {
        let status = Command::new(&self.program)
            .arg(&self.flag)
            .arg(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| ExecError::Spawn {
                command: command.to_string(),
                source,
            })?;

        if status.success() {
            debug!("command finished");
        } else {
            warn!(%status, "command exited unsuccessfully");
        }

        Ok(())
    }
}
