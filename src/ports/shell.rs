//! Shell executor port for running external commands.

use serde::{Deserialize, Serialize};

use super::PortError;

/// The output of a shell command execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellOutput {
    /// The exit code of the process (`-1` when killed by a signal).
    pub exit_code: i32,
    /// The captured standard output.
    pub stdout: String,
    /// The captured standard error.
    pub stderr: String,
}

impl ShellOutput {
    /// Returns `true` when the process exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Executes shell commands.
///
/// Abstracting shell execution allows deterministic replay by recording
/// and replaying command outputs during cassette playback.
pub trait ShellExecutor: Send + Sync {
    /// Runs a command string in the system shell and returns its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned.
    fn run(&self, command: &str) -> Result<ShellOutput, PortError>;
}
