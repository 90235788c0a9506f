//! Recording adapter for the `ShellExecutor` port.

use serde::Serialize;
use serde_json::Value;

use super::{record_result, SharedRecorder};
use crate::ports::{PortError, ShellExecutor, ShellOutput};

/// Records shell interactions while delegating to an inner implementation.
pub struct RecordingShellExecutor {
    inner: Box<dyn ShellExecutor>,
    recorder: SharedRecorder,
}

impl RecordingShellExecutor {
    /// Creates a new recording shell executor wrapping the given implementation.
    pub fn new(inner: Box<dyn ShellExecutor>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct CommandInput<'a> {
    command: &'a str,
}

impl ShellExecutor for RecordingShellExecutor {
    fn run(&self, command: &str) -> Result<ShellOutput, PortError> {
        let result = self.inner.run(command);
        record_result(&self.recorder, "shell", "run", &CommandInput { command }, &result, |e| {
            Value::String(e.to_string())
        });
        result
    }
}
