//! Replaying adapter for the `ShellExecutor` port.

use super::{next_value, replay_result, SharedReplayer};
use crate::ports::shell::{ShellExecutor, ShellOutput};
use crate::ports::PortError;

/// Replays recorded shell command results from a cassette.
pub struct ReplayingShellExecutor {
    replayer: SharedReplayer,
}

impl ReplayingShellExecutor {
    /// Creates a new replaying shell executor from a shared cassette replayer.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self { replayer }
    }
}

impl ShellExecutor for ReplayingShellExecutor {
    fn run(&self, _command: &str) -> Result<ShellOutput, PortError> {
        let output = next_value(&self.replayer, "shell", "run");
        replay_result(output, "shell::run", |err| {
            PortError::from(err.as_str().map_or_else(|| err.to_string(), str::to_string))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::cassette::{Cassette, CassetteReplayer, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn executor(output: serde_json::Value) -> ReplayingShellExecutor {
        let cassette = Cassette {
            name: "shell".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions: vec![Interaction {
                seq: 0,
                port: "shell".into(),
                method: "run".into(),
                input: json!({"command": "npx jest --coverage"}),
                output,
            }],
        };
        ReplayingShellExecutor::new(Arc::new(Mutex::new(CassetteReplayer::new(&cassette))))
    }

    #[test]
    fn replaying_shell_run() {
        let shell = executor(json!({"ok": {"exit_code": 1, "stdout": "FAIL\n", "stderr": ""}}));
        let result = shell.run("npx jest --coverage").unwrap();
        assert_eq!(result.exit_code, 1);
        assert_eq!(result.stdout, "FAIL\n");
    }

    #[test]
    fn replaying_shell_run_error() {
        let shell = executor(json!({"err": "sh: npx: not found"}));
        assert!(shell.run("npx jest --coverage").is_err());
    }
}
