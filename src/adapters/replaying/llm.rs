//! Replaying adapter for the `LlmClient` port.

use super::{next_value, replay_result, SharedReplayer};
use crate::ports::{CompletionFuture, CompletionRequest, LlmClient, PortError};

/// Serves recorded LLM completions from a cassette.
pub struct ReplayingLlmClient {
    replayer: SharedReplayer,
}

impl ReplayingLlmClient {
    /// Create a replaying LLM client backed by the given replayer.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self { replayer }
    }
}

impl LlmClient for ReplayingLlmClient {
    fn complete(&self, _request: &CompletionRequest) -> CompletionFuture<'_> {
        let output = next_value(&self.replayer, "llm", "complete");
        Box::pin(async move {
            replay_result(output, "llm::complete", |err| PortError::from(error_text(&err)))
        })
    }
}

fn error_text(value: &serde_json::Value) -> String {
    value.as_str().map_or_else(|| value.to_string(), str::to_string)
}
