//! Live `LlmClient` adapter: drafts tests through the Anthropic messages API.

use std::env;

use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::ports::llm::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient};
use crate::ports::PortError;

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

/// Overrides the API origin, e.g. for a proxy.
pub const BASE_URL_VAR: &str = "ANTHROPIC_BASE_URL";

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

/// Fixed role the model plays for every drafted test.
const SYSTEM_PROMPT: &str = "You write focused, deterministic Jest tests for TypeScript \
     web applications. Reply with code only, inside one fenced block.";

/// Sends completion requests to the messages endpoint.
pub struct LiveLlmClient {
    http: Client,
    endpoint: String,
}

impl LiveLlmClient {
    /// Client for the origin in `ANTHROPIC_BASE_URL`, or the public API.
    #[must_use]
    pub fn new() -> Self {
        let base = env::var(BASE_URL_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::with_base_url(&base)
    }

    /// Client for an explicit API origin.
    #[must_use]
    pub fn with_base_url(base: &str) -> Self {
        let endpoint = format!("{}/v1/messages", base.trim_end_matches('/'));
        Self { http: Client::new(), endpoint }
    }
}

impl Default for LiveLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct Body<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'static str,
    messages: [Turn<'a>; 1],
}

#[derive(Serialize)]
struct Turn<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> Body<'a> {
    fn for_request(request: &'a CompletionRequest) -> Self {
        Self {
            model: &request.model,
            max_tokens: request.max_tokens,
            system: SYSTEM_PROMPT,
            messages: [Turn { role: "user", content: &request.prompt }],
        }
    }
}

#[derive(Deserialize)]
struct Reply {
    content: Vec<Block>,
    #[serde(default)]
    stop_reason: Option<String>,
    usage: Usage,
}

/// Only `text` blocks carry test code; other block kinds are ignored.
#[derive(Deserialize)]
struct Block {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Deserialize)]
struct Failure {
    error: FailureDetail,
}

#[derive(Deserialize)]
struct FailureDetail {
    #[serde(rename = "type", default)]
    kind: String,
    message: String,
}

/// Turns a raw HTTP reply into a completion or a readable error.
fn decode(status: StatusCode, raw: &str) -> Result<CompletionResponse, PortError> {
    if !status.is_success() {
        let detail = serde_json::from_str::<Failure>(raw).map_or_else(
            |_| raw.trim().to_string(),
            |f| format!("{}: {}", f.error.kind, f.error.message),
        );
        return Err(format!("messages API returned {}: {detail}", status.as_u16()).into());
    }

    let reply: Reply = serde_json::from_str(raw)
        .map_err(|e| PortError::from(format!("unexpected messages API reply: {e}")))?;
    if reply.stop_reason.as_deref() == Some("max_tokens") {
        warn!("completion hit max_tokens; the drafted test may be truncated");
    }
    let text: String = reply
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .map(|block| block.text)
        .collect();
    if text.trim().is_empty() {
        return Err("messages API reply contained no text".into());
    }
    Ok(CompletionResponse {
        text,
        prompt_tokens: reply.usage.input_tokens,
        completion_tokens: reply.usage.output_tokens,
    })
}

impl LlmClient for LiveLlmClient {
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let key = env::var(API_KEY_VAR)
                .map_err(|_| PortError::from(format!("{API_KEY_VAR} is not set")))?;

            debug!("requesting {} completion from {}", request.model, self.endpoint);
            let response = self
                .http
                .post(&self.endpoint)
                .header("x-api-key", key)
                .header("anthropic-version", API_VERSION)
                .json(&Body::for_request(&request))
                .send()
                .await?;
            let status = response.status();
            let raw = response.text().await?;
            decode(status, &raw)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_carries_system_prompt_and_one_user_turn() {
        let request =
            CompletionRequest { model: "m".into(), prompt: "test this".into(), max_tokens: 64 };
        let value = serde_json::to_value(Body::for_request(&request)).unwrap();
        assert_eq!(value["system"], SYSTEM_PROMPT);
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "test this");
        assert_eq!(value["max_tokens"], 64);
    }

    #[test]
    fn decode_keeps_only_text_blocks() {
        let raw = r#"{
            "content": [
                {"type": "thinking", "thinking": "hmm"},
                {"type": "text", "text": "```ts\n"},
                {"type": "text", "text": "test()\n```"}
            ],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 12, "output_tokens": 7}
        }"#;
        let reply = decode(StatusCode::OK, raw).unwrap();
        assert_eq!(reply.text, "```ts\ntest()\n```");
        assert_eq!((reply.prompt_tokens, reply.completion_tokens), (12, 7));
    }

    #[test]
    fn decode_reports_api_errors_with_type() {
        let raw = r#"{"type": "error", "error": {"type": "overloaded_error", "message": "busy"}}"#;
        let err = decode(StatusCode::from_u16(529).unwrap(), raw).unwrap_err();
        assert_eq!(err.to_string(), "messages API returned 529: overloaded_error: busy");

        let err = decode(StatusCode::BAD_GATEWAY, "upstream down\n").unwrap_err();
        assert_eq!(err.to_string(), "messages API returned 502: upstream down");
    }

    #[test]
    fn decode_rejects_replies_without_text() {
        let raw = r#"{"content": [], "usage": {"input_tokens": 1, "output_tokens": 0}}"#;
        assert!(decode(StatusCode::OK, raw).is_err());
    }

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let client = LiveLlmClient::with_base_url("http://localhost:8080/");
        assert_eq!(client.endpoint, "http://localhost:8080/v1/messages");
    }
}
