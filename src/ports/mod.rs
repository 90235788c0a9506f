//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the application core and an
//! external system (filesystem, LLM, shell). Implementations live in
//! `src/adapters/`.

pub mod filesystem;
pub mod llm;
pub mod shell;

pub use filesystem::FileSystem;
pub use llm::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient};
pub use shell::{ShellExecutor, ShellOutput};

/// Error type returned by the LLM and shell ports.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;
