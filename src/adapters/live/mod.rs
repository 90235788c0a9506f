//! Live adapters for real external interactions.

pub mod filesystem;
pub mod llm;
pub mod shell;

pub use filesystem::LiveFileSystem;
pub use llm::LiveLlmClient;
pub use shell::LiveShellExecutor;
