pub mod client;
pub mod provider;

pub use client::MoveClient;
pub use provider::{CompletionProvider, create_provider};

/// Errors from the completion-provider subsystem.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("no API key configured for provider: {0}")]
    MissingApiKey(String),

    /// Network hiccups, rate limits, upstream 5xx. Worth retrying.
    #[error("transient provider failure: {0}")]
    Transient(String),

    /// Auth/quota problems, malformed responses, other 4xx. Not retried.
    #[error("provider failure: {0}")]
    Fatal(String),

    #[error("provider failed after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: String },
}

impl LlmError {
    pub fn is_transient(&self) -> bool {
        matches!(self, LlmError::Transient(_))
    }
}
