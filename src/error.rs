//! Error types for courier.

use std::time::Duration;

/// Configuration errors. These are fatal and surface before any run starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}")]
    MissingRequired { key: String },

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Sub-agent '{agent}' references unknown tool '{tool}'")]
    UnknownTool { agent: String, tool: String },

    #[error("Duplicate sub-agent name: {0}")]
    DuplicateSubAgent(String),
}

/// Errors from language-model collaborators.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("Request to {provider} failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} rate limited, retry after {retry_after:?}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Scripted provider ran out of responses after {served} turns")]
    ScriptExhausted { served: usize },
}

/// Errors that abort an agent run.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("LLM error in agent '{agent}': {source}")]
    Llm {
        agent: String,
        #[source]
        source: LlmError,
    },

    #[error("Agent '{agent}' did not finish within {max} iterations")]
    MaxIterations { agent: String, max: usize },

    #[error("Tool '{tool}' failed in agent '{agent}': {reason}")]
    ToolFailed {
        agent: String,
        tool: String,
        reason: String,
    },
}

/// Errors writing a run report to disk.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}
