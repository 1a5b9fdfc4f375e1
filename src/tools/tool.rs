//! Tool trait and types.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::ToolDefinition;
use crate::state::{SharedState, StateUpdate};

/// Error type for tool execution.
///
/// `InvalidParameters` and `ExecutionFailed` are reported back to the model
/// as text and the run continues. The others abort the run.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Sub-agent '{agent}' failed: {reason}")]
    SubAgent { agent: String, reason: String },
}

impl ToolError {
    /// Whether the model should see this error and keep going.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ToolError::InvalidParameters(_) | ToolError::ExecutionFailed(_)
        )
    }
}

/// Whether a tool can change shared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolKind {
    /// Only reads state; output is text.
    ReadOnly,
    /// May return a [`StateUpdate`].
    Mutating,
}

/// Inputs the runtime supplies instead of the model.
#[derive(Debug, Clone, Copy)]
pub struct ToolContext<'a> {
    /// State as of this call, including every earlier update.
    pub state: &'a SharedState,
    /// Id of the model's tool call.
    pub call_id: &'a str,
}

impl<'a> ToolContext<'a> {
    pub fn new(state: &'a SharedState, call_id: &'a str) -> Self {
        Self { state, call_id }
    }
}

/// Output from a tool execution.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Text returned to the model as the tool message.
    pub content: String,
    /// State change to fold in before the next tool runs.
    pub update: Option<StateUpdate>,
    /// Time taken.
    pub duration: Duration,
}

impl ToolOutput {
    /// Informational output with no state effect.
    pub fn text(content: impl Into<String>, duration: Duration) -> Self {
        Self {
            content: content.into(),
            update: None,
            duration,
        }
    }

    /// Attach a state update.
    pub fn with_update(mut self, update: StateUpdate) -> Self {
        self.update = Some(update);
        self
    }
}

/// Definition of a tool's parameters using JSON Schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl From<ToolSchema> for ToolDefinition {
    fn from(schema: ToolSchema) -> Self {
        ToolDefinition {
            name: schema.name,
            description: schema.description,
            parameters: schema.parameters,
        }
    }
}

/// Trait for tools that the agent can use.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool name.
    fn name(&self) -> &str;

    /// Get a description of what the tool does.
    fn description(&self) -> &str;

    /// Get the JSON Schema for the tool's model-supplied parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Read-only or state-mutating.
    fn kind(&self) -> ToolKind;

    /// Execute the tool with the given parameters.
    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: &ToolContext<'_>,
    ) -> Result<ToolOutput, ToolError>;

    /// Get the tool schema for LLM function calling.
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// Fetch a required string parameter.
pub(crate) fn require_str<'a>(
    params: &'a serde_json::Value,
    key: &str,
) -> Result<&'a str, ToolError> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ToolError::InvalidParameters(format!("missing '{}' parameter", key)))
}

/// Fetch an optional non-negative integer parameter.
pub(crate) fn optional_usize(
    params: &serde_json::Value,
    key: &str,
    default: usize,
) -> Result<usize, ToolError> {
    match params.get(key) {
        None | Some(serde_json::Value::Null) => Ok(default),
        Some(v) => v.as_u64().map(|n| n as usize).ok_or_else(|| {
            ToolError::InvalidParameters(format!("'{}' must be a non-negative integer", key))
        }),
    }
}
