//! LLM integration for the agent.
//!
//! Two backends:
//! - **OpenAI-compatible** chat completions over HTTP (API key auth)
//! - **Scripted**: replays a fixed sequence of turns, for offline runs and tests

mod openai;
mod provider;
pub mod scripted;

pub use openai::OpenAiChatProvider;
pub use provider::{
    ChatMessage, FinishReason, LlmProvider, Role, ToolCall, ToolCompletionRequest,
    ToolCompletionResponse, ToolDefinition,
};
pub use scripted::ScriptedProvider;

use std::sync::Arc;

use crate::config::{LlmBackend, LlmConfig};
use crate::error::LlmError;

/// Create an LLM provider based on configuration.
pub fn create_llm_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    match config.backend {
        LlmBackend::OpenAi => {
            tracing::info!(model = %config.model, "Using OpenAI-compatible chat completions API");
            Ok(Arc::new(OpenAiChatProvider::new(config)?))
        }
        LlmBackend::Scripted => {
            tracing::info!("Using scripted offline provider");
            Ok(Arc::new(ScriptedProvider::new(scripted::demo_script())))
        }
    }
}
