//! Deterministic provider that replays a fixed sequence of model turns.
//!
//! Coordinator and sub-agents run strictly one after another, so a single
//! shared queue is consumed in exactly the order the agents ask for turns.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::LlmError;
use crate::llm::provider::{
    ChatMessage, LlmProvider, ToolCall, ToolCompletionRequest, ToolCompletionResponse,
};

/// Replays queued responses and records every request it receives.
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<ToolCompletionResponse>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedProvider {
    pub fn new(responses: impl IntoIterator<Item = ToolCompletionResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Conversations seen so far, one entry per model turn.
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

/// Build a tool call with a fresh id.
pub fn call(name: &str, arguments: serde_json::Value) -> ToolCall {
    ToolCall {
        id: format!("call_{}", Uuid::new_v4().simple()),
        name: name.to_string(),
        arguments,
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn complete_with_tools(
        &self,
        req: ToolCompletionRequest,
    ) -> Result<ToolCompletionResponse, LlmError> {
        let served = {
            let mut requests = self.requests.lock().map_err(|_| LlmError::InvalidResponse {
                provider: "scripted".to_string(),
                reason: "request log poisoned".to_string(),
            })?;
            requests.push(req.messages);
            requests.len() - 1
        };

        let mut responses = self.responses.lock().map_err(|_| LlmError::InvalidResponse {
            provider: "scripted".to_string(),
            reason: "response queue poisoned".to_string(),
        })?;
        responses
            .pop_front()
            .ok_or(LlmError::ScriptExhausted { served })
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// The offline walkthrough used by `courier run --offline`.
///
/// Reads the latest email, plans, delegates research, drafts the reply, and
/// finishes, touching every delegation path on the way.
pub fn demo_script() -> Vec<ToolCompletionResponse> {
    use serde_json::json;

    vec![
        // coordinator
        ToolCompletionResponse::tool_calls(vec![call("read_latest_email", json!({}))]),
        ToolCompletionResponse::tool_calls(vec![call(
            "write_todos",
            json!({"todos": [
                {"content": "Read and analyze the email", "status": "completed"},
                {"content": "Research the sender's topic", "status": "in_progress"},
                {"content": "Draft the response", "status": "pending"}
            ]}),
        )]),
        ToolCompletionResponse::tool_calls(vec![call(
            "task",
            json!({
                "description": "Research scalability challenges in production LLM multi-agent \
                                deployments and save a short summary to research_summary.md",
                "subagent_type": "research-agent"
            }),
        )]),
        // research-agent
        ToolCompletionResponse::tool_calls(vec![call(
            "web_search",
            json!({"query": "multi-agent scalability"}),
        )]),
        ToolCompletionResponse::tool_calls(vec![call(
            "write_file",
            json!({
                "file_path": "research_summary.md",
                "content": "# Research summary\n\nContext isolation keeps sub-agent prompts small \
                            and limits cross-task interference in multi-agent systems.\n"
            }),
        )]),
        ToolCompletionResponse::text(
            "Saved two search results and research_summary.md. Key point: context isolation \
             reduces prompt growth across delegated tasks.",
        ),
        // coordinator
        ToolCompletionResponse::tool_calls(vec![call(
            "write_email_draft",
            json!({
                "draft_content": "Hi Sarah,\n\nThank you for reaching out. I would be glad to \
                                  discuss a collaboration on scalability challenges in production \
                                  agent deployments. Could you share a few times that work for a \
                                  short call next week?\n\nBest regards"
            }),
        )]),
        ToolCompletionResponse::tool_calls(vec![call(
            "write_todos",
            json!({"todos": [
                {"content": "Read and analyze the email", "status": "completed"},
                {"content": "Research the sender's topic", "status": "completed"},
                {"content": "Draft the response", "status": "completed"}
            ]}),
        )]),
        ToolCompletionResponse::text("The reply to Sarah Smith is drafted and ready for review."),
    ]
}
