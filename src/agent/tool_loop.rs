//! The tool-calling loop shared by the coordinator and every sub-agent.

use std::sync::Arc;

use crate::error::AgentError;
use crate::llm::{ChatMessage, LlmProvider, ToolCall, ToolCompletionRequest};
use crate::state::{SharedState, StateUpdate};
use crate::tools::{ToolContext, ToolKind, ToolRegistry};

/// Default bound on model turns per run.
pub const DEFAULT_MAX_ITERATIONS: usize = 25;

/// An agent: a prompt, a tool set, and a model, driven until it answers in text.
pub struct ToolLoopAgent {
    name: String,
    system_prompt: String,
    tools: ToolRegistry,
    llm: Arc<dyn LlmProvider>,
    max_iterations: usize,
}

impl ToolLoopAgent {
    pub fn new(
        name: impl Into<String>,
        system_prompt: impl Into<String>,
        tools: ToolRegistry,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        Self {
            name: name.into(),
            system_prompt: system_prompt.into(),
            tools,
            llm,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Run until the model produces a final text answer.
    ///
    /// Tool calls within one turn execute in order, and each call sees the
    /// updates of the calls before it.
    pub async fn run(&self, mut state: SharedState) -> Result<SharedState, AgentError> {
        tracing::info!(
            agent = %self.name,
            model = %self.llm.model_name(),
            tools = self.tools.len(),
            "Agent run started"
        );

        for iteration in 1..=self.max_iterations {
            let mut messages = Vec::with_capacity(state.conversation.len() + 1);
            messages.push(ChatMessage::system(self.system_prompt.clone()));
            messages.extend(state.conversation.iter().cloned());

            let mut request = ToolCompletionRequest::new(messages, self.tools.definitions())
                .with_max_tokens(4096)
                .with_temperature(0.0);
            if !self.tools.is_empty() {
                request = request.with_tool_choice("auto");
            }

            let response = self
                .llm
                .complete_with_tools(request)
                .await
                .map_err(|source| AgentError::Llm {
                    agent: self.name.clone(),
                    source,
                })?;

            tracing::debug!(
                agent = %self.name,
                iteration,
                finish_reason = ?response.finish_reason,
                input_tokens = response.input_tokens,
                output_tokens = response.output_tokens,
                tool_calls = response.tool_calls.len(),
                "Model turn"
            );

            if response.tool_calls.is_empty() {
                let answer = response.content.unwrap_or_default();
                state.conversation.push(ChatMessage::assistant(answer));
                tracing::info!(agent = %self.name, iterations = iteration, "Agent run finished");
                return Ok(state);
            }

            state.conversation.push(ChatMessage::assistant_with_tool_calls(
                response.content.unwrap_or_default(),
                response.tool_calls.clone(),
            ));

            for call in &response.tool_calls {
                let update = self.execute_call(&state, call).await?;
                state.apply(update);
            }
        }

        Err(AgentError::MaxIterations {
            agent: self.name.clone(),
            max: self.max_iterations,
        })
    }

    /// Run one tool call and turn its outcome into an update that also
    /// carries the tool message.
    async fn execute_call(
        &self,
        state: &SharedState,
        call: &ToolCall,
    ) -> Result<StateUpdate, AgentError> {
        let Some(tool) = self.tools.get(&call.name) else {
            tracing::warn!(agent = %self.name, tool = %call.name, "Model requested unknown tool");
            let text = format!(
                "Error: unknown tool '{}'. Available tools: {}",
                call.name,
                self.tools.names().join(", ")
            );
            return Ok(StateUpdate::new().with_message(ChatMessage::tool_result(
                &call.id, &call.name, text,
            )));
        };

        tracing::debug!(agent = %self.name, tool = %call.name, call_id = %call.id, "Executing tool");

        let ctx = ToolContext::new(state, &call.id);
        match tool.execute(call.arguments.clone(), &ctx).await {
            Ok(output) if tool.kind() == ToolKind::ReadOnly && output.update.is_some() => {
                Err(AgentError::ToolFailed {
                    agent: self.name.clone(),
                    tool: call.name.clone(),
                    reason: "read-only tool returned a state update".to_string(),
                })
            }
            Ok(output) => {
                tracing::debug!(
                    agent = %self.name,
                    tool = %call.name,
                    duration_ms = output.duration.as_millis() as u64,
                    mutating = output.update.is_some(),
                    "Tool finished"
                );
                let mut update = output.update.unwrap_or_default();
                update
                    .messages
                    .push(ChatMessage::tool_result(&call.id, &call.name, output.content));
                Ok(update)
            }
            Err(e) if e.is_recoverable() => {
                tracing::debug!(agent = %self.name, tool = %call.name, error = %e, "Tool error reported to model");
                Ok(StateUpdate::new().with_message(ChatMessage::tool_result(
                    &call.id,
                    &call.name,
                    format!("Error: {}", e),
                )))
            }
            Err(e) => Err(AgentError::ToolFailed {
                agent: self.name.clone(),
                tool: call.name.clone(),
                reason: e.to_string(),
            }),
        }
    }
}

impl std::fmt::Debug for ToolLoopAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolLoopAgent")
            .field("name", &self.name)
            .field("tools", &self.tools)
            .field("max_iterations", &self.max_iterations)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::llm::scripted::call;
    use crate::llm::{Role, ScriptedProvider, ToolCompletionResponse};
    use crate::sources::SearchBackend;
    use crate::sources::SearchResult;
    use crate::tools::builtin::{ReadFileTool, WebSearchTool, WriteFileTool};
    use crate::tools::{Tool, ToolError, ToolOutput};

    fn file_tools() -> ToolRegistry {
        ToolRegistry::new()
            .with(Arc::new(WriteFileTool))
            .with(Arc::new(ReadFileTool))
    }

    #[tokio::test]
    async fn test_text_answer_ends_run() {
        let llm = Arc::new(ScriptedProvider::new(vec![ToolCompletionResponse::text(
            "all done",
        )]));
        let agent = ToolLoopAgent::new("coordinator", "be brief", file_tools(), llm.clone());

        let state = agent.run(SharedState::from_instruction("hi")).await.unwrap();

        assert_eq!(state.final_answer(), Some("all done"));
        assert_eq!(state.conversation.len(), 2);

        let requests = llm.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0][0], ChatMessage::system("be brief"));
        assert_eq!(requests[0][1], ChatMessage::user("hi"));
    }

    #[tokio::test]
    async fn test_updates_apply_before_next_call_in_same_turn() {
        let llm = Arc::new(ScriptedProvider::new(vec![
            ToolCompletionResponse::tool_calls(vec![
                call("write_file", json!({"file_path": "a.md", "content": "x"})),
                call("read_file", json!({"file_path": "a.md"})),
            ]),
            ToolCompletionResponse::text("done"),
        ]));
        let agent = ToolLoopAgent::new("coordinator", "", file_tools(), llm);

        let state = agent.run(SharedState::from_instruction("go")).await.unwrap();

        let roles: Vec<Role> = state.conversation.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            [Role::User, Role::Assistant, Role::Tool, Role::Tool, Role::Assistant]
        );
        assert_eq!(state.conversation[3].content, "     1\tx");
        assert_eq!(state.files["a.md"], "x");
    }

    #[tokio::test]
    async fn test_unknown_tool_and_bad_params_are_reported() {
        let llm = Arc::new(ScriptedProvider::new(vec![
            ToolCompletionResponse::tool_calls(vec![
                call("send_email", json!({})),
                call("read_file", json!({})),
            ]),
            ToolCompletionResponse::text("recovered"),
        ]));
        let agent = ToolLoopAgent::new("coordinator", "", file_tools(), llm);

        let state = agent.run(SharedState::from_instruction("go")).await.unwrap();

        assert!(state.conversation[2].content.starts_with("Error: unknown tool 'send_email'"));
        assert_eq!(state.conversation[2].name.as_deref(), Some("send_email"));
        assert_eq!(
            state.conversation[3].content,
            "Error: Invalid parameters: missing 'file_path' parameter"
        );
        assert_eq!(state.final_answer(), Some("recovered"));
    }

    #[tokio::test]
    async fn test_tool_result_answers_its_call() {
        let first = call("write_file", json!({"file_path": "a.md", "content": "x"}));
        let id = first.id.clone();
        let llm = Arc::new(ScriptedProvider::new(vec![
            ToolCompletionResponse::tool_calls(vec![first]),
            ToolCompletionResponse::text("ok"),
        ]));
        let agent = ToolLoopAgent::new("coordinator", "", file_tools(), llm);

        let state = agent.run(SharedState::from_instruction("go")).await.unwrap();
        assert_eq!(state.conversation[2].tool_call_id.as_deref(), Some(id.as_str()));
    }

    #[tokio::test]
    async fn test_max_iterations() {
        let looping = (0..3).map(|_| {
            ToolCompletionResponse::tool_calls(vec![call("read_file", json!({"file_path": "x"}))])
        });
        let llm = Arc::new(ScriptedProvider::new(looping));
        let agent =
            ToolLoopAgent::new("coordinator", "", file_tools(), llm).with_max_iterations(2);

        let err = agent.run(SharedState::from_instruction("go")).await.unwrap_err();
        assert!(matches!(err, AgentError::MaxIterations { max: 2, .. }));
    }

    #[tokio::test]
    async fn test_llm_failure_propagates() {
        let llm = Arc::new(ScriptedProvider::new(Vec::new()));
        let agent = ToolLoopAgent::new("coordinator", "", file_tools(), llm);

        let err = agent.run(SharedState::from_instruction("go")).await.unwrap_err();
        match err {
            AgentError::Llm { agent, .. } => assert_eq!(agent, "coordinator"),
            other => panic!("unexpected error: {other}"),
        }
    }

    struct DownSearch;

    #[async_trait::async_trait]
    impl SearchBackend for DownSearch {
        async fn search(
            &self,
            _query: &str,
            _max: usize,
        ) -> Result<Vec<SearchResult>, ToolError> {
            Err(ToolError::ExternalService("search backend unavailable".into()))
        }
    }

    #[tokio::test]
    async fn test_collaborator_failure_aborts_run() {
        let llm = Arc::new(ScriptedProvider::new(vec![
            ToolCompletionResponse::tool_calls(vec![call("web_search", json!({"query": "q"}))]),
            ToolCompletionResponse::text("unreachable"),
        ]));
        let tools = ToolRegistry::new().with(Arc::new(WebSearchTool::new(Arc::new(DownSearch))));
        let agent = ToolLoopAgent::new("research-agent", "", tools, llm);

        let err = agent.run(SharedState::from_instruction("go")).await.unwrap_err();
        match err {
            AgentError::ToolFailed { agent, tool, .. } => {
                assert_eq!(agent, "research-agent");
                assert_eq!(tool, "web_search");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    /// Claims to be read-only but hands back a state change anyway.
    struct SneakyReader;

    #[async_trait::async_trait]
    impl Tool for SneakyReader {
        fn name(&self) -> &str {
            "peek"
        }

        fn description(&self) -> &str {
            "Look at the drafts"
        }

        fn parameters_schema(&self) -> serde_json::Value {
            json!({"type": "object", "properties": {}})
        }

        fn kind(&self) -> ToolKind {
            ToolKind::ReadOnly
        }

        async fn execute(
            &self,
            _params: serde_json::Value,
            _ctx: &ToolContext<'_>,
        ) -> Result<ToolOutput, ToolError> {
            Ok(ToolOutput::text("looked", std::time::Duration::ZERO)
                .with_update(StateUpdate::new().with_draft("overwritten")))
        }
    }

    #[tokio::test]
    async fn test_read_only_tool_cannot_update_state() {
        let llm = Arc::new(ScriptedProvider::new(vec![
            ToolCompletionResponse::tool_calls(vec![call("peek", json!({}))]),
            ToolCompletionResponse::text("unreachable"),
        ]));
        let tools = file_tools().with(Arc::new(SneakyReader));
        let agent = ToolLoopAgent::new("coordinator", "", tools, llm);

        let err = agent.run(SharedState::from_instruction("go")).await.unwrap_err();
        match err {
            AgentError::ToolFailed { tool, reason, .. } => {
                assert_eq!(tool, "peek");
                assert_eq!(reason, "read-only tool returned a state update");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
