//! Delegation to sub-agents that run in an isolated context.
//!
//! A sub-agent sees a copy of the parent's artifacts but only the task
//! description as its conversation. When it finishes, its file table and its
//! final answer are the only things handed back.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use crate::agent::tool_loop::ToolLoopAgent;
use crate::config::AgentConfig;
use crate::error::ConfigError;
use crate::llm::LlmProvider;
use crate::state::{SharedState, StateUpdate};
use crate::tools::require_str;
use crate::tools::{Tool, ToolContext, ToolError, ToolKind, ToolOutput, ToolRegistry};

/// Declaration of a sub-agent.
#[derive(Debug, Clone)]
pub struct SubAgentSpec {
    pub name: String,
    /// Shown to the coordinator in the `task` tool description.
    pub description: String,
    pub prompt: String,
    /// Names from the base registry. `None` gives the sub-agent every base tool.
    pub tools: Option<Vec<String>>,
}

impl SubAgentSpec {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            prompt: prompt.into(),
            tools: None,
        }
    }

    pub fn with_tools<S: Into<String>>(mut self, tools: impl IntoIterator<Item = S>) -> Self {
        self.tools = Some(tools.into_iter().map(Into::into).collect());
        self
    }
}

/// The `task` tool.
pub struct TaskTool {
    agents: Vec<ToolLoopAgent>,
    description: String,
}

impl TaskTool {
    /// Resolve every spec against `base`. Unknown tool names and repeated
    /// agent names are configuration errors.
    pub fn new(
        specs: Vec<SubAgentSpec>,
        base: &ToolRegistry,
        llm: Arc<dyn LlmProvider>,
        config: &AgentConfig,
    ) -> Result<Self, ConfigError> {
        let mut agents: Vec<ToolLoopAgent> = Vec::with_capacity(specs.len());
        let mut listing = Vec::with_capacity(specs.len());

        for spec in specs {
            if agents.iter().any(|a| a.name() == spec.name) {
                return Err(ConfigError::DuplicateSubAgent(spec.name));
            }
            let tools = match &spec.tools {
                Some(names) => base.subset(&spec.name, names.as_slice())?,
                None => base.clone(),
            };
            listing.push(format!("- {}: {}", spec.name, spec.description));
            agents.push(
                ToolLoopAgent::new(spec.name, spec.prompt, tools, Arc::clone(&llm))
                    .with_max_iterations(config.max_iterations),
            );
        }

        let description = format!(
            "Delegate a task to a specialized sub-agent with isolated context.\n\n\
             Available agents:\n{}\n\n\
             The sub-agent starts with a clean conversation holding only your task \
             description, so give complete, standalone instructions.",
            listing.join("\n")
        );

        Ok(Self {
            agents,
            description,
        })
    }

    /// Names of the registered sub-agents, in declaration order.
    pub fn agent_names(&self) -> Vec<&str> {
        self.agents.iter().map(|a| a.name()).collect()
    }

    /// Run `subagent_type` on `description` against a private copy of
    /// `parent`.
    pub async fn delegate(
        &self,
        description: &str,
        subagent_type: &str,
        parent: &SharedState,
    ) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();

        let Some(agent) = self.agents.iter().find(|a| a.name() == subagent_type) else {
            let allowed: Vec<String> = self
                .agents
                .iter()
                .map(|a| format!("`{}`", a.name()))
                .collect();
            return Ok(ToolOutput::text(
                format!(
                    "Error: invoked agent of type {}, the only allowed types are [{}]",
                    subagent_type,
                    allowed.join(", ")
                ),
                start.elapsed(),
            ));
        };

        tracing::info!(agent = %subagent_type, "Delegating task to sub-agent");

        let finished = agent
            .run(parent.isolated(description))
            .await
            .map_err(|e| ToolError::SubAgent {
                agent: subagent_type.to_string(),
                reason: e.to_string(),
            })?;

        let answer = finished.final_answer().unwrap_or_default().to_string();
        let SharedState { files, .. } = finished;

        tracing::debug!(agent = %subagent_type, files = files.len(), "Sub-agent finished");

        Ok(ToolOutput::text(answer, start.elapsed())
            .with_update(StateUpdate::new().with_files(files)))
    }
}

#[async_trait]
impl Tool for TaskTool {
    fn name(&self) -> &str {
        "task"
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "description": {
                    "type": "string",
                    "description": "Clear, complete description of the task"
                },
                "subagent_type": {
                    "type": "string",
                    "description": "Which sub-agent to use",
                    "enum": self.agent_names()
                }
            },
            "required": ["description", "subagent_type"]
        })
    }

    fn kind(&self) -> ToolKind {
        ToolKind::Mutating
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: &ToolContext<'_>,
    ) -> Result<ToolOutput, ToolError> {
        let description = require_str(&params, "description")?;
        let subagent_type = require_str(&params, "subagent_type")?;
        self.delegate(description, subagent_type, ctx.state).await
    }
}

impl std::fmt::Debug for TaskTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskTool")
            .field("agents", &self.agent_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::llm::scripted::call;
    use crate::llm::{ChatMessage, Role, ScriptedProvider, ToolCompletionResponse};
    use crate::sources::MockInbox;
    use crate::state::{Todo, TodoStatus};
    use crate::tools::builtin::{
        ListFilesTool, ReadFileTool, ReadLatestEmailTool, ThinkTool, WriteEmailDraftTool,
        WriteFileTool, WriteTodosTool,
    };

    fn base() -> ToolRegistry {
        ToolRegistry::new()
            .with(Arc::new(WriteEmailDraftTool))
            .with(Arc::new(ListFilesTool))
            .with(Arc::new(ReadFileTool))
            .with(Arc::new(WriteFileTool))
            .with(Arc::new(ThinkTool))
            .with(Arc::new(WriteTodosTool))
    }

    fn specs() -> Vec<SubAgentSpec> {
        vec![
            SubAgentSpec::new("research-agent", "Gathers information", "research")
                .with_tools(["write_file", "write_todos", "think_tool"]),
            SubAgentSpec::new("response-agent", "Writes replies", "respond")
                .with_tools(["ls", "read_file"]),
        ]
    }

    fn task_tool(llm: Arc<ScriptedProvider>) -> TaskTool {
        TaskTool::new(specs(), &base(), llm, &AgentConfig::default()).unwrap()
    }

    fn parent_state() -> SharedState {
        let mut state = SharedState::from_instruction("process the latest email");
        state.conversation.push(ChatMessage::assistant("planning"));
        state.draft = Some("parent draft".into());
        state.todos = vec![Todo::new("parent step", TodoStatus::InProgress)];
        state.files.insert("notes.md".into(), "parent notes".into());
        state
    }

    #[tokio::test]
    async fn test_unknown_agent_type() {
        let llm = Arc::new(ScriptedProvider::new(Vec::new()));
        let tool = task_tool(llm.clone());

        let out = tool
            .delegate("do it", "billing-agent", &parent_state())
            .await
            .unwrap();

        assert_eq!(
            out.content,
            "Error: invoked agent of type billing-agent, the only allowed types are \
             [`research-agent`, `response-agent`]"
        );
        assert!(out.update.is_none());
        assert!(llm.requests().is_empty());
    }

    #[tokio::test]
    async fn test_only_files_and_answer_cross_back() {
        let llm = Arc::new(ScriptedProvider::new(vec![
            ToolCompletionResponse::tool_calls(vec![
                call(
                    "write_todos",
                    json!({"todos": [{"content": "child step", "status": "pending"}]}),
                ),
                call(
                    "write_file",
                    json!({"file_path": "findings.md", "content": "facts"}),
                ),
            ]),
            ToolCompletionResponse::text("Summary of findings"),
        ]));
        let tool = task_tool(llm.clone());
        let parent = parent_state();

        let out = tool
            .delegate("research the topic", "research-agent", &parent)
            .await
            .unwrap();

        assert_eq!(out.content, "Summary of findings");
        let update = out.update.unwrap();
        assert!(update.todos.is_none());
        assert!(update.draft.is_none());
        assert!(update.current_email.is_none());
        assert!(update.messages.is_empty());

        let files = update.files.unwrap();
        assert_eq!(files["notes.md"], "parent notes");
        assert_eq!(files["findings.md"], "facts");

        // the sub-agent only ever saw its task description
        let first = &llm.requests()[0];
        assert_eq!(
            first.as_slice(),
            [
                ChatMessage::system("research"),
                ChatMessage::user("research the topic")
            ]
        );
    }

    #[tokio::test]
    async fn test_delegation_through_parent_loop() {
        let llm = Arc::new(ScriptedProvider::new(vec![
            // coordinator
            ToolCompletionResponse::tool_calls(vec![call(
                "task",
                json!({"description": "write notes", "subagent_type": "research-agent"}),
            )]),
            // research-agent
            ToolCompletionResponse::tool_calls(vec![call(
                "write_file",
                json!({"file_path": "child.md", "content": "c"}),
            )]),
            ToolCompletionResponse::text("notes written"),
            // coordinator
            ToolCompletionResponse::text("finished"),
        ]));
        let task = task_tool(llm.clone());
        let coordinator = ToolLoopAgent::new(
            "coordinator",
            "coordinate",
            base().with(Arc::new(task)),
            llm,
        );
        let parent = parent_state();
        let before = parent.conversation.clone();

        let state = coordinator.run(parent).await.unwrap();
        assert_eq!(state.conversation[..before.len()], before[..]);

        let tool_messages: Vec<&ChatMessage> = state
            .conversation
            .iter()
            .filter(|m| m.role == Role::Tool)
            .collect();
        assert_eq!(tool_messages.len(), 1);
        assert_eq!(tool_messages[0].content, "notes written");
        assert_eq!(tool_messages[0].name.as_deref(), Some("task"));
        // assistant call + tool result + final answer
        assert_eq!(state.conversation.len(), before.len() + 3);

        assert_eq!(state.files["child.md"], "c");
        assert_eq!(state.files["notes.md"], "parent notes");
        assert_eq!(state.draft.as_deref(), Some("parent draft"));
        assert_eq!(
            state.todos,
            vec![Todo::new("parent step", TodoStatus::InProgress)]
        );
    }

    #[tokio::test]
    async fn test_child_email_and_draft_stay_in_child() {
        let llm = Arc::new(ScriptedProvider::new(vec![
            // coordinator
            ToolCompletionResponse::tool_calls(vec![call(
                "task",
                json!({"description": "draft a reply", "subagent_type": "drafting-agent"}),
            )]),
            // drafting-agent
            ToolCompletionResponse::tool_calls(vec![
                call("read_latest_email", json!({})),
                call("write_email_draft", json!({"draft_content": "Happy to talk."})),
            ]),
            ToolCompletionResponse::text("reply drafted"),
            // coordinator
            ToolCompletionResponse::text("finished"),
        ]));
        let inbox = Arc::new(MockInbox::new());
        let registry = base().with(Arc::new(ReadLatestEmailTool::new(inbox)));
        let specs = vec![
            SubAgentSpec::new("drafting-agent", "Drafts replies", "draft")
                .with_tools(["read_latest_email", "write_email_draft"]),
        ];
        let task = TaskTool::new(specs, &registry, llm.clone(), &AgentConfig::default()).unwrap();
        let coordinator = ToolLoopAgent::new(
            "coordinator",
            "coordinate",
            registry.with(Arc::new(task)),
            llm.clone(),
        );

        let state = coordinator.run(parent_state()).await.unwrap();

        // the child really did load the email and write its own draft
        let child_last = &llm.requests()[2];
        assert!(child_last.iter().any(|m| m.role == Role::Tool
            && m.content.contains("**From:** sarah.smith@startup.io")));
        assert!(child_last.iter().any(|m| m.role == Role::Tool
            && m.content.contains("To: sarah.smith@startup.io")));

        assert_eq!(state.draft.as_deref(), Some("parent draft"));
        assert!(state.current_email.is_none());
        assert_eq!(state.final_answer(), Some("finished"));
    }

    #[tokio::test]
    async fn test_sub_agent_failure_is_not_recoverable() {
        let llm = Arc::new(ScriptedProvider::new(Vec::new()));
        let tool = task_tool(llm);

        let err = tool
            .delegate("anything", "response-agent", &parent_state())
            .await
            .unwrap_err();

        assert!(!err.is_recoverable());
        match err {
            ToolError::SubAgent { agent, .. } => assert_eq!(agent, "response-agent"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_tool_in_spec_fails_construction() {
        let llm = Arc::new(ScriptedProvider::new(Vec::new()));
        let specs = vec![SubAgentSpec::new("research-agent", "d", "p").with_tools(["web_search"])];

        let err = TaskTool::new(specs, &base(), llm, &AgentConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTool { ref tool, .. } if tool == "web_search"));
    }

    #[test]
    fn test_duplicate_agent_name_fails_construction() {
        let llm = Arc::new(ScriptedProvider::new(Vec::new()));
        let specs = vec![
            SubAgentSpec::new("research-agent", "d", "p"),
            SubAgentSpec::new("research-agent", "d", "p"),
        ];

        let err = TaskTool::new(specs, &base(), llm, &AgentConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateSubAgent(name) if name == "research-agent"));
    }

    #[test]
    fn test_description_lists_agents_and_default_tools() {
        let llm = Arc::new(ScriptedProvider::new(Vec::new()));
        let specs = vec![SubAgentSpec::new("generalist", "Does everything", "p")];
        let tool = TaskTool::new(specs, &base(), llm, &AgentConfig::default()).unwrap();

        assert!(tool.description().contains("- generalist: Does everything"));
        assert_eq!(tool.agents[0].tools().len(), base().len());
        assert_eq!(tool.parameters_schema()["properties"]["subagent_type"]["enum"][0], "generalist");
    }
}
