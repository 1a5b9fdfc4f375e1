//! The email-processing workflow: a coordinator with two specialist
//! sub-agents, and the report extracted from a finished run.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::agent::prompts;
use crate::agent::subagent::{SubAgentSpec, TaskTool};
use crate::agent::tool_loop::ToolLoopAgent;
use crate::config::AgentConfig;
use crate::error::{AgentError, ConfigError, ExportError};
use crate::llm::{ChatMessage, LlmProvider};
use crate::sources::{EmailSource, MockInbox, MockSearch, SearchBackend};
use crate::state::{Email, FileTable, SharedState, Todo, render_todos};
use crate::tools::builtin::base_tools;

/// Instruction used when the caller gives none.
pub const DEFAULT_INSTRUCTION: &str =
    "Please process the latest email and compose an appropriate response.";

/// File contents longer than this are cut in the text report.
const REPORT_FILE_PREVIEW_CHARS: usize = 500;

const RULE_WIDTH: usize = 80;

/// The research and response specialists.
pub fn email_subagents() -> Vec<SubAgentSpec> {
    vec![
        SubAgentSpec::new(
            "research-agent",
            "Gather and summarize information from the web",
            prompts::research_prompt(),
        )
        .with_tools(["web_search", "think_tool", "ls", "read_file", "write_file"]),
        SubAgentSpec::new(
            "response-agent",
            "Compose professional email responses",
            prompts::response_prompt(),
        )
        .with_tools([
            "get_email_context",
            "ls",
            "read_file",
            "think_tool",
            "write_file",
        ]),
    ]
}

/// Coordinator over the mock inbox and mock search.
pub fn build_email_agent(
    llm: Arc<dyn LlmProvider>,
    config: &AgentConfig,
) -> Result<ToolLoopAgent, ConfigError> {
    build_email_agent_with(llm, config, Arc::new(MockInbox::new()), Arc::new(MockSearch))
}

/// Coordinator over the given sources.
pub fn build_email_agent_with(
    llm: Arc<dyn LlmProvider>,
    config: &AgentConfig,
    inbox: Arc<dyn EmailSource>,
    search: Arc<dyn SearchBackend>,
) -> Result<ToolLoopAgent, ConfigError> {
    let base = base_tools(inbox, search, config);
    let task = TaskTool::new(email_subagents(), &base, Arc::clone(&llm), config)?;
    let tools = base.with(Arc::new(task));

    Ok(
        ToolLoopAgent::new("coordinator", prompts::coordinator_prompt(), tools, llm)
            .with_max_iterations(config.max_iterations),
    )
}

/// Run one instruction from a fresh state.
pub async fn process_email(
    agent: &ToolLoopAgent,
    instruction: Option<&str>,
) -> Result<RunReport, AgentError> {
    let instruction = instruction.unwrap_or(DEFAULT_INSTRUCTION);
    tracing::info!(instruction, "Processing email");

    let state = agent.run(SharedState::from_instruction(instruction)).await?;
    let report = RunReport::from(state);

    tracing::info!(
        drafted = report.draft.is_some(),
        files = report.files.len(),
        messages = report.messages.len(),
        "Processing complete"
    );
    Ok(report)
}

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub email: Option<Email>,
    pub draft: Option<String>,
    pub files: FileTable,
    pub todos: Vec<Todo>,
    pub messages: Vec<ChatMessage>,
}

/// Serialized form of a [`RunReport`]. The conversation is reduced to its length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportExport {
    pub email: Option<Email>,
    pub draft: Option<String>,
    pub files: FileTable,
    pub todos: Vec<Todo>,
    pub message_count: usize,
}

impl From<SharedState> for RunReport {
    fn from(state: SharedState) -> Self {
        Self {
            email: state.current_email,
            draft: state.draft,
            files: state.files,
            todos: state.todos,
            messages: state.conversation,
        }
    }
}

impl RunReport {
    /// The coordinator's last message.
    pub fn final_answer(&self) -> Option<&str> {
        self.messages.last().map(|m| m.content.as_str())
    }

    /// Human-readable summary of the run.
    pub fn format(&self, show_files: bool) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let thin = "-".repeat(RULE_WIDTH);
        let mut out = vec![rule.clone(), "COURIER EMAIL ASSISTANT - RESULTS".into(), rule.clone()];

        if let Some(email) = &self.email {
            out.push("\n📧 PROCESSED EMAIL:".into());
            out.push(format!("From: {}", email.from_address));
            out.push(format!("Subject: {}", email.subject));
            out.push(format!("Received: {}", email.received_at));
        }

        if let Some(draft) = &self.draft {
            out.push("\n✉️ COMPOSED RESPONSE:".into());
            out.push(thin.clone());
            out.push(draft.clone());
            out.push(thin);
        }

        if !self.todos.is_empty() {
            out.push("\n📋 WORKFLOW TODOS:".into());
            out.extend(render_todos(&self.todos));
        }

        if !self.files.is_empty() {
            out.push(format!("\n📁 GENERATED FILES ({} total):", self.files.len()));
            out.extend(self.files.keys().map(|name| format!("  - {}", name)));

            if show_files {
                out.push("\n📄 FILE CONTENTS:".into());
                for (name, content) in &self.files {
                    out.push(format!("\n--- {} ---", name));
                    if content.chars().count() > REPORT_FILE_PREVIEW_CHARS {
                        let head: String =
                            content.chars().take(REPORT_FILE_PREVIEW_CHARS).collect();
                        out.push(format!("{}...", head));
                    } else {
                        out.push(content.clone());
                    }
                }
            }
        }

        out.push(format!("\n{}", rule));
        out.join("\n")
    }

    pub fn export(&self) -> ReportExport {
        ReportExport {
            email: self.email.clone(),
            draft: self.draft.clone(),
            files: self.files.clone(),
            todos: self.todos.clone(),
            message_count: self.messages.len(),
        }
    }

    /// Write [`export`](Self::export) as pretty JSON.
    pub fn export_to_path(&self, path: &Path) -> Result<(), ExportError> {
        let json = serde_json::to_string_pretty(&self.export())?;
        std::fs::write(path, json)?;
        tracing::info!(path = %path.display(), "Results exported");
        Ok(())
    }
}
