//! Agent runtime.
//!
//! - [`ToolLoopAgent`] drives one agent: model turn, tool calls, repeat
//! - [`TaskTool`] delegates to sub-agents in an isolated context
//! - [`email`] assembles the email workflow and its report

pub mod email;
pub mod prompts;
mod subagent;
mod tool_loop;

pub use email::{
    DEFAULT_INSTRUCTION, ReportExport, RunReport, build_email_agent, build_email_agent_with,
    email_subagents, process_email,
};
pub use subagent::{SubAgentSpec, TaskTool};
pub use tool_loop::{DEFAULT_MAX_ITERATIONS, ToolLoopAgent};
