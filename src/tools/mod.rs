//! Tool system.
//!
//! Tools are the agent's interface to its inbox, the web, and the shared
//! state. They never mutate state directly: a tool returns a
//! [`StateUpdate`](crate::state::StateUpdate) and the agent loop applies it.

pub mod builtin;

mod registry;
mod tool;

pub use registry::ToolRegistry;
pub use tool::{Tool, ToolContext, ToolError, ToolKind, ToolOutput, ToolSchema};
pub(crate) use tool::require_str;
