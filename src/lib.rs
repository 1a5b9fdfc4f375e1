//! courier: an email assistant whose coordinator delegates research and
//! drafting to sub-agents running in an isolated context.
//!
//! A run threads one [`state::SharedState`] through the coordinator's tool
//! loop. Tools return [`state::StateUpdate`]s that the loop folds in, with
//! virtual file tables merged by [`state::merge_files`]. Sub-agents work on a
//! private copy and hand back only their files and a final answer.

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod sources;
pub mod state;
pub mod tools;

pub use config::Config;
pub use error::{AgentError, ConfigError, LlmError};
