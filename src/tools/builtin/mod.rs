//! Built-in tools that come with the agent.

mod email;
mod file;
mod search;
mod think;
mod todo;

pub use email::{GetEmailContextTool, ReadLatestEmailTool, WriteEmailDraftTool, compose_draft};
pub use file::{ListFilesTool, ReadFileTool, WriteFileTool};
pub use search::{WebSearchTool, result_filename};
pub use think::ThinkTool;
pub use todo::{ReadTodosTool, WriteTodosTool};

use std::sync::Arc;

use crate::config::AgentConfig;
use crate::sources::{EmailSource, SearchBackend};
use crate::tools::ToolRegistry;

/// Registry of every built-in tool. Agents take subsets of it.
pub fn base_tools(
    inbox: Arc<dyn EmailSource>,
    search: Arc<dyn SearchBackend>,
    config: &AgentConfig,
) -> ToolRegistry {
    ToolRegistry::new()
        .with(Arc::new(ReadLatestEmailTool::new(inbox)))
        .with(Arc::new(WriteEmailDraftTool))
        .with(Arc::new(GetEmailContextTool))
        .with(Arc::new(ListFilesTool))
        .with(Arc::new(ReadFileTool))
        .with(Arc::new(WriteFileTool))
        .with(Arc::new(
            WebSearchTool::new(search).with_default_max_results(config.search_max_results),
        ))
        .with(Arc::new(ThinkTool))
        .with(Arc::new(WriteTodosTool))
        .with(Arc::new(ReadTodosTool))
}
