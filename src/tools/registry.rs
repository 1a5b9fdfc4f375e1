//! Name-indexed tool registry.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::llm::ToolDefinition;
use crate::tools::tool::Tool;

/// Tools available to one agent, in registration order.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool. A tool with the same name replaces the earlier one.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_some() {
            tracing::warn!(tool = %name, "Replacing already registered tool");
        } else {
            self.order.push(name);
        }
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Tool names in registration order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Definitions handed to the model.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| tool.schema().into())
            .collect()
    }

    /// A registry restricted to `names`, in the order given.
    ///
    /// Any unknown name is a configuration error attributed to `agent`.
    pub fn subset<S: AsRef<str>>(&self, agent: &str, names: &[S]) -> Result<Self, ConfigError> {
        let mut restricted = Self::new();
        for name in names {
            let name = name.as_ref();
            let tool = self.get(name).ok_or_else(|| ConfigError::UnknownTool {
                agent: agent.to_string(),
                tool: name.to_string(),
            })?;
            restricted.register(tool);
        }
        Ok(restricted)
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.order)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::{ListFilesTool, ReadFileTool, ThinkTool};

    fn registry() -> ToolRegistry {
        ToolRegistry::new()
            .with(Arc::new(ThinkTool))
            .with(Arc::new(ListFilesTool))
            .with(Arc::new(ReadFileTool))
    }

    #[test]
    fn test_registration_order_and_definitions() {
        let registry = registry();
        assert_eq!(registry.names(), ["think_tool", "ls", "read_file"]);

        let defs = registry.definitions();
        assert_eq!(defs.len(), 3);
        assert_eq!(defs[2].name, "read_file");
        assert_eq!(defs[2].parameters["required"][0], "file_path");
    }

    #[test]
    fn test_subset_keeps_requested_order() {
        let subset = registry().subset("research-agent", &["read_file", "ls"]).unwrap();
        assert_eq!(subset.names(), ["read_file", "ls"]);
        assert!(!subset.contains("think_tool"));
    }

    #[test]
    fn test_subset_unknown_tool_is_config_error() {
        let err = registry()
            .subset("response-agent", &["ls", "send_email"])
            .unwrap_err();
        match err {
            ConfigError::UnknownTool { agent, tool } => {
                assert_eq!(agent, "response-agent");
                assert_eq!(tool, "send_email");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_reregistering_replaces_without_duplicating() {
        let mut registry = registry();
        registry.register(Arc::new(ThinkTool));
        assert_eq!(registry.len(), 3);
    }
}
