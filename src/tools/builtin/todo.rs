//! Planning tools over the shared TODO list.

use std::time::Instant;

use async_trait::async_trait;

use crate::state::{StateUpdate, Todo, render_todos};
use crate::tools::tool::{Tool, ToolContext, ToolError, ToolKind, ToolOutput};

/// Replace the whole TODO list.
#[derive(Debug, Default)]
pub struct WriteTodosTool;

#[async_trait]
impl Tool for WriteTodosTool {
    fn name(&self) -> &str {
        "write_todos"
    }

    fn description(&self) -> &str {
        "Create or update the task plan. Replaces the whole list. Keep exactly one task \
         in_progress at a time and mark tasks completed as soon as they are done."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "todos": {
                    "type": "array",
                    "description": "The complete TODO list",
                    "items": {
                        "type": "object",
                        "properties": {
                            "content": { "type": "string" },
                            "status": {
                                "type": "string",
                                "enum": ["pending", "in_progress", "completed"]
                            }
                        },
                        "required": ["content", "status"]
                    }
                }
            },
            "required": ["todos"]
        })
    }

    fn kind(&self) -> ToolKind {
        ToolKind::Mutating
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        _ctx: &ToolContext<'_>,
    ) -> Result<ToolOutput, ToolError> {
        let raw = params
            .get("todos")
            .cloned()
            .ok_or_else(|| ToolError::InvalidParameters("missing 'todos' parameter".into()))?;
        let todos: Vec<Todo> = serde_json::from_value(raw)
            .map_err(|e| ToolError::InvalidParameters(format!("invalid todos: {}", e)))?;

        let start = Instant::now();
        let message = format!("✓ TODO list updated with {} tasks", todos.len());
        Ok(ToolOutput::text(message, start.elapsed())
            .with_update(StateUpdate::new().with_todos(todos)))
    }
}

/// Render the current TODO list.
#[derive(Debug, Default)]
pub struct ReadTodosTool;

#[async_trait]
impl Tool for ReadTodosTool {
    fn name(&self) -> &str {
        "read_todos"
    }

    fn description(&self) -> &str {
        "Read the current TODO list to check progress."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    fn kind(&self) -> ToolKind {
        ToolKind::ReadOnly
    }

    async fn execute(
        &self,
        _params: serde_json::Value,
        ctx: &ToolContext<'_>,
    ) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();
        let todos = &ctx.state.todos;
        if todos.is_empty() {
            return Ok(ToolOutput::text(
                "No TODOs currently in the list.",
                start.elapsed(),
            ));
        }

        let text = format!("Current TODO List:\n{}", render_todos(todos).join("\n"));
        Ok(ToolOutput::text(text, start.elapsed()))
    }
}
