//! Planning TODO items.

use serde::{Deserialize, Serialize};

/// Progress of a TODO item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    Pending,
    InProgress,
    Completed,
}

impl TodoStatus {
    fn marker(self) -> &'static str {
        match self {
            TodoStatus::Pending => "⏳",
            TodoStatus::InProgress => "🔄",
            TodoStatus::Completed => "✅",
        }
    }
}

impl std::fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TodoStatus::Pending => write!(f, "pending"),
            TodoStatus::InProgress => write!(f, "in_progress"),
            TodoStatus::Completed => write!(f, "completed"),
        }
    }
}

/// One step of the agent's plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub content: String,
    pub status: TodoStatus,
}

impl Todo {
    pub fn new(content: impl Into<String>, status: TodoStatus) -> Self {
        Self {
            content: content.into(),
            status,
        }
    }
}

/// Number of items currently marked in progress.
///
/// At most one is expected, but writes are never rejected for it.
pub fn in_progress_count(todos: &[Todo]) -> usize {
    todos
        .iter()
        .filter(|t| t.status == TodoStatus::InProgress)
        .count()
}

/// Numbered lines, `1. ⏳ Do the thing (pending)`.
pub fn render_todos(todos: &[Todo]) -> Vec<String> {
    todos
        .iter()
        .enumerate()
        .map(|(i, todo)| {
            format!(
                "{}. {} {} ({})",
                i + 1,
                todo.status.marker(),
                todo.content,
                todo.status
            )
        })
        .collect()
}
