//! The state threaded through one agent run, and the updates tools return.

use serde::{Deserialize, Serialize};

use crate::llm::ChatMessage;
use crate::state::email::Email;
use crate::state::files::{FileTable, merge_files};
use crate::state::todo::{Todo, in_progress_count};

/// Everything an agent run reads and writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SharedState {
    pub conversation: Vec<ChatMessage>,
    pub current_email: Option<Email>,
    pub draft: Option<String>,
    pub todos: Vec<Todo>,
    pub files: FileTable,
}

impl SharedState {
    /// Fresh state for a top-level run.
    pub fn from_instruction(instruction: impl Into<String>) -> Self {
        Self {
            conversation: vec![ChatMessage::user(instruction)],
            ..Self::default()
        }
    }

    /// Copy for a sub-agent: every artifact carried by value, but the
    /// conversation is only the task description.
    pub fn isolated(&self, task_description: impl Into<String>) -> Self {
        Self {
            conversation: vec![ChatMessage::user(task_description)],
            current_email: self.current_email.clone(),
            draft: self.draft.clone(),
            todos: self.todos.clone(),
            files: self.files.clone(),
        }
    }

    /// Fold an update into the state. File tables go through [`merge_files`];
    /// the other fields are overwritten when present.
    pub fn apply(&mut self, update: StateUpdate) {
        let StateUpdate {
            current_email,
            draft,
            todos,
            files,
            messages,
        } = update;

        if let Some(email) = current_email {
            self.current_email = Some(email);
        }
        if let Some(draft) = draft {
            self.draft = Some(draft);
        }
        if let Some(todos) = todos {
            if in_progress_count(&todos) > 1 {
                tracing::warn!(
                    in_progress = in_progress_count(&todos),
                    "TODO list has more than one item in progress"
                );
            }
            self.todos = todos;
        }
        if files.is_some() {
            let current = std::mem::take(&mut self.files);
            self.files = merge_files(Some(current), files).unwrap_or_default();
        }
        self.conversation.extend(messages);
    }

    /// Text of the last message, the agent's final answer once a run ends.
    pub fn final_answer(&self) -> Option<&str> {
        self.conversation.last().map(|m| m.content.as_str())
    }
}

/// A partial state change returned by a tool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateUpdate {
    pub current_email: Option<Email>,
    pub draft: Option<String>,
    pub todos: Option<Vec<Todo>>,
    pub files: Option<FileTable>,
    pub messages: Vec<ChatMessage>,
}

impl StateUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_email(mut self, email: Email) -> Self {
        self.current_email = Some(email);
        self
    }

    pub fn with_draft(mut self, draft: impl Into<String>) -> Self {
        self.draft = Some(draft.into());
        self
    }

    pub fn with_todos(mut self, todos: Vec<Todo>) -> Self {
        self.todos = Some(todos);
        self
    }

    pub fn with_files(mut self, files: FileTable) -> Self {
        self.files = Some(files);
        self
    }

    pub fn with_message(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::llm::Role;
    use crate::state::todo::TodoStatus;

    fn email() -> Email {
        Email {
            id: "email_x".into(),
            from_address: "a@b.c".into(),
            subject: "Hello".into(),
            body: "Body".into(),
            received_at: "2026-01-14T09:30:00Z".into(),
        }
    }

    #[test]
    fn test_isolated_replaces_only_conversation() {
        let mut parent = SharedState::from_instruction("process the inbox");
        parent.conversation.push(ChatMessage::assistant("thinking out loud"));
        parent.current_email = Some(email());
        parent.draft = Some("draft".into());
        parent.todos = vec![Todo::new("step", TodoStatus::Pending)];
        parent.files.insert("notes.md".into(), "n".into());

        let child = parent.isolated("research X");

        assert_eq!(child.conversation, vec![ChatMessage::user("research X")]);
        assert_eq!(child.current_email, parent.current_email);
        assert_eq!(child.draft, parent.draft);
        assert_eq!(child.todos, parent.todos);
        assert_eq!(child.files, parent.files);
        assert_eq!(parent.conversation.len(), 2);
    }

    #[test]
    fn test_isolated_copy_does_not_alias_parent() {
        let mut parent = SharedState::from_instruction("go");
        parent.files.insert("a".into(), "1".into());

        let mut child = parent.isolated("task");
        child.files.insert("a".into(), "changed".into());
        child.todos.push(Todo::new("child step", TodoStatus::Pending));

        assert_eq!(parent.files["a"], "1");
        assert!(parent.todos.is_empty());
    }

    #[test]
    fn test_apply_merges_files_and_overwrites_scalars() {
        let mut state = SharedState::default();
        state.files.insert("keep.md".into(), "k".into());
        state.files.insert("shared.md".into(), "old".into());

        let mut incoming = FileTable::new();
        incoming.insert("shared.md".into(), "new".into());

        state.apply(
            StateUpdate::new()
                .with_email(email())
                .with_draft("first")
                .with_files(incoming)
                .with_message(ChatMessage::tool_result("c1", "write_file", "ok")),
        );
        state.apply(StateUpdate::new().with_draft("second"));

        assert_eq!(state.files["keep.md"], "k");
        assert_eq!(state.files["shared.md"], "new");
        assert_eq!(state.draft.as_deref(), Some("second"));
        assert_eq!(state.current_email, Some(email()));
        assert_eq!(state.conversation.len(), 1);
        assert_eq!(state.conversation[0].role, Role::Tool);
    }

    #[test]
    fn test_apply_empty_update_changes_nothing() {
        let mut state = SharedState::from_instruction("hi");
        state.todos = vec![Todo::new("a", TodoStatus::Pending)];
        let before = state.clone();

        state.apply(StateUpdate::new());

        assert_eq!(state, before);
    }

    #[test]
    fn test_todos_fully_replaced_even_with_two_in_progress() {
        let mut state = SharedState::default();
        state.todos = vec![Todo::new("old", TodoStatus::Completed)];

        let todos = vec![
            Todo::new("a", TodoStatus::InProgress),
            Todo::new("b", TodoStatus::InProgress),
        ];
        state.apply(StateUpdate::new().with_todos(todos.clone()));

        assert_eq!(state.todos, todos);
    }
}
