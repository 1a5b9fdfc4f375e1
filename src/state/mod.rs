//! Shared run state and the rules for folding tool results into it.
//!
//! One [`SharedState`] lives for a single top-level run:
//! - Conversation history
//! - Current email and reply draft
//! - TODO plan
//! - Virtual file table, merged with [`merge_files`]

mod email;
mod files;
mod shared;
mod todo;

pub use email::Email;
pub use files::{FileTable, merge_files};
pub use shared::{SharedState, StateUpdate};
pub use todo::{Todo, TodoStatus, in_progress_count, render_todos};
