//! Virtual filesystem tools.
//!
//! Files live in the shared state's file table, not on disk. Agents use them
//! to offload search results and notes instead of carrying everything in the
//! conversation.

use std::time::Instant;

use async_trait::async_trait;

use crate::state::StateUpdate;
use crate::tools::tool::{
    Tool, ToolContext, ToolError, ToolKind, ToolOutput, optional_usize, require_str,
};

/// Default number of lines returned by `read_file`.
const DEFAULT_READ_LIMIT: usize = 2000;

/// Lines longer than this are cut when read back.
const MAX_LINE_CHARS: usize = 2000;

/// List file paths.
#[derive(Debug, Default)]
pub struct ListFilesTool;

#[async_trait]
impl Tool for ListFilesTool {
    fn name(&self) -> &str {
        "ls"
    }

    fn description(&self) -> &str {
        "List all files in the virtual filesystem, sorted by path. Use this to orient \
         yourself before other file operations."
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
        let paths: Vec<&String> = ctx.state.files.keys().collect();
        let listing = serde_json::to_string(&paths)
            .map_err(|e| ToolError::ExecutionFailed(format!("failed to list files: {}", e)))?;
        Ok(ToolOutput::text(listing, start.elapsed()))
    }
}

/// Read a file with line numbers.
#[derive(Debug, Default)]
pub struct ReadFileTool;

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read a file from the virtual filesystem. Returns numbered lines. For large files, \
         page with offset (0-based line) and limit (line count, default 2000)."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "Path to the file to read"
                },
                "offset": {
                    "type": "integer",
                    "description": "Line to start reading from, 0-based (default 0)"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of lines to read (default 2000)"
                }
            },
            "required": ["file_path"]
        })
    }

    fn kind(&self) -> ToolKind {
        ToolKind::ReadOnly
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: &ToolContext<'_>,
    ) -> Result<ToolOutput, ToolError> {
        let path = require_str(&params, "file_path")?;
        let offset = optional_usize(&params, "offset", 0)?;
        let limit = optional_usize(&params, "limit", DEFAULT_READ_LIMIT)?;

        let start = Instant::now();
        let text = read_lines(ctx.state.files.get(path).map(String::as_str), path, offset, limit);
        Ok(ToolOutput::text(text, start.elapsed()))
    }
}

fn read_lines(content: Option<&str>, path: &str, offset: usize, limit: usize) -> String {
    let Some(content) = content else {
        return format!(
            "Error: File '{}' not found. Use ls() to see available files.",
            path
        );
    };
    if content.is_empty() {
        return "File exists but is empty.".to_string();
    }

    let lines: Vec<&str> = content.lines().collect();
    if offset >= lines.len() {
        return format!(
            "Error: Offset {} exceeds file length ({} lines)",
            offset,
            lines.len()
        );
    }

    let end = offset.saturating_add(limit).min(lines.len());
    lines[offset..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let line: String = line.chars().take(MAX_LINE_CHARS).collect();
            format!("{:>6}\t{}", offset + i + 1, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Create or overwrite a file.
#[derive(Debug, Default)]
pub struct WriteFileTool;

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Write content to a file in the virtual filesystem. Creates the file or completely \
         overwrites it. Use for email context, research findings, or draft notes."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "Path of the file to create or overwrite"
                },
                "content": {
                    "type": "string",
                    "description": "Complete content to write"
                }
            },
            "required": ["file_path", "content"]
        })
    }

    fn kind(&self) -> ToolKind {
        ToolKind::Mutating
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: &ToolContext<'_>,
    ) -> Result<ToolOutput, ToolError> {
        let path = require_str(&params, "file_path")?;
        let content = require_str(&params, "content")?;

        let start = Instant::now();

        // The update carries the whole table so it merges like any other file delta.
        let mut files = ctx.state.files.clone();
        files.insert(path.to_string(), content.to_string());

        Ok(
            ToolOutput::text(format!("✓ File '{}' written successfully", path), start.elapsed())
                .with_update(StateUpdate::new().with_files(files)),
        )
    }
}
