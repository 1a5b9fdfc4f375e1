//! Reflection tool.

use std::time::Instant;

use async_trait::async_trait;

use crate::tools::tool::{Tool, ToolContext, ToolError, ToolKind, ToolOutput, require_str};

/// Characters of the reflection echoed back.
const ECHO_CHARS: usize = 100;

/// Lets the model pause and record its reasoning between steps.
#[derive(Debug, Default)]
pub struct ThinkTool;

#[async_trait]
impl Tool for ThinkTool {
    fn name(&self) -> &str {
        "think_tool"
    }

    fn description(&self) -> &str {
        "Record a short reflection on progress: what was found, what is missing, and whether \
         to keep searching or move on. Has no side effects."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "reflection": {
                    "type": "string",
                    "description": "Your reflection on progress and next steps"
                }
            },
            "required": ["reflection"]
        })
    }

    fn kind(&self) -> ToolKind {
        ToolKind::ReadOnly
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        _ctx: &ToolContext<'_>,
    ) -> Result<ToolOutput, ToolError> {
        let reflection = require_str(&params, "reflection")?;
        let start = Instant::now();
        let head: String = reflection.chars().take(ECHO_CHARS).collect();
        Ok(ToolOutput::text(
            format!("✓ Reflection recorded: {}...", head),
            start.elapsed(),
        ))
    }
}
