//! Inbox and reply-drafting tools.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use crate::sources::EmailSource;
use crate::state::{Email, StateUpdate};
use crate::tools::tool::{Tool, ToolContext, ToolError, ToolKind, ToolOutput, require_str};

/// Characters of the body shown in the read summary.
const BODY_PREVIEW_CHARS: usize = 300;

/// Characters of the draft shown after writing it.
const DRAFT_PREVIEW_CHARS: usize = 200;

const DRAFT_CLOSING: &str = "---\nThis draft is ready for review and sending.\n";

fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Load the most recent email into state.
pub struct ReadLatestEmailTool {
    source: Arc<dyn EmailSource>,
}

impl ReadLatestEmailTool {
    pub fn new(source: Arc<dyn EmailSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for ReadLatestEmailTool {
    fn name(&self) -> &str {
        "read_latest_email"
    }

    fn description(&self) -> &str {
        "Read the most recent email from the inbox and store it in state for processing."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    fn kind(&self) -> ToolKind {
        ToolKind::Mutating
    }

    async fn execute(
        &self,
        _params: serde_json::Value,
        _ctx: &ToolContext<'_>,
    ) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();

        let Some(email) = self.source.latest() else {
            return Ok(ToolOutput::text("Inbox is empty.", start.elapsed()));
        };

        let summary = format!(
            "📧 Latest Email Retrieved:\n\n\
             **From:** {}\n\
             **Subject:** {}\n\
             **Received:** {}\n\n\
             **Body:**\n{}...\n\n\
             Email stored in state for processing.",
            email.from_address,
            email.subject,
            email.received_at,
            preview(&email.body, BODY_PREVIEW_CHARS)
        );

        tracing::debug!(email_id = %email.id, "Loaded latest email");

        Ok(ToolOutput::text(summary, start.elapsed())
            .with_update(StateUpdate::new().with_email(email)))
    }
}

/// Compose the reply draft for the current email.
#[derive(Debug, Default)]
pub struct WriteEmailDraftTool;

/// Full draft text: headers, body, closing marker.
pub fn compose_draft(email: &Email, content: &str) -> String {
    format!(
        "To: {}\nSubject: {}\n\n{}\n\n{}",
        email.from_address,
        email.reply_subject(),
        content,
        DRAFT_CLOSING
    )
}

#[async_trait]
impl Tool for WriteEmailDraftTool {
    fn name(&self) -> &str {
        "write_email_draft"
    }

    fn description(&self) -> &str {
        "Write or replace the reply draft for the current email. The draft is addressed to \
         the sender with a 'Re:' subject and a closing marker."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "draft_content": {
                    "type": "string",
                    "description": "Body of the reply"
                }
            },
            "required": ["draft_content"]
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
        let content = require_str(&params, "draft_content")?;
        let start = Instant::now();

        let Some(email) = ctx.state.current_email.as_ref() else {
            return Ok(ToolOutput::text(
                "Error: No email in context. Use read_latest_email first.",
                start.elapsed(),
            ));
        };

        let draft = compose_draft(email, content);
        let message = format!(
            "✅ Email draft created and saved.\n\nPreview:\n{}...",
            preview(&draft, DRAFT_PREVIEW_CHARS)
        );

        Ok(ToolOutput::text(message, start.elapsed())
            .with_update(StateUpdate::new().with_draft(draft)))
    }
}

/// Render the current email in full.
#[derive(Debug, Default)]
pub struct GetEmailContextTool;

#[async_trait]
impl Tool for GetEmailContextTool {
    fn name(&self) -> &str {
        "get_email_context"
    }

    fn description(&self) -> &str {
        "Get the full details of the email currently being processed."
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
        let text = match ctx.state.current_email.as_ref() {
            None => "No email currently loaded in context.".to_string(),
            Some(email) => format!(
                "Current Email Context:\n\n\
                 From: {}\n\
                 Subject: {}\n\
                 Received: {}\n\n\
                 Body:\n{}\n",
                email.from_address, email.subject, email.received_at, email.body
            ),
        };
        Ok(ToolOutput::text(text, start.elapsed()))
    }
}
