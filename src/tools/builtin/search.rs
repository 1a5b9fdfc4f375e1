//! Web search tool.
//!
//! Results are offloaded to the virtual filesystem, one file per hit, and
//! only a short summary goes back to the model.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use crate::sources::{SearchBackend, SearchResult};
use crate::state::StateUpdate;
use crate::tools::tool::{
    Tool, ToolContext, ToolError, ToolKind, ToolOutput, optional_usize, require_str,
};

/// Maximum length of the query part of a result filename.
const MAX_SLUG_CHARS: usize = 30;

/// Search tool backed by a pluggable [`SearchBackend`].
pub struct WebSearchTool {
    backend: Arc<dyn SearchBackend>,
    default_max_results: usize,
}

impl WebSearchTool {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self {
            backend,
            default_max_results: 2,
        }
    }

    /// Results returned when the model does not pass `max_results`.
    pub fn with_default_max_results(mut self, max: usize) -> Self {
        self.default_max_results = max;
        self
    }
}

/// Filename for the `index`-th (1-based) result of `query`.
pub fn result_filename(query: &str, index: usize) -> String {
    let slug: String = query
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .take(MAX_SLUG_CHARS)
        .collect();
    format!("search_{}_{}.md", slug, index)
}

fn render_result(result: &SearchResult, query: &str, date: &str) -> String {
    format!(
        "# Search Result: {}\n\n\
         **URL:** {}\n\
         **Query:** {}\n\
         **Date:** {}\n\
         **Relevance Score:** {}\n\n\
         ## Content\n{}\n\n\
         ---\n\
         *This information can be used to inform email responses.*\n",
        result.title, result.url, query, date, result.score, result.content
    )
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web and save each result to a file in the virtual filesystem. Returns the \
         saved filenames; use read_file to see full details."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                },
                "max_results": {
                    "type": "integer",
                    "description": "Maximum number of results (optional)"
                }
            },
            "required": ["query"]
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
        let query = require_str(&params, "query")?;
        let max_results = optional_usize(&params, "max_results", self.default_max_results)?;

        let start = Instant::now();
        let results = self.backend.search(query, max_results).await?;
        let date = chrono::Local::now().format("%a %b %d, %Y").to_string();

        let mut files = ctx.state.files.clone();
        let mut saved = Vec::with_capacity(results.len());
        let mut summaries = Vec::with_capacity(results.len());

        for (i, result) in results.iter().enumerate() {
            let filename = result_filename(query, i + 1);
            files.insert(filename.clone(), render_result(result, query, &date));
            summaries.push(format!("- {}: {}", filename, result.title));
            saved.push(filename);
        }

        tracing::debug!(query, saved = saved.len(), "Search results saved");

        let summary = format!(
            "🔍 Found {} result(s) for '{}':\n\n{}\n\nFiles saved: {}\n\
             💡 Use read_file() to access full details when crafting your response.",
            results.len(),
            query,
            summaries.join("\n"),
            saved.join(", ")
        );

        Ok(ToolOutput::text(summary, start.elapsed())
            .with_update(StateUpdate::new().with_files(files)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MockSearch;
    use crate::state::SharedState;

    #[test]
    fn test_result_filename_sanitized_and_truncated() {
        assert_eq!(result_filename("agent scaling", 1), "search_agent_scaling_1.md");
        assert_eq!(result_filename("what's new? (2026)", 2), "search_whats_new_2026_2.md");

        let long = "a very long query that keeps going and going";
        let name = result_filename(long, 1);
        let slug = name
            .strip_prefix("search_")
            .and_then(|s| s.strip_suffix("_1.md"))
            .unwrap();
        assert_eq!(slug.chars().count(), MAX_SLUG_CHARS);
    }

    #[tokio::test]
    async fn test_search_saves_one_file_per_result() {
        let tool = WebSearchTool::new(Arc::new(MockSearch));
        let mut state = SharedState::default();
        state.files.insert("notes.md".into(), "mine".into());
        let ctx = ToolContext::new(&state, "call_1");

        let out = tool
            .execute(serde_json::json!({"query": "agent scaling"}), &ctx)
            .await
            .unwrap();

        let files = out.update.unwrap().files.unwrap();
        assert_eq!(files.len(), 3);
        assert!(files["search_agent_scaling_1.md"].contains("**Relevance Score:** 0.95"));
        assert!(files.contains_key("search_agent_scaling_2.md"));
        assert!(out.content.contains("Found 2 result(s)"));
        assert!(out.content.contains("search_agent_scaling_1.md, search_agent_scaling_2.md"));
    }

    #[tokio::test]
    async fn test_search_respects_max_results() {
        let tool = WebSearchTool::new(Arc::new(MockSearch)).with_default_max_results(1);
        let state = SharedState::default();
        let ctx = ToolContext::new(&state, "call_1");

        let out = tool
            .execute(serde_json::json!({"query": "q"}), &ctx)
            .await
            .unwrap();
        assert_eq!(out.update.unwrap().files.unwrap().len(), 1);
    }
}
