//! Search collaborator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::tools::ToolError;

/// One search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub content: String,
    pub score: f64,
}

/// Given a query and a limit, returns ordered results.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str, max_results: usize)
    -> Result<Vec<SearchResult>, ToolError>;
}

/// Deterministic results derived from the query text. No network.
#[derive(Debug, Default, Clone)]
pub struct MockSearch;

#[async_trait]
impl SearchBackend for MockSearch {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, ToolError> {
        let slug = query.replace(' ', "-");
        let templates = [
            SearchResult {
                title: format!("Search Result for: {}", query),
                url: format!("https://example.com/search/{}", slug),
                content: format!(
                    "This is a mock search result for '{}'. A real backend would return page \
                     content here.",
                    query
                ),
                score: 0.95,
            },
            SearchResult {
                title: format!("Additional Information: {}", query),
                url: format!("https://example.com/info/{}", slug),
                content: format!(
                    "Additional context related to '{}', showing how multiple results are \
                     processed.",
                    query
                ),
                score: 0.87,
            },
        ];

        Ok(templates.into_iter().take(max_results).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_search_respects_limit() {
        let results = MockSearch.search("agent scaling", 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "https://example.com/search/agent-scaling");

        let results = MockSearch.search("agent scaling", 5).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].score > results[1].score);
    }

    #[tokio::test]
    async fn test_mock_search_is_deterministic() {
        let a = MockSearch.search("q", 2).await.unwrap();
        let b = MockSearch.search("q", 2).await.unwrap();
        assert_eq!(a, b);
    }
}
