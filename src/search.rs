// Web search collaborator. Nothing in the chat loop calls this yet; it is
// kept to the documented contract (query in, up to five snippets out) for
// the day form requests need external context.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

const MAX_RESULTS: usize = 5;
const DEFAULT_BASE_URL: &str = "https://api.duckduckgo.com";

#[derive(Debug, Deserialize)]
struct InstantAnswer {
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

// Related topics mix direct entries with nested groups.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RelatedTopic {
    Entry {
        #[serde(rename = "Text")]
        text: String,
    },
    Group {
        #[serde(rename = "Topics", default)]
        topics: Vec<RelatedTopic>,
    },
}

impl RelatedTopic {
    fn collect_into(&self, out: &mut Vec<String>) {
        match self {
            RelatedTopic::Entry { text } => {
                if !text.is_empty() {
                    out.push(text.clone());
                }
            }
            RelatedTopic::Group { topics } => {
                for topic in topics {
                    topic.collect_into(out);
                }
            }
        }
    }
}

impl InstantAnswer {
    fn snippets(&self) -> Vec<String> {
        let mut out = Vec::new();
        if !self.abstract_text.is_empty() {
            out.push(self.abstract_text.clone());
        }
        for topic in &self.related_topics {
            topic.collect_into(&mut out);
        }
        out.truncate(MAX_RESULTS);
        out
    }
}

/// Client for the DuckDuckGo instant-answer API.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: Client,
    base_url: String,
}

impl Default for SearchClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl SearchClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Up to five result snippets for the query, joined by newlines.
    pub async fn search_web(&self, query: &str) -> Result<String> {
        let response = self
            .http
            .get(format!("{}/", self.base_url))
            .query(&[("q", query), ("format", "json"), ("no_html", "1")])
            .send()
            .await
            .context("Failed to send search request")?
            .error_for_status()
            .context("Search request failed")?;

        let answer = response
            .json::<InstantAnswer>()
            .await
            .context("Failed to parse search response")?;

        let snippets = answer.snippets();
        debug!(query, count = snippets.len(), "Search snippets collected");

        Ok(snippets.join("\n"))
    }
}
