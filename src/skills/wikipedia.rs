//! Paginated Wikipedia summaries via the MediaWiki extracts API.

use log::{debug, warn};
use serde::Deserialize;
use url::Url;

use crate::error::{AssistantError, Result};
use crate::session::Session;

const SERVICE: &str = "Wikipedia";
/// Sentences shown per page
const PAGE_SIZE: usize = 2;

#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<Query>,
}

#[derive(Debug, Deserialize)]
struct Query {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: String,
    #[serde(default)]
    missing: bool,
    extract: Option<String>,
}

/// Fetches plain-text article summaries.
#[derive(Debug, Clone)]
pub struct WikipediaClient {
    client: reqwest::Client,
    api_url: Url,
}

impl WikipediaClient {
    pub fn new(client: reqwest::Client, api_url: Url) -> Self {
        Self { client, api_url }
    }

    /// First `sentences` sentences of the article's introduction.
    pub async fn summary(&self, topic: &str, sentences: usize) -> Result<String> {
        debug!("Fetching {} sentences about '{}'", sentences, topic);
        let sentences = sentences.to_string();

        let response = self
            .client
            .get(self.api_url.clone())
            .query(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("format", "json"),
                ("formatversion", "2"),
                ("exsentences", sentences.as_str()),
                ("titles", topic),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {}", e));
            return Err(AssistantError::UpstreamApi {
                service: SERVICE,
                status,
                message,
            });
        }

        let body: QueryResponse = response.json().await?;
        let page = body
            .query
            .and_then(|q| q.pages.into_iter().next())
            .ok_or_else(|| AssistantError::UpstreamResponse {
                service: SERVICE,
                message: "response contained no pages".to_string(),
            })?;

        if page.missing {
            return Err(AssistantError::UpstreamResponse {
                service: SERVICE,
                message: format!("Page id \"{}\" does not match any pages", page.title),
            });
        }

        page.extract
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| AssistantError::UpstreamResponse {
                service: SERVICE,
                message: format!("\"{}\" has no summary", page.title),
            })
    }

    /// Starts a new topic at its first page.
    pub async fn lookup(&self, topic: &str, session: &mut Session) -> String {
        session.wiki_topic = Some(topic.to_string());
        session.wiki_offset = 0;
        self.page(topic, 0).await
    }

    /// Advances the stored topic to its next page.
    pub async fn more(&self, session: &mut Session) -> String {
        let Some(topic) = session.wiki_topic.clone() else {
            return "Please ask about a topic first.".to_string();
        };
        session.wiki_offset += PAGE_SIZE;
        self.page(&topic, session.wiki_offset).await
    }

    async fn page(&self, topic: &str, offset: usize) -> String {
        match self.summary(topic, offset + PAGE_SIZE).await {
            Ok(summary) => page_slice(&summary, offset),
            Err(e) => {
                warn!("Wikipedia lookup for '{}' failed: {}", topic, e);
                format!("Sorry, I couldn't find information on that topic. Error: {e}")
            }
        }
    }
}

/// Sentences `[offset, offset + PAGE_SIZE)` of the summary.
fn page_slice(summary: &str, offset: usize) -> String {
    let page: Vec<&str> = summary.split(". ").skip(offset).take(PAGE_SIZE).collect();
    let page = page.join(". ");
    if page.is_empty() {
        "No more information available.".to_string()
    } else {
        page
    }
}
