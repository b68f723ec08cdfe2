//! Top news headlines from NewsAPI.

use log::{debug, error, warn};
use serde::Deserialize;
use url::Url;

use crate::error::{AssistantError, Result};

const SERVICE: &str = "NewsAPI";
const MAX_HEADLINES: usize = 5;
const UNAVAILABLE: &str = "Sorry, I'm having trouble fetching the news at the moment.";
const NO_HEADLINES: &str = "Sorry, I couldn't fetch the latest news right now.";

#[derive(Debug, Deserialize)]
struct HeadlinesResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: Option<String>,
}

/// Client for the `top-headlines` endpoint.
#[derive(Debug, Clone)]
pub struct NewsClient {
    client: reqwest::Client,
    api_url: Url,
    api_key: Option<String>,
    country: String,
}

impl NewsClient {
    pub fn new(
        client: reqwest::Client,
        api_url: Url,
        api_key: Option<String>,
        country: String,
    ) -> Self {
        Self {
            client,
            api_url,
            api_key,
            country,
        }
    }

    /// Current headline titles, at most five.
    pub async fn headlines(&self) -> Result<Vec<String>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AssistantError::Config("NEWS_API_KEY is not set".to_string()))?;

        debug!("Fetching top headlines for country '{}'", self.country);

        let response = self
            .client
            .get(self.api_url.clone())
            .header("X-Api-Key", api_key)
            .query(&[("country", self.country.as_str())])
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

        let body: HeadlinesResponse = response.json().await?;
        Ok(body
            .articles
            .into_iter()
            .filter_map(|a| a.title)
            .take(MAX_HEADLINES)
            .collect())
    }

    /// Reply listing the current headlines.
    pub async fn current_affairs(&self) -> String {
        match self.headlines().await {
            Ok(titles) if titles.is_empty() => {
                warn!("News API returned no articles");
                NO_HEADLINES.to_string()
            }
            Ok(titles) => {
                let mut reply = format!("📰 Here are the top {MAX_HEADLINES} headlines:");
                for title in titles {
                    reply.push_str("\n- ");
                    reply.push_str(&title);
                }
                reply
            }
            Err(e) => {
                error!("Error fetching current affairs: {}", e);
                UNAVAILABLE.to_string()
            }
        }
    }
}
