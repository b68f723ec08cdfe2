use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use log::{debug, error, info, warn};
use url::Url;

use crate::error::{AssistantError, Result};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
const DEFAULT_PROGRAMS_PATH: &str = "programs.json";
const DEFAULT_NEWS_API_URL: &str = "https://newsapi.org/v2/top-headlines";
const DEFAULT_NEWS_COUNTRY: &str = "in";
const DEFAULT_WIKIPEDIA_API_URL: &str = "https://en.wikipedia.org/w/api.php";
const DEFAULT_CAPTION_API_URL: &str =
    "https://api-inference.huggingface.co/models/Salesforce/blip-image-captioning-base";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;
const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub programs_path: PathBuf,
    pub news_api_url: Url,
    pub news_api_key: Option<String>,
    pub news_country: String,
    pub wikipedia_api_url: Url,
    pub caption_api_url: Url,
    pub caption_api_token: Option<String>,
    pub http_timeout: Duration,
    pub session_idle_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment");
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let secret = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = value("BIND_ADDR", DEFAULT_BIND_ADDR)
            .parse::<SocketAddr>()
            .map_err(|e| {
                error!("Invalid BIND_ADDR: {}", e);
                AssistantError::Config(format!("BIND_ADDR is not a socket address: {e}"))
            })?;

        let news_api_url = Url::parse(&value("NEWS_API_URL", DEFAULT_NEWS_API_URL))?;
        let wikipedia_api_url =
            Url::parse(&value("WIKIPEDIA_API_URL", DEFAULT_WIKIPEDIA_API_URL))?;
        let caption_api_url = Url::parse(&value("CAPTION_API_URL", DEFAULT_CAPTION_API_URL))?;

        let timeout_secs = value("HTTP_TIMEOUT_SECS", &DEFAULT_HTTP_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|e| {
                error!("Invalid HTTP_TIMEOUT_SECS: {}", e);
                AssistantError::Config(format!("HTTP_TIMEOUT_SECS is not a whole number: {e}"))
            })?;

        let session_idle_secs =
            value("SESSION_IDLE_SECS", &DEFAULT_SESSION_IDLE_SECS.to_string())
                .parse::<u64>()
                .map_err(|e| {
                    error!("Invalid SESSION_IDLE_SECS: {}", e);
                    AssistantError::Config(format!("SESSION_IDLE_SECS is not a whole number: {e}"))
                })?;

        let news_api_key = secret("NEWS_API_KEY");
        if news_api_key.is_none() {
            warn!("NEWS_API_KEY is not set, news headlines are disabled");
        }
        let caption_api_token = secret("CAPTION_API_TOKEN");

        let config = Self {
            bind_addr,
            programs_path: PathBuf::from(value("PROGRAMS_PATH", DEFAULT_PROGRAMS_PATH)),
            news_api_url,
            news_api_key,
            news_country: value("NEWS_COUNTRY", DEFAULT_NEWS_COUNTRY),
            wikipedia_api_url,
            caption_api_url,
            caption_api_token,
            http_timeout: Duration::from_secs(timeout_secs),
            session_idle_ttl: Duration::from_secs(session_idle_secs),
        };

        info!("Configuration loaded successfully");
        debug!("Bind address: {}", config.bind_addr);
        debug!("Programs path: {}", config.programs_path.display());
        debug!("Wikipedia API: {}", config.wikipedia_api_url);
        debug!("Caption API: {}", config.caption_api_url);
        debug!(
            "Caption API token length: {} characters",
            config.caption_api_token.as_ref().map_or(0, String::len)
        );
        debug!("HTTP timeout: {:?}", config.http_timeout);
        debug!("Session idle TTL: {:?}", config.session_idle_ttl);

        Ok(config)
    }

    /// Builds the shared outbound HTTP client.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("vassist/", env!("CARGO_PKG_VERSION")))
            .timeout(self.http_timeout)
            .build()?;
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).expect("defaults are valid");
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:5000");
        assert_eq!(config.programs_path, PathBuf::from("programs.json"));
        assert_eq!(config.news_country, "in");
        assert!(config.news_api_key.is_none());
        assert_eq!(config.http_timeout, Duration::from_secs(15));
        assert_eq!(config.session_idle_ttl, Duration::from_secs(1800));
    }

    #[test]
    fn blank_secret_is_treated_as_unset() {
        let config = Config::from_lookup(lookup_from(&[("NEWS_API_KEY", "  ")]))
            .expect("config should load");
        assert!(config.news_api_key.is_none());
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[("HTTP_TIMEOUT_SECS", "soon")]));
        assert!(matches!(result, Err(AssistantError::Config(_))));
    }

    #[test]
    fn invalid_session_idle_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[("SESSION_IDLE_SECS", "-5")]));
        assert!(matches!(result, Err(AssistantError::Config(_))));
    }

    #[test]
    fn invalid_url_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[("WIKIPEDIA_API_URL", "not a url")]));
        assert!(matches!(result, Err(AssistantError::Url(_))));
    }
}
