//! HTTP surface: chat, uploads, the chat page and a health check.

mod chat;
mod page;
mod upload;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use log::{info, warn};
use tokio::net::TcpListener;

use crate::config::Config;
use crate::error::Result;
use crate::intent::Assistant;
use crate::session::SessionStore;
use crate::skills::{Captioner, NewsClient, SnippetTable, WikipediaClient};

/// Largest accepted upload body.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<Assistant>,
    pub captioner: Arc<Captioner>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(assistant: Assistant, captioner: Captioner, sessions: SessionStore) -> Self {
        Self {
            assistant: Arc::new(assistant),
            captioner: Arc::new(captioner),
            sessions,
        }
    }

    /// Builds every capability once from the configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = config.http_client()?;

        let snippets = SnippetTable::load(&config.programs_path);
        let wikipedia = WikipediaClient::new(client.clone(), config.wikipedia_api_url.clone());
        let news = NewsClient::new(
            client.clone(),
            config.news_api_url.clone(),
            config.news_api_key.clone(),
            config.news_country.clone(),
        );
        let captioner = Captioner::new(
            client,
            config.caption_api_url.clone(),
            config.caption_api_token.clone(),
        );

        Ok(Self::new(
            Assistant::new(snippets, wikipedia, news),
            captioner,
            SessionStore::new(config.session_idle_ttl),
        ))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(page::index))
        .route("/test", get(page::health))
        .route("/chat", post(chat::chat))
        .route(
            "/upload",
            post(upload::upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .with_state(state)
}

/// Serves the assistant until Ctrl-C.
pub async fn run() -> Result<()> {
    let config = Config::from_env()?;
    let state = AppState::from_config(&config)?;

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("Assistant listening on http://{}", config.bind_addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}


#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn health_check_responds() {
        let app = router(test_support::offline_state());
        let response = app
            .oneshot(Request::builder().uri("/test").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        assert_eq!(&body[..], b"Server is running!");
    }

    #[tokio::test]
    async fn index_serves_html() {
        let app = router(test_support::offline_state());
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("text/html"));
    }
}
