use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("{service} API error ({status}): {message}")]
    UpstreamApi {
        service: &'static str,
        status: StatusCode,
        message: String,
    },

    #[error("{service} response error: {message}")]
    UpstreamResponse {
        service: &'static str,
        message: String,
    },

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Upload error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("Error reading {format}: {message}")]
    Extraction {
        format: &'static str,
        message: String,
    },

    #[error("Captioning unavailable: {0}")]
    Caption(String),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl AssistantError {
    /// Returns a user-friendly error message suitable for a chat reply
    pub fn user_message(&self) -> String {
        match self {
            AssistantError::Config(_) | AssistantError::Url(_) => {
                "Sorry, there's a configuration issue on my end. Please contact the administrator."
                    .to_string()
            }
            AssistantError::UpstreamApi { status, .. } => match *status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    "Sorry, I'm having authentication issues with an external service.".to_string()
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    "Sorry, I've hit a rate limit. Please try again in a few moments.".to_string()
                }
                status if status.is_server_error() => {
                    "Sorry, an external service is experiencing issues right now. Please try again later."
                        .to_string()
                }
                _ => "Sorry, I'm having trouble reaching an external service.".to_string(),
            },
            AssistantError::UpstreamResponse { .. } | AssistantError::Json(_) => {
                "Sorry, I received an unexpected response from an external service.".to_string()
            }
            AssistantError::Reqwest(_) => {
                "Sorry, I'm having network issues. Please try again in a moment.".to_string()
            }
            AssistantError::Io(_) | AssistantError::Multipart(_) => {
                "Sorry, I couldn't read that upload.".to_string()
            }
            AssistantError::Task(_) => {
                "Sorry, something went wrong while processing that upload.".to_string()
            }
            AssistantError::Extraction { .. } | AssistantError::Caption(_) => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AssistantError>;
