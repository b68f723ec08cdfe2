//! Image captioning through a hosted image-to-text model.

use log::{debug, info, warn};
use mime::Mime;
use serde::Deserialize;
use url::Url;

use crate::error::{AssistantError, Result};

const SERVICE: &str = "Caption";
const WEAPONS: [&str; 5] = ["gun", "knife", "pistol", "bomb", "rifle"];

#[derive(Debug, Deserialize)]
struct Generated {
    generated_text: String,
}

/// Captioning capability, built once at startup and shared by handlers.
#[derive(Debug, Clone)]
pub struct Captioner {
    client: reqwest::Client,
    api_url: Url,
    api_token: Option<String>,
}

impl Captioner {
    pub fn new(client: reqwest::Client, api_url: Url, api_token: Option<String>) -> Self {
        info!("Image captioning via {}", api_url);
        Self {
            client,
            api_url,
            api_token,
        }
    }

    /// Generates a caption for the image bytes.
    pub async fn caption(&self, filename: &str, image: Vec<u8>) -> Result<String> {
        let content_type: Mime = mime_guess::from_path(filename).first_or_octet_stream();
        if content_type.type_() != mime::IMAGE {
            return Err(AssistantError::Caption(format!(
                "{filename} is not an image ({content_type})"
            )));
        }

        debug!("Captioning {} ({} bytes, {})", filename, image.len(), content_type);

        let mut request = self
            .client
            .post(self.api_url.clone())
            .header(reqwest::header::CONTENT_TYPE, content_type.as_ref())
            .body(image);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

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

        let generated: Vec<Generated> = response.json().await?;
        generated
            .into_iter()
            .next()
            .map(|g| g.generated_text.trim().to_string())
            .filter(|caption| !caption.is_empty())
            .ok_or_else(|| AssistantError::UpstreamResponse {
                service: SERVICE,
                message: "no caption was generated".to_string(),
            })
    }

    /// Caption shown to the user: the caption with a weapon warning when
    /// needed, or the failure reason.
    pub async fn describe(&self, filename: &str, image: Vec<u8>) -> String {
        match self.caption(filename, image).await {
            Ok(caption) => flag_weapons(&caption),
            Err(e) => {
                warn!("Captioning {} failed: {}", filename, e);
                format!("Error generating caption: {e}")
            }
        }
    }
}

/// Prepends a warning line when the caption mentions a weapon.
pub fn flag_weapons(caption: &str) -> String {
    let lower = caption.to_lowercase();
    let detected: Vec<&str> = WEAPONS
        .iter()
        .copied()
        .filter(|weapon| lower.contains(weapon))
        .collect();

    if detected.is_empty() {
        caption.to_string()
    } else {
        format!(
            "⚠️ Warning: Possible weapon detected ({}).\n{caption}",
            detected.join(", ")
        )
    }
}
