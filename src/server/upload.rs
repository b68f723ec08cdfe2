use axum::{
    Json,
    extract::{Multipart, State},
};
use axum_extra::extract::CookieJar;
use log::{info, warn};

use crate::documents::extract_text;
use crate::error::{AssistantError, Result};
use crate::session::resolve_session_id;
use crate::types::{UploadKind, UploadReply};

use super::AppState;

const DOCUMENT_MESSAGE: &str = "📄 Document uploaded successfully! What would you like me to do?\n\n1️⃣ Type 'read out' - I'll read the full document\n2️⃣ Type 'summarize' - I'll extract main points for better understanding";
const DOCUMENT_SPEAK: &str = "Document uploaded. What would you like me to do? Say read out for full content, or summarize for main points.";
const TEXT_MESSAGE: &str = "📄 Text file uploaded successfully! What would you like me to do?\n\n1️⃣ Type 'read out' - I'll read the full document\n2️⃣ Type 'summarize' - I'll extract main points for better understanding";
const TEXT_SPEAK: &str = "Text file uploaded. What would you like me to do? Say read out for full content, or summarize for main points.";

/// An uploaded file with a name.
struct UploadedFile {
    filename: String,
    data: Vec<u8>,
}

/// Reads the `file` field, or `image` when there is none. Parts without a
/// file name count as missing.
async fn read_upload(multipart: &mut Multipart) -> Result<Option<UploadedFile>> {
    let mut file = None;
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let slot = match field.name() {
            Some("file") => &mut file,
            Some("image") => &mut image,
            _ => continue,
        };
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let data = field.bytes().await?.to_vec();
        if !filename.is_empty() && slot.is_none() {
            *slot = Some(UploadedFile { filename, data });
        }
    }

    Ok(file.or(image))
}

pub async fn upload(
    State(state): State<AppState>,
    jar: CookieJar,
    mut multipart: Multipart,
) -> (CookieJar, Json<UploadReply>) {
    let (jar, session_id) = resolve_session_id(jar);

    let upload = match read_upload(&mut multipart).await {
        Ok(Some(upload)) => upload,
        Ok(None) => return (jar, Json(UploadReply::no_file())),
        Err(e) => {
            warn!("Failed to read upload: {}", e);
            return (jar, Json(UploadReply::error(e.user_message())));
        }
    };

    info!(
        "Received upload '{}' ({} bytes) for session {}",
        upload.filename,
        upload.data.len(),
        session_id
    );

    let Some(kind) = UploadKind::from_filename(&upload.filename) else {
        return (jar, Json(UploadReply::error("Unsupported file type")));
    };

    if kind == UploadKind::Image {
        let caption = state.captioner.describe(&upload.filename, upload.data).await;
        return (jar, Json(UploadReply::Caption { caption }));
    }

    let data = upload.data;
    let extracted = tokio::task::spawn_blocking(move || extract_text(kind, &data))
        .await
        .map_err(AssistantError::from)
        .and_then(|result| result);
    let content = match extracted {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to extract '{}': {}", upload.filename, e);
            return (jar, Json(UploadReply::error(e.user_message())));
        }
    };

    state
        .sessions
        .acquire(&session_id)
        .await
        .store_document(content);

    let (message, speak) = if kind == UploadKind::Text {
        (TEXT_MESSAGE, TEXT_SPEAK)
    } else {
        (DOCUMENT_MESSAGE, DOCUMENT_SPEAK)
    };
    (
        jar,
        Json(UploadReply::Document {
            kind: "document",
            message,
            speak,
        }),
    )
}
