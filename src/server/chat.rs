use axum::{Json, extract::State};
use axum_extra::extract::CookieJar;
use log::info;
use serde::Deserialize;

use crate::session::resolve_session_id;
use crate::types::Reply;

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    message: Option<String>,
}

pub async fn chat(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<ChatRequest>,
) -> (CookieJar, Json<Reply>) {
    let (jar, session_id) = resolve_session_id(jar);
    let message = request.message.unwrap_or_default();

    let mut session = state.sessions.acquire(&session_id).await;
    let reply = state.assistant.respond(&message, &mut session).await;
    drop(session);

    info!("Answered chat message for session {}", session_id);
    (jar, Json(reply))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
        response::Response,
    };
    use tower::ServiceExt;

    use super::super::{router, test_support::offline_state};
    use crate::session::SESSION_COOKIE;

    async fn post_chat(app: axum::Router, body: &str, cookie: Option<&str>) -> Response {
        let mut request = Request::builder()
            .method("POST")
            .uri("/chat")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        app.oneshot(request.body(Body::from(body.to_string())).expect("request"))
            .await
            .expect("response")
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    fn session_cookie(response: &Response) -> String {
        response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .expect("session cookie")
            .to_string()
    }

    #[tokio::test]
    async fn chat_replies_and_issues_cookie() {
        let app = router(offline_state());
        let response = post_chat(app, r#"{"message": "5 plus 3"}"#, None).await;

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = session_cookie(&response);
        assert!(cookie.starts_with(&format!("{SESSION_COOKIE}=")));
        assert_eq!(
            json_body(response).await,
            serde_json::json!({"reply": "The answer is: 8"})
        );
    }

    #[tokio::test]
    async fn missing_message_is_treated_as_empty() {
        let app = router(offline_state());
        let response = post_chat(app, "{}", None).await;
        let body = json_body(response).await;
        assert!(
            body["reply"]
                .as_str()
                .is_some_and(|r| r.starts_with("Sorry, I didn't understand that."))
        );
    }

    #[tokio::test]
    async fn session_survives_between_requests() {
        let state = offline_state();
        let response = post_chat(router(state.clone()), r#"{"message": "hi"}"#, None).await;
        let cookie = session_cookie(&response);
        let session_id = cookie
            .split_once('=')
            .map(|(_, id)| id.to_string())
            .expect("cookie value");

        state
            .sessions
            .acquire(&session_id)
            .await
            .store_document("A document sentence that is long enough.".to_string());

        let response = post_chat(router(state.clone()), r#"{"message": "hello"}"#, Some(&cookie)).await;
        let body = json_body(response).await;
        assert_eq!(
            body["speak"],
            serde_json::json!("Please choose read out or summarize")
        );
        assert!(state.sessions.acquire(&session_id).await.pending_document);
    }
}
