use crate::app::routes::timestamp;
use crate::app::state::AppState;
use crate::core::forms::test_email;
use crate::utils::error::SiteError;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// `GET /api/test-email`: checks the provider setup end to end.
pub async fn send_test_email(State(state): State<AppState>) -> Response {
    let mailbox = state.request_mailbox();
    let email = test_email(mailbox, &timestamp());

    match state.email.send(&email).await {
        Ok(sent) => Json(json!({
            "success": true,
            "message": format!("Test email sent! Check your inbox at {}", mailbox.to),
            "emailId": sent.id,
        }))
        .into_response(),
        Err(SiteError::EmailNotConfigured) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "RESEND_API_KEY is not set" })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("❌ Error sending test email: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to send test email",
                    "details": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}
