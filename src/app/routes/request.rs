use crate::app::routes::{client_ip, timestamp, JsonBody, SuccessBody};
use crate::app::state::AppState;
use crate::core::forms::WebsiteRequestPayload;
use crate::utils::error::{ErrorBody, Result, SiteError};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

/// `POST /api/request`: website quote requests from the pricing wizard.
pub async fn submit_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(payload): JsonBody<WebsiteRequestPayload>,
) -> Result<Response> {
    let request = payload.validate()?;
    let ip = client_ip(&headers);
    state.request_limiter.check(&ip, &request.email).await?;

    let requested_at = timestamp();
    let email = request.to_email(state.request_mailbox(), &requested_at);

    match state.email.send(&email).await {
        Ok(_) => {
            tracing::info!("✅ Website request email sent for {}", request.email);
            Ok(Json(SuccessBody::new("Request submitted successfully")).into_response())
        }
        Err(SiteError::EmailNotConfigured) => Err(SiteError::EmailNotConfigured),
        Err(e) => {
            tracing::error!("❌ Failed to send website request email: {}", e);
            // 郵件失敗時仍保留請求內容
            tracing::info!(
                name = %request.name,
                email = %request.email,
                pages = %request.pages,
                theme = %request.theme,
                seo_level = %request.seo_level,
                support_level = %request.support_level,
                delivery_time = %request.delivery_time,
                features = ?request.selected_features(),
                custom_features = ?request.custom_features_text,
                price = %request.price_display(),
                requested_at = %requested_at,
                "New website request (email failed)"
            );
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "Failed to send email notification".to_string(),
                }),
            )
                .into_response())
        }
    }
}
