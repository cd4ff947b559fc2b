use crate::app::rewrite::request_host;
use crate::app::routes::{client_ip, timestamp, JsonBody, SuccessBody};
use crate::app::state::AppState;
use crate::core::forms::ContactPayload;
use crate::utils::error::Result;
use axum::extract::State;
use axum::http::{HeaderMap, Uri};
use axum::Json;

/// `POST /api/contact`, from the marketing site or any tenant site.
pub async fn submit_contact(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    JsonBody(payload): JsonBody<ContactPayload>,
) -> Result<Json<SuccessBody>> {
    let submission = payload.validate()?;
    tracing::info!("📨 Contact submission from {}", submission.email);

    let ip = client_ip(&headers);
    state.contact_limiter.check(&ip, &submission.email).await?;

    let host = request_host(&headers, &uri);
    let site = state.site_label(host.as_deref());
    let email = submission.to_email(&site, state.contact_mailbox(), &timestamp());

    state.email.send(&email).await?;
    tracing::info!("✅ Contact email sent for {} {}", site.tag(), submission.email);

    Ok(Json(SuccessBody::new("Message sent successfully")))
}
