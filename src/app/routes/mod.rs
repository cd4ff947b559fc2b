pub mod contact;
pub mod health;
pub mod marketing;
pub mod request;
pub mod tenant;
pub mod test_email;

use crate::utils::error::SiteError;
use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::http::HeaderMap;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Client address as reported by the proxy in front of us.
pub fn client_ip(headers: &HeaderMap) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    if let Some(forwarded) = header("x-forwarded-for") {
        if let Some(first) = forwarded.split(',').next() {
            return first.trim().to_string();
        }
    }
    header("x-real-ip")
        .or_else(|| header("cf-connecting-ip"))
        .unwrap_or("unknown")
        .to_string()
}

/// `Json<T>` whose rejection is a 400 with the usual `{error}` body.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = SiteError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                tracing::debug!("Rejected request body: {}", rejection.body_text());
                Err(SiteError::validation("Invalid request body"))
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SuccessBody {
    pub success: bool,
    pub message: String,
}

impl SuccessBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

pub(crate) fn timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
