use crate::app::state::AppState;
use crate::core::routing::RouteDecision;
use axum::extract::{OriginalUri, Request, State};
use axum::http::uri::PathAndQuery;
use axum::http::{header, HeaderMap, Uri};
use axum::middleware::Next;
use axum::response::Response;

/// Host as sent by the client: the `Host` header, else the request-target authority (HTTP/2).
pub fn request_host(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .or_else(|| uri.authority().map(|authority| authority.to_string()))
}

/// Runs before routing. Tenant requests are served from the internal tenant route while the
/// visitor keeps seeing their own URL; everything else is left untouched.
pub async fn rewrite_tenant_requests(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let host = request_host(request.headers(), request.uri());
    let decision = state.router.decide(host.as_deref(), request.uri().path());

    match &decision {
        RouteDecision::Tenant(slug) => {
            let original = request.uri().clone();
            match rewritten_uri(&original, &decision) {
                Some(uri) => {
                    tracing::debug!("Rewriting {} on {:?} → {} (tenant '{}')", original, host, uri, slug);
                    request.extensions_mut().insert(OriginalUri(original));
                    *request.uri_mut() = uri;
                }
                None => {
                    tracing::warn!("⚠️ Could not rewrite {} for tenant '{}'", original, slug);
                }
            }
        }
        RouteDecision::Passthrough => {
            tracing::debug!("Passthrough {}", request.uri().path());
        }
        RouteDecision::RootSite => {}
    }

    next.run(request).await
}

fn rewritten_uri(original: &Uri, decision: &RouteDecision) -> Option<Uri> {
    let path = decision.rewritten_path()?;
    let mut parts = original.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path).ok()?);
    Uri::from_parts(parts).ok()
}
