use crate::app::render::{render_not_found, render_tenant_page};
use crate::app::rewrite::request_host;
use crate::app::state::AppState;
use crate::core::binder::bind;
use crate::domain::model::{LoadOutcome, TenantSlug};
use axum::extract::{OriginalUri, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};

/// `/_sites/:subdomain`, the target of tenant rewrites.
///
/// A tenant host may only render its own slug.
pub async fn tenant_page(
    State(state): State<AppState>,
    Path(subdomain): Path<String>,
    OriginalUri(original): OriginalUri,
    headers: HeaderMap,
) -> Response {
    let host = request_host(&headers, &original);
    if let Some(own) = state.resolver().resolve_host(host.as_deref()) {
        if TenantSlug::parse(subdomain.trim()).as_ref() != Some(&own) {
            tracing::warn!("⚠️ Host {:?} asked for tenant '{}'", host, subdomain);
            return not_found(&state);
        }
    }
    render(&state, Some(&subdomain), host.as_deref()).await
}

/// `/_sites` without a parameter: the tenant comes from the host.
pub async fn tenant_page_from_host(
    State(state): State<AppState>,
    OriginalUri(original): OriginalUri,
    headers: HeaderMap,
) -> Response {
    let host = request_host(&headers, &original);
    render(&state, None, host.as_deref()).await
}

async fn render(state: &AppState, route_param: Option<&str>, host: Option<&str>) -> Response {
    let Some(slug) = state.resolver().resolve(route_param, host) else {
        tracing::debug!("No tenant for param {:?} / host {:?}", route_param, host);
        return not_found(state);
    };

    // 同一份文件同時供 metadata 與頁面內容使用
    let document = match state.loader.load(&slug).await {
        LoadOutcome::Found(document) => document,
        LoadOutcome::NotFound => return not_found(state),
    };

    let page = bind(&slug, &document, &state.overrides);
    match render_tenant_page(&page) {
        Ok(html) => {
            tracing::debug!("Rendered tenant page '{}'", slug);
            Html(html).into_response()
        }
        Err(e) => {
            tracing::error!("❌ Failed to render tenant page '{}': {}", slug, e);
            not_found(state)
        }
    }
}

fn not_found(state: &AppState) -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(render_not_found(state.resolver().apex())),
    )
        .into_response()
}
