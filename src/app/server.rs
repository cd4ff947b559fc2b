use crate::app::rewrite::rewrite_tenant_requests;
use crate::app::routes::{contact, health, marketing, request, tenant, test_email};
use crate::app::state::AppState;
use crate::utils::error::Result;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;

/// Route table without the tenant rewrite.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/contact", post(contact::submit_contact))
        .route("/api/request", post(request::submit_request))
        .route("/api/test-email", get(test_email::send_test_email))
        .route("/_sites", get(tenant::tenant_page_from_host))
        .route("/_sites/:subdomain", get(tenant::tenant_page))
        .fallback(marketing::serve_public)
        .with_state(state)
}

/// The full application. The rewrite wraps the router instead of being a route layer,
/// because it has to change the URI before a route is matched.
pub fn build_app(state: AppState) -> Router {
    let rewrite = axum::middleware::from_fn_with_state(state.clone(), rewrite_tenant_requests);
    let routed = tower::Layer::layer(&rewrite, build_router(state));
    Router::new().fallback_service(routed)
}

pub async fn serve(app: Router, bind: &str) -> Result<()> {
    let listener = TcpListener::bind(bind).await?;
    tracing::info!("🚀 Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("❌ Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
