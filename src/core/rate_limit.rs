use crate::domain::ports::RateLimitStore;
use crate::utils::error::{Result, SiteError};
use std::sync::Arc;
use std::time::Duration;

/// Per-endpoint submission limit keyed by client address and submitted email.
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    scope: &'static str,
    window: Duration,
    max_hits: u32,
}

impl RateLimiter {
    pub fn new(
        store: Arc<dyn RateLimitStore>,
        scope: &'static str,
        window: Duration,
        max_hits: u32,
    ) -> Self {
        Self {
            store,
            scope,
            window,
            max_hits,
        }
    }

    pub fn key(&self, client_ip: &str, email: &str) -> String {
        format!("{}:{}:{}", self.scope, client_ip, email.to_lowercase())
    }

    /// `Err(RateLimited)` once the window is full; otherwise records the submission.
    pub async fn check(&self, client_ip: &str, email: &str) -> Result<()> {
        let key = self.key(client_ip, email);
        let now_ms = chrono::Utc::now().timestamp_millis();

        let accepted = self
            .store
            .try_record_hit(&key, now_ms, self.window, self.max_hits)
            .await?;

        if accepted {
            Ok(())
        } else {
            tracing::info!("Rate limit exceeded for {} ({})", email, self.scope);
            Err(SiteError::RateLimited)
        }
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("scope", &self.scope)
            .field("window", &self.window)
            .field("max_hits", &self.max_hits)
            .finish()
    }
}
