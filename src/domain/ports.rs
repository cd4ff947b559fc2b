use crate::domain::model::{OutgoingEmail, SentEmail};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Read-only access to tenant content documents.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// `Ok(None)` when nothing is stored under `key`.
    async fn read_document(&self, key: &str) -> Result<Option<Vec<u8>>>;

    fn describe(&self) -> String;
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<SentEmail>;
}

/// Sliding-window hit log keyed by an opaque string.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Records a hit at `now_ms` unless `max_hits` hits already fall inside
    /// `(now_ms - window, now_ms]`. Returns whether the hit was accepted.
    async fn try_record_hit(
        &self,
        key: &str,
        now_ms: i64,
        window: Duration,
        max_hits: u32,
    ) -> Result<bool>;
}
