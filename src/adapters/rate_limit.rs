use crate::core::RateLimitStore;
use crate::utils::error::{Result, SiteError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Sweep expired keys once the map grows past this many entries.
const CLEANUP_THRESHOLD: usize = 1000;

/// Process-local hit log. Counts are not shared between instances.
#[derive(Debug, Default)]
pub struct MemoryRateLimitStore {
    hits: Mutex<HashMap<String, Vec<i64>>>,
}

impl MemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracked_keys(&self) -> usize {
        self.hits.lock().map(|hits| hits.len()).unwrap_or(0)
    }
}

fn window_ms(window: Duration) -> i64 {
    i64::try_from(window.as_millis()).unwrap_or(i64::MAX)
}

#[async_trait]
impl RateLimitStore for MemoryRateLimitStore {
    async fn try_record_hit(
        &self,
        key: &str,
        now_ms: i64,
        window: Duration,
        max_hits: u32,
    ) -> Result<bool> {
        let window_ms = window_ms(window);
        let mut hits = self
            .hits
            .lock()
            .map_err(|_| SiteError::RateLimitStoreError {
                message: "rate limit map lock poisoned".to_string(),
            })?;

        let recent: Vec<i64> = hits
            .get(key)
            .map(|timestamps| {
                timestamps
                    .iter()
                    .copied()
                    .filter(|ts| now_ms - ts < window_ms)
                    .collect()
            })
            .unwrap_or_default();

        if recent.len() >= max_hits as usize {
            hits.insert(key.to_string(), recent);
            return Ok(false);
        }

        let mut recent = recent;
        recent.push(now_ms);
        hits.insert(key.to_string(), recent);

        if hits.len() > CLEANUP_THRESHOLD {
            hits.retain(|_, timestamps| {
                timestamps.retain(|ts| now_ms - ts < window_ms);
                !timestamps.is_empty()
            });
        }

        Ok(true)
    }
}

#[cfg(feature = "redis")]
pub use redis_store::RedisRateLimitStore;

#[cfg(feature = "redis")]
mod redis_store {
    use super::window_ms;
    use crate::core::RateLimitStore;
    use crate::utils::error::{Result, SiteError};
    use async_trait::async_trait;
    use redis::aio::ConnectionManager;
    use std::time::Duration;

    // Trim, count, then record in one round trip so concurrent instances agree.
    // Members take their suffix from a server-side counter (KEYS[2]), so hits
    // recorded by different instances in the same millisecond never collide.
    const RECORD_HIT_SCRIPT: &str = r#"
redis.call('ZREMRANGEBYSCORE', KEYS[1], '-inf', tonumber(ARGV[1]) - tonumber(ARGV[2]))
if redis.call('ZCARD', KEYS[1]) >= tonumber(ARGV[3]) then
  return 0
end
local seq = redis.call('INCR', KEYS[2])
redis.call('ZADD', KEYS[1], ARGV[1], ARGV[1] .. '-' .. seq)
redis.call('PEXPIRE', KEYS[1], ARGV[2])
redis.call('PEXPIRE', KEYS[2], ARGV[2])
return 1
"#;

    /// Hit log in Redis sorted sets, shared by every instance pointing at the same server.
    #[derive(Clone)]
    pub struct RedisRateLimitStore {
        connection: ConnectionManager,
        namespace: String,
        script: redis::Script,
    }

    impl std::fmt::Debug for RedisRateLimitStore {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("RedisRateLimitStore")
                .field("connection", &"<ConnectionManager>")
                .field("namespace", &self.namespace)
                .finish()
        }
    }

    impl RedisRateLimitStore {
        pub fn new(connection: ConnectionManager, namespace: impl Into<String>) -> Self {
            Self {
                connection,
                namespace: namespace.into(),
                script: redis::Script::new(RECORD_HIT_SCRIPT),
            }
        }

        pub async fn connect(url: &str, namespace: impl Into<String>) -> Result<Self> {
            let client = redis::Client::open(url).map_err(store_error)?;
            let connection = ConnectionManager::new(client).await.map_err(store_error)?;
            Ok(Self::new(connection, namespace))
        }
    }

    // Hash tag keeps both keys in one cluster slot.
    pub(super) fn script_keys(namespace: &str, key: &str) -> (String, String) {
        let tagged = format!("{}:ratelimit:{{{}}}", namespace, key);
        (tagged.clone(), format!("{}:seq", tagged))
    }

    fn store_error(e: redis::RedisError) -> SiteError {
        SiteError::RateLimitStoreError {
            message: e.to_string(),
        }
    }

    #[async_trait]
    impl RateLimitStore for RedisRateLimitStore {
        async fn try_record_hit(
            &self,
            key: &str,
            now_ms: i64,
            window: Duration,
            max_hits: u32,
        ) -> Result<bool> {
            let (hits, sequence) = script_keys(&self.namespace, key);
            let mut connection = self.connection.clone();
            let accepted: i64 = self
                .script
                .key(hits)
                .key(sequence)
                .arg(now_ms)
                .arg(window_ms(window))
                .arg(max_hits)
                .invoke_async(&mut connection)
                .await
                .map_err(store_error)?;
            Ok(accepted == 1)
        }
    }
}
