// Adapters layer: concrete implementations of the domain ports (storage, email, rate limit)

pub mod email;
pub mod rate_limit;
pub mod storage;

pub use email::ResendClient;
pub use rate_limit::MemoryRateLimitStore;
pub use storage::LocalContentStore;

#[cfg(feature = "redis")]
pub use rate_limit::RedisRateLimitStore;
#[cfg(feature = "s3")]
pub use storage::S3ContentStore;
