pub mod binder;
pub mod forms;
pub mod loader;
pub mod pricing;
pub mod rate_limit;
pub mod resolver;
pub mod routing;
pub mod theme;
pub mod vcard;

pub use crate::domain::model::{ContentDocument, LoadOutcome, TenantSlug};
pub use crate::domain::ports::{ContentStore, EmailSender, RateLimitStore};
pub use crate::utils::error::Result;
