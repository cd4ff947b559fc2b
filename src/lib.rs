pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::{build_app, AppState};
pub use config::SiteConfig;
pub use crate::core::resolver::HostResolver;
pub use domain::model::{ContentDocument, TenantSlug};
pub use utils::error::{Result, SiteError};
