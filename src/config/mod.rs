pub mod toml_config;

pub use toml_config::{
    ContentBackend, ContentConfig, DomainConfig, EmailConfig, RateLimitBackend, RateLimitConfig,
    RoutingConfig, ServerConfig, SiteConfig, TenantOverride,
};

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "multisite")]
#[command(about = "Serves the marketing site and per-tenant micro-sites")]
pub struct CliConfig {
    #[arg(long, short = 'c', help = "Path to a TOML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Listen address, overrides [server].bind")]
    pub bind: Option<String>,

    #[arg(long, help = "Tenant content directory, overrides [content].root")]
    pub content_root: Option<String>,

    #[arg(long, help = "Marketing site directory, overrides [server].public_root")]
    pub public_root: Option<String>,

    #[arg(long, help = "Apex domain, overrides [domains].apex")]
    pub apex: Option<String>,

    #[arg(long, help = "Emit JSON logs")]
    pub json_logs: bool,

    #[arg(long, short = 'v', help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// File settings (or defaults) with command-line flags applied on top.
    pub fn load_site_config(&self) -> Result<SiteConfig> {
        let mut config = match &self.config {
            Some(path) => SiteConfig::from_file(path)?,
            None => SiteConfig::default(),
        };

        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(root) = &self.content_root {
            config.content.root = root.clone();
        }
        if let Some(root) = &self.public_root {
            config.server.public_root = root.clone();
        }
        if let Some(apex) = &self.apex {
            config.domains.apex = apex.to_ascii_lowercase();
        }

        Ok(config)
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = CliConfig::parse_from([
            "multisite",
            "--bind",
            "127.0.0.1:9000",
            "--content-root",
            "/srv/content",
            "--apex",
            "Example.ORG",
        ]);
        let config = cli.load_site_config().unwrap();

        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert_eq!(config.content.root, "/srv/content");
        assert_eq!(config.domains.apex, "example.org");
        assert_eq!(config.server.public_root, "./public");
    }
}
