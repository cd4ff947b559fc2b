use crate::utils::error::{Result, SiteError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub server: ServerConfig,
    pub domains: DomainConfig,
    pub routing: RoutingConfig,
    pub content: ContentConfig,
    pub email: EmailConfig,
    pub rate_limit: RateLimitConfig,
    pub overrides: Vec<TenantOverride>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Static files of the marketing site.
    pub public_root: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".to_string(),
            public_root: "./public".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainConfig {
    pub apex: String,
    pub preview_suffix: String,
    pub dev_host: String,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            apex: "sitesbystephens.com".to_string(),
            preview_suffix: ".vercel.app".to_string(),
            dev_host: "localhost".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Path prefixes that are never rewritten to a tenant page.
    pub passthrough_prefixes: Vec<String>,
    /// File extensions (without the dot) served as static assets on every host.
    pub asset_extensions: Vec<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            passthrough_prefixes: ["/api/", "/clients/", "/_assets/"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            asset_extensions: [
                "ico", "png", "jpg", "jpeg", "svg", "gif", "webp", "woff", "woff2", "ttf", "eot",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentBackend {
    Local,
    S3,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub backend: ContentBackend,
    /// Directory for the local backend, key prefix for S3.
    pub root: String,
    pub document_name: String,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            backend: ContentBackend::Local,
            root: "./content".to_string(),
            document_name: "data.json".to_string(),
            s3_bucket: None,
            s3_region: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    pub contact_from: String,
    pub contact_to: String,
    pub request_from: String,
    pub request_to: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.resend.com/emails".to_string(),
            api_key: None,
            timeout_seconds: 10,
            contact_from: "forms@sitesbystephens.com".to_string(),
            contact_to: "hello@sitesbystephens.com".to_string(),
            request_from: "noreply@sitesbystephens.com".to_string(),
            request_to: "contact@sitesbystephens.com".to_string(),
        }
    }
}

impl EmailConfig {
    /// Configured key, else `RESEND_API_KEY`. Unsubstituted `${...}` placeholders count as unset.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty() && !ENV_VAR_PATTERN.is_match(k))
            .or_else(|| std::env::var("RESEND_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateLimitBackend {
    Memory,
    Redis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub backend: RateLimitBackend,
    pub redis_url: Option<String>,
    pub namespace: String,
    pub window_seconds: u64,
    pub contact_max: u32,
    pub request_max: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            backend: RateLimitBackend::Memory,
            redis_url: None,
            namespace: "multisite".to_string(),
            window_seconds: 60 * 60,
            contact_max: 5,
            request_max: 3,
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_seconds)
    }
}

/// Static per-tenant exceptions, keyed by slug and independent of the document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TenantOverride {
    pub slug: String,
    pub icon: Option<String>,
    pub hide_contact: bool,
    pub hero_instagram: bool,
}

impl SiteConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SiteError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${RESEND_API_KEY})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("server.bind", &self.server.bind)?;
        if self.server.bind.parse::<std::net::SocketAddr>().is_err() {
            return Err(SiteError::InvalidConfigValueError {
                field: "server.bind".to_string(),
                value: self.server.bind.clone(),
                reason: "Expected an address like 0.0.0.0:3000".to_string(),
            });
        }
        validation::validate_path("server.public_root", &self.server.public_root)?;

        validation::validate_domain("domains.apex", &self.domains.apex)?;
        validation::validate_domain("domains.preview_suffix", &self.domains.preview_suffix)?;
        validation::validate_domain("domains.dev_host", &self.domains.dev_host)?;

        for prefix in &self.routing.passthrough_prefixes {
            if !prefix.starts_with('/') {
                return Err(SiteError::InvalidConfigValueError {
                    field: "routing.passthrough_prefixes".to_string(),
                    value: prefix.clone(),
                    reason: "Prefixes must start with '/'".to_string(),
                });
            }
        }

        validation::validate_path("content.root", &self.content.root)?;
        validation::validate_file_name("content.document_name", &self.content.document_name)?;
        if self.content.backend == ContentBackend::S3 {
            let bucket = validation::validate_required_field("content.s3_bucket", &self.content.s3_bucket)?;
            validation::validate_non_empty_string("content.s3_bucket", bucket)?;
        }

        validation::validate_url("email.endpoint", &self.email.endpoint)?;
        validation::validate_positive_number("email.timeout_seconds", self.email.timeout_seconds, 1)?;

        validation::validate_positive_number(
            "rate_limit.window_seconds",
            self.rate_limit.window_seconds,
            1,
        )?;
        validation::validate_positive_number(
            "rate_limit.contact_max",
            self.rate_limit.contact_max.into(),
            1,
        )?;
        validation::validate_positive_number(
            "rate_limit.request_max",
            self.rate_limit.request_max.into(),
            1,
        )?;
        if self.rate_limit.backend == RateLimitBackend::Redis {
            let url = validation::validate_required_field(
                "rate_limit.redis_url",
                &self.rate_limit.redis_url,
            )?;
            validation::validate_non_empty_string("rate_limit.redis_url", url)?;
        }

        for entry in &self.overrides {
            if crate::domain::model::TenantSlug::parse(&entry.slug).is_none() {
                return Err(SiteError::InvalidConfigValueError {
                    field: "overrides.slug".to_string(),
                    value: entry.slug.clone(),
                    reason: "Not a valid tenant slug".to_string(),
                });
            }
        }

        tracing::debug!("✅ Site configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = SiteConfig::from_toml_str("").unwrap();

        assert_eq!(config.domains.apex, "sitesbystephens.com");
        assert_eq!(config.content.document_name, "data.json");
        assert_eq!(config.rate_limit.contact_max, 5);
        assert_eq!(config.rate_limit.request_max, 3);
        assert_eq!(config.rate_limit.window(), Duration::from_secs(3600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[server]
bind = "127.0.0.1:8080"
public_root = "./site"

[domains]
apex = "example.org"

[content]
backend = "s3"
root = "tenants"
s3_bucket = "example-content"

[email]
endpoint = "http://localhost:9999/emails"
contact_to = "owner@example.org"

[rate_limit]
backend = "memory"
window_seconds = 60
contact_max = 2

[[overrides]]
slug = "acme"
icon = "/acme.png"
hide_contact = true
"#;

        let config = SiteConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.domains.apex, "example.org");
        assert_eq!(config.domains.dev_host, "localhost");
        assert_eq!(config.content.backend, ContentBackend::S3);
        assert_eq!(config.email.contact_to, "owner@example.org");
        assert_eq!(config.email.request_to, "contact@sitesbystephens.com");
        assert_eq!(config.overrides.len(), 1);
        assert!(config.overrides[0].hide_contact);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("MULTISITE_TEST_APEX", "substituted.test");

        let config = SiteConfig::from_toml_str(
            r#"
[domains]
apex = "${MULTISITE_TEST_APEX}"
"#,
        )
        .unwrap();
        assert_eq!(config.domains.apex, "substituted.test");

        std::env::remove_var("MULTISITE_TEST_APEX");
    }

    #[test]
    fn test_unsubstituted_api_key_counts_as_unset() {
        let email = EmailConfig {
            api_key: Some("${MULTISITE_TEST_UNSET_KEY}".to_string()),
            ..EmailConfig::default()
        };
        if std::env::var("RESEND_API_KEY").is_err() {
            assert_eq!(email.resolved_api_key(), None);
        }

        let email = EmailConfig {
            api_key: Some("re_live".to_string()),
            ..EmailConfig::default()
        };
        assert_eq!(email.resolved_api_key().as_deref(), Some("re_live"));
    }

    #[test]
    fn test_config_validation() {
        let config = SiteConfig::from_toml_str(
            r#"
[email]
endpoint = "invalid-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = SiteConfig::from_toml_str(
            r#"
[content]
backend = "s3"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = SiteConfig::from_toml_str(
            r#"
[[overrides]]
slug = "../etc"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nbind = \"127.0.0.1:4000\"\n")
            .unwrap();

        let config = SiteConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:4000");
    }
}
