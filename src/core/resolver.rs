use crate::config::DomainConfig;
use crate::domain::model::TenantSlug;

const RESERVED_WWW: &str = "www";

/// Maps a `Host` header to the tenant it addresses.
///
/// Rules, first match wins:
/// 1. `{label}.{apex}` where `label` is neither `www` nor the apex's own name.
/// 2. Preview hosts `{slug}-{project}.{preview_suffix}`: the text before the first hyphen.
/// 3. Local development hosts `{slug}.{dev_host}`.
///
/// Everything else, including hosts that cannot be parsed, is the root marketing site.
#[derive(Debug, Clone)]
pub struct HostResolver {
    apex: String,
    apex_suffix: String,
    apex_name: String,
    preview_suffix: String,
    dev_host: String,
    dev_suffix: String,
}

impl HostResolver {
    pub fn new(domains: &DomainConfig) -> Self {
        let apex = domains.apex.trim().trim_matches('.').to_ascii_lowercase();
        let apex_name = apex.split('.').next().unwrap_or_default().to_string();
        let dev_host = domains.dev_host.trim().trim_matches('.').to_ascii_lowercase();
        let preview_suffix = domains.preview_suffix.trim().to_ascii_lowercase();

        Self {
            apex_suffix: format!(".{}", apex),
            apex,
            apex_name,
            preview_suffix,
            dev_suffix: format!(".{}", dev_host),
            dev_host,
        }
    }

    pub fn apex(&self) -> &str {
        &self.apex
    }

    /// Tenant addressed by `host`, if any. Never fails.
    pub fn resolve_host(&self, host: Option<&str>) -> Option<TenantSlug> {
        let host = host?.trim().to_ascii_lowercase();
        let host = host.split(':').next().unwrap_or_default();
        if host.is_empty() {
            return None;
        }

        let candidate = self
            .from_apex(host)
            .or_else(|| self.from_preview(host))
            .or_else(|| self.from_dev_host(host))?;

        let slug = TenantSlug::parse(candidate);
        if slug.is_none() {
            tracing::debug!("Ignoring unusable subdomain label '{}' in host {}", candidate, host);
        }
        slug
    }

    /// A route parameter set by the rewrite step wins over host parsing.
    pub fn resolve(&self, route_param: Option<&str>, host: Option<&str>) -> Option<TenantSlug> {
        match route_param.map(str::trim).filter(|p| !p.is_empty()) {
            Some(param) => TenantSlug::parse(param),
            None => self.resolve_host(host),
        }
    }

    fn from_apex<'h>(&self, host: &'h str) -> Option<&'h str> {
        let label = host.strip_suffix(self.apex_suffix.as_str())?;
        if label.is_empty() || label == RESERVED_WWW || label == self.apex_name {
            return None;
        }
        Some(label)
    }

    fn from_preview<'h>(&self, host: &'h str) -> Option<&'h str> {
        if self.preview_suffix.is_empty() || !host.contains(self.preview_suffix.as_str()) {
            return None;
        }
        if host.split('.').count() < 3 {
            return None;
        }
        let first = host.split('.').next()?;
        let (slug, _project) = first.split_once('-')?;
        if slug.is_empty() || slug == RESERVED_WWW {
            return None;
        }
        Some(slug)
    }

    fn from_dev_host<'h>(&self, host: &'h str) -> Option<&'h str> {
        if !host.contains(self.dev_suffix.as_str()) {
            return None;
        }
        let mut labels = host.split('.');
        let first = labels.next()?;
        if labels.next().is_none() {
            return None;
        }
        if first.is_empty() || first == self.dev_host || first == RESERVED_WWW {
            return None;
        }
        Some(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> HostResolver {
        HostResolver::new(&DomainConfig::default())
    }

    fn slug(host: &str) -> Option<String> {
        resolver()
            .resolve_host(Some(host))
            .map(|s| s.as_str().to_string())
    }

    #[test]
    fn apex_subdomains_resolve() {
        assert_eq!(slug("acme.sitesbystephens.com").as_deref(), Some("acme"));
        assert_eq!(slug("acme.sitesbystephens.com:443").as_deref(), Some("acme"));
        assert_eq!(slug("ACME.SitesByStephens.com").as_deref(), Some("acme"));
    }

    #[test]
    fn apex_and_reserved_labels_are_the_root_site() {
        assert_eq!(slug("sitesbystephens.com"), None);
        assert_eq!(slug("www.sitesbystephens.com"), None);
        assert_eq!(slug("sitesbystephens.sitesbystephens.com"), None);
        assert_eq!(slug(".sitesbystephens.com"), None);
    }

    #[test]
    fn nested_labels_are_not_slugs() {
        assert_eq!(slug("a.b.sitesbystephens.com"), None);
    }

    #[test]
    fn preview_hosts_split_on_first_hyphen() {
        assert_eq!(
            slug("acme-sitesbystephens.vercel.app").as_deref(),
            Some("acme")
        );
        assert_eq!(
            slug("sweetsbysami-sitesbystephens-git-main.vercel.app").as_deref(),
            Some("sweetsbysami")
        );
        assert_eq!(slug("sitesbystephens.vercel.app"), None);
        assert_eq!(slug("-project.vercel.app"), None);
        assert_eq!(slug("www-project.vercel.app"), None);
    }

    #[test]
    fn local_hosts_use_first_label() {
        assert_eq!(slug("rvssa.localhost:3000").as_deref(), Some("rvssa"));
        assert_eq!(slug("rvssa.localhost").as_deref(), Some("rvssa"));
        assert_eq!(slug("localhost:3000"), None);
        assert_eq!(slug("localhost"), None);
        assert_eq!(slug("www.localhost:3000"), None);
    }

    #[test]
    fn unparseable_hosts_are_the_root_site() {
        let resolver = resolver();
        assert_eq!(resolver.resolve_host(None), None);
        assert_eq!(resolver.resolve_host(Some("")), None);
        assert_eq!(resolver.resolve_host(Some(":3000")), None);
        assert_eq!(resolver.resolve_host(Some("[::1]:3000")), None);
        assert_eq!(resolver.resolve_host(Some("example.com")), None);
        assert_eq!(resolver.resolve_host(Some("ac_me.sitesbystephens.com")), None);
    }

    #[test]
    fn route_param_takes_precedence() {
        let resolver = resolver();
        let resolved = resolver.resolve(Some("beta"), Some("acme.sitesbystephens.com"));
        assert_eq!(resolved.unwrap().as_str(), "beta");

        let resolved = resolver.resolve(Some(""), Some("acme.sitesbystephens.com"));
        assert_eq!(resolved.unwrap().as_str(), "acme");

        assert_eq!(resolver.resolve(Some("../secrets"), None), None);
    }

    #[test]
    fn resolution_is_idempotent() {
        let resolver = resolver();
        let first = resolver.resolve_host(Some("acme.sitesbystephens.com"));
        let second = resolver.resolve_host(Some("acme.sitesbystephens.com"));
        assert_eq!(first, second);
    }

    #[test]
    fn custom_apex() {
        let resolver = HostResolver::new(&DomainConfig {
            apex: "example.org".to_string(),
            ..DomainConfig::default()
        });
        assert_eq!(
            resolver.resolve_host(Some("shop.example.org")).unwrap().as_str(),
            "shop"
        );
        assert_eq!(resolver.resolve_host(Some("example.example.org")), None);
        assert_eq!(resolver.resolve_host(Some("shop.sitesbystephens.com")), None);
    }
}
