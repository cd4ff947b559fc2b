use crate::config::RoutingConfig;
use crate::core::resolver::HostResolver;
use crate::domain::model::TenantSlug;

/// Internal route prefix that tenant requests are rewritten to.
pub const TENANT_ROUTE_PREFIX: &str = "/_sites";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Static asset, reserved prefix or API endpoint: handled as-is on every host.
    Passthrough,
    /// No tenant: the marketing site handles the request unchanged.
    RootSite,
    /// Serve the tenant page; the client-visible URL is untouched.
    Tenant(TenantSlug),
}

impl RouteDecision {
    pub fn rewritten_path(&self) -> Option<String> {
        match self {
            RouteDecision::Tenant(slug) => Some(tenant_route(slug)),
            _ => None,
        }
    }
}

pub fn tenant_route(slug: &TenantSlug) -> String {
    format!("{}/{}", TENANT_ROUTE_PREFIX, slug)
}

#[derive(Debug, Clone)]
pub struct RequestRouter {
    resolver: HostResolver,
    passthrough_prefixes: Vec<String>,
    asset_extensions: Vec<String>,
}

impl RequestRouter {
    pub fn new(resolver: HostResolver, routing: &RoutingConfig) -> Self {
        Self {
            resolver,
            passthrough_prefixes: routing.passthrough_prefixes.clone(),
            asset_extensions: routing
                .asset_extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn resolver(&self) -> &HostResolver {
        &self.resolver
    }

    pub fn is_passthrough(&self, path: &str) -> bool {
        if self
            .passthrough_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
        {
            return true;
        }

        let file_name = path.rsplit('/').next().unwrap_or_default();
        match file_name.rsplit_once('.') {
            Some((_, ext)) => {
                let ext = ext.to_ascii_lowercase();
                self.asset_extensions.iter().any(|allowed| *allowed == ext)
            }
            None => false,
        }
    }

    pub fn decide(&self, host: Option<&str>, path: &str) -> RouteDecision {
        if self.is_passthrough(path) {
            return RouteDecision::Passthrough;
        }
        match self.resolver.resolve_host(host) {
            Some(slug) => RouteDecision::Tenant(slug),
            None => RouteDecision::RootSite,
        }
    }
}
