use crate::config::SiteConfig;
use crate::core::binder::OverrideTable;
use crate::core::forms::{Mailbox, SiteLabel};
use crate::core::loader::ContentLoader;
use crate::core::rate_limit::RateLimiter;
use crate::core::resolver::HostResolver;
use crate::core::routing::RequestRouter;
use crate::domain::ports::{ContentStore, EmailSender, RateLimitStore};
use std::sync::Arc;

/// Shared, read-only handles for every request. Cloned per handler call.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SiteConfig>,
    pub router: Arc<RequestRouter>,
    pub loader: ContentLoader,
    pub overrides: Arc<OverrideTable>,
    pub email: Arc<dyn EmailSender>,
    pub contact_limiter: RateLimiter,
    pub request_limiter: RateLimiter,
}

impl AppState {
    pub fn new(
        config: SiteConfig,
        store: Arc<dyn ContentStore>,
        rate_store: Arc<dyn RateLimitStore>,
        email: Arc<dyn EmailSender>,
    ) -> Self {
        let resolver = HostResolver::new(&config.domains);
        let router = RequestRouter::new(resolver, &config.routing);
        let loader = ContentLoader::new(store, config.content.document_name.clone());
        let overrides = OverrideTable::with_configured(&config.overrides);

        let window = config.rate_limit.window();
        let contact_limiter = RateLimiter::new(
            rate_store.clone(),
            "contact",
            window,
            config.rate_limit.contact_max,
        );
        let request_limiter =
            RateLimiter::new(rate_store, "request", window, config.rate_limit.request_max);

        Self {
            config: Arc::new(config),
            router: Arc::new(router),
            loader,
            overrides: Arc::new(overrides),
            email,
            contact_limiter,
            request_limiter,
        }
    }

    pub fn resolver(&self) -> &HostResolver {
        self.router.resolver()
    }

    pub fn site_label(&self, host: Option<&str>) -> SiteLabel {
        SiteLabel::new(self.resolver().resolve_host(host), self.resolver().apex())
    }

    pub fn contact_mailbox(&self) -> Mailbox<'_> {
        Mailbox {
            from: &self.config.email.contact_from,
            to: &self.config.email.contact_to,
        }
    }

    pub fn request_mailbox(&self) -> Mailbox<'_> {
        Mailbox {
            from: &self.config.email.request_from,
            to: &self.config.email.request_to,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("router", &self.router)
            .field("loader", &self.loader)
            .field("contact_limiter", &self.contact_limiter)
            .field("request_limiter", &self.request_limiter)
            .finish_non_exhaustive()
    }
}
