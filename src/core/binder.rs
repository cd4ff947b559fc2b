use crate::config::TenantOverride;
use crate::core::theme::ThemeTokens;
use crate::core::vcard::business_card_vcard;
use crate::domain::model::{
    AboutSection, BusinessCard, ContactSection, ContentDocument, Fonts, FooterSection,
    GallerySection, HeroSection, SocialHandle, TenantSlug,
};
use serde::Serialize;
use std::collections::HashMap;

pub const DEFAULT_ICON: &str = "/icon.svg";
pub const NOT_FOUND_TITLE: &str = "Site Not Found";
pub const NOT_FOUND_DESCRIPTION: &str = "This site is not available";

/// Slug-keyed exceptions that do not live in the content documents.
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    entries: HashMap<String, TenantOverride>,
}

impl OverrideTable {
    pub fn builtin() -> Self {
        Self::from_entries([
            TenantOverride {
                slug: "sweetsbysami".to_string(),
                icon: Some("/cupcake.png".to_string()),
                hide_contact: true,
                hero_instagram: true,
            },
            TenantOverride {
                slug: "rvssa".to_string(),
                icon: Some("/clients/rvssa/images/target.png".to_string()),
                ..TenantOverride::default()
            },
        ])
    }

    /// Built-in table with configured entries replacing built-ins of the same slug.
    pub fn with_configured(configured: &[TenantOverride]) -> Self {
        let mut table = Self::builtin();
        for entry in configured {
            table
                .entries
                .insert(entry.slug.to_ascii_lowercase(), entry.clone());
        }
        table
    }

    pub fn from_entries(entries: impl IntoIterator<Item = TenantOverride>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|e| (e.slug.to_ascii_lowercase(), e))
                .collect(),
        }
    }

    pub fn get(&self, slug: &TenantSlug) -> Option<&TenantOverride> {
        self.entries.get(slug.as_str())
    }

    pub fn icon_for(&self, slug: &TenantSlug) -> &str {
        self.get(slug)
            .and_then(|o| o.icon.as_deref())
            .unwrap_or(DEFAULT_ICON)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub icon: String,
    pub apple_icon: String,
}

impl PageMetadata {
    pub fn not_found() -> Self {
        Self {
            title: NOT_FOUND_TITLE.to_string(),
            description: NOT_FOUND_DESCRIPTION.to_string(),
            icon: DEFAULT_ICON.to_string(),
            apple_icon: DEFAULT_ICON.to_string(),
        }
    }

    pub fn for_tenant(slug: &TenantSlug, document: &ContentDocument, overrides: &OverrideTable) -> Self {
        let icon = overrides.icon_for(slug).to_string();
        Self {
            title: document.metadata.title.clone(),
            description: document.metadata.description.clone(),
            apple_icon: icon.clone(),
            icon,
        }
    }
}

/// Sub-objects handed to the presentational layer, one per component.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSections {
    pub hero: HeroSection,
    /// Forwarded to the hero only for tenants that opt in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_instagram: Option<SocialHandle>,
    pub about: AboutSection,
    pub gallery: GallerySection,
    /// `None` when the tenant hides its contact section.
    pub contact: Option<ContactSection>,
    pub footer: FooterSection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessCardPayload {
    pub card: BusinessCard,
    pub vcard: String,
}

/// Everything one tenant render needs. Built fresh per request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantPage {
    pub slug: TenantSlug,
    pub metadata: PageMetadata,
    #[serde(skip)]
    pub theme: ThemeTokens,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fonts: Option<Fonts>,
    pub sections: PageSections,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_card: Option<BusinessCardPayload>,
}

pub fn bind(slug: &TenantSlug, document: &ContentDocument, overrides: &OverrideTable) -> TenantPage {
    let tenant_override = overrides.get(slug);
    let hide_contact = tenant_override.is_some_and(|o| o.hide_contact);
    let hero_instagram = tenant_override.is_some_and(|o| o.hero_instagram);

    let sections = PageSections {
        hero: document.hero.clone(),
        hero_instagram: if hero_instagram {
            document.contact.instagram.clone()
        } else {
            None
        },
        about: document.about.clone(),
        gallery: document.gallery.clone(),
        contact: if hide_contact {
            None
        } else {
            Some(document.contact.clone())
        },
        footer: document.footer.clone(),
    };

    let business_card = document.business_card().map(|card| BusinessCardPayload {
        vcard: business_card_vcard(card),
        card: card.clone(),
    });

    TenantPage {
        slug: slug.clone(),
        metadata: PageMetadata::for_tenant(slug, document, overrides),
        theme: ThemeTokens::from_colors(&document.colors),
        fonts: document.fonts.clone(),
        sections,
        business_card,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> ContentDocument {
        serde_json::from_value(serde_json::json!({
            "metadata": {"title": "Sweets by Sami", "description": "Cupcakes", "subdomain": "sweetsbysami"},
            "hero": {"title": "Fresh daily"},
            "about": {"title": "About"},
            "gallery": {"title": "Gallery"},
            "contact": {
                "title": "Say hi",
                "instagram": {"handle": "@sweetsbysami", "url": "https://instagram.com/sweetsbysami"},
                "businessCard": {"name": "Sweets by Sami", "website": "https://sweetsbysami.sitesbystephens.com"}
            },
            "footer": {"text": "Baked with love"},
            "colors": {"primary": "#f472b6", "primaryForeground": "#fff"}
        }))
        .unwrap()
    }

    fn slug(s: &str) -> TenantSlug {
        TenantSlug::parse(s).unwrap()
    }

    #[test]
    fn default_tenant_gets_default_icon_and_contact() {
        let page = bind(&slug("acme"), &document(), &OverrideTable::builtin());

        assert_eq!(page.metadata.title, "Sweets by Sami");
        assert_eq!(page.metadata.icon, DEFAULT_ICON);
        assert!(page.sections.contact.is_some());
        assert!(page.sections.hero_instagram.is_none());
        assert_eq!(page.theme.variables["primary-foreground"], "#fff");
    }

    #[test]
    fn builtin_override_changes_icon_and_sections() {
        let page = bind(&slug("sweetsbysami"), &document(), &OverrideTable::builtin());

        assert_eq!(page.metadata.icon, "/cupcake.png");
        assert_eq!(page.metadata.apple_icon, "/cupcake.png");
        assert!(page.sections.contact.is_none());
        assert_eq!(
            page.sections.hero_instagram.as_ref().unwrap().handle,
            "@sweetsbysami"
        );
    }

    #[test]
    fn configured_override_replaces_builtin() {
        let table = OverrideTable::with_configured(&[TenantOverride {
            slug: "rvssa".to_string(),
            icon: Some("/rvssa.svg".to_string()),
            ..TenantOverride::default()
        }]);
        assert_eq!(table.icon_for(&slug("rvssa")), "/rvssa.svg");
        assert_eq!(table.icon_for(&slug("sweetsbysami")), "/cupcake.png");
    }

    #[test]
    fn nested_business_card_produces_vcard() {
        let page = bind(&slug("acme"), &document(), &OverrideTable::default());
        let card = page.business_card.unwrap();
        assert!(card.vcard.starts_with("BEGIN:VCARD"));
        assert!(card.vcard.contains("URL:https://sweetsbysami.sitesbystephens.com"));
    }

    #[test]
    fn not_found_metadata() {
        let metadata = PageMetadata::not_found();
        assert_eq!(metadata.title, "Site Not Found");
        assert_eq!(metadata.description, "This site is not available");
    }
}
