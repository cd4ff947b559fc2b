use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub type ExtraFields = serde_json::Map<String, serde_json::Value>;

/// Normalized tenant identifier taken from a subdomain label.
///
/// Only `[a-z0-9-]`, 1 to 63 characters (a single DNS label), so a slug can be joined into a
/// content key without escaping the tenant's directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TenantSlug(String);

impl TenantSlug {
    pub const MAX_LEN: usize = 63;

    pub fn parse(raw: &str) -> Option<Self> {
        let slug = raw.trim().to_ascii_lowercase();
        if slug.is_empty() || slug.len() > Self::MAX_LEN {
            return None;
        }
        if !slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return None;
        }
        Some(Self(slug))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TenantSlug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub subdomain: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Button {
    pub text: String,
    pub variant: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeroSection {
    pub title: String,
    pub subtitle: String,
    pub background_image: String,
    pub buttons: Vec<Button>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Feature {
    pub icon: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AboutSection {
    pub title: String,
    pub paragraphs: Vec<String>,
    pub features: Vec<Feature>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryItem {
    pub title: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GallerySection {
    pub title: String,
    pub subtitle: String,
    pub items: Vec<GalleryItem>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialHandle {
    pub handle: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CallToAction {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactSection {
    pub title: String,
    pub subtitle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<SocialHandle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta: Option<CallToAction>,
    pub buttons: Vec<Button>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_card: Option<BusinessCard>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Footer content is entirely tenant-authored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FooterSection(pub ExtraFields);

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessCard {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Fonts {
    pub heading: String,
    pub body: String,
}

/// One tenant's page content and theme, authored at deploy time.
///
/// `metadata` and the five sections must be present; everything inside a section is optional
/// and unknown keys are carried through in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDocument {
    pub metadata: DocumentMetadata,
    pub hero: HeroSection,
    pub about: AboutSection,
    pub gallery: GallerySection,
    pub contact: ContactSection,
    pub footer: FooterSection,
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fonts: Option<Fonts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_card: Option<BusinessCard>,
}

impl ContentDocument {
    /// Top-level card first, then the one nested under `contact`.
    pub fn business_card(&self) -> Option<&BusinessCard> {
        self.business_card
            .as_ref()
            .or(self.contact.business_card.as_ref())
    }
}

/// Outcome of the tenant pipeline for one request.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Found(ContentDocument),
    NotFound,
}

impl LoadOutcome {
    pub fn into_document(self) -> Option<ContentDocument> {
        match self {
            LoadOutcome::Found(doc) => Some(doc),
            LoadOutcome::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, LoadOutcome::Found(_))
    }
}

/// A message handed to the email provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SentEmail {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_is_lowercased_and_validated() {
        assert_eq!(TenantSlug::parse("Acme").unwrap().as_str(), "acme");
        assert_eq!(TenantSlug::parse("sweets-by-sami").unwrap().as_str(), "sweets-by-sami");
        assert!(TenantSlug::parse("").is_none());
        assert!(TenantSlug::parse("..").is_none());
        assert!(TenantSlug::parse("a/b").is_none());
        assert!(TenantSlug::parse("a.b").is_none());
        assert!(TenantSlug::parse(&"x".repeat(64)).is_none());
    }

    #[test]
    fn document_keeps_unknown_section_fields() {
        let json = serde_json::json!({
            "metadata": {"title": "Acme", "description": "Widgets"},
            "hero": {"title": "Hi", "backgroundImage": "/bg.jpg", "badge": "New"},
            "about": {},
            "gallery": {"items": [{"title": "One", "image": "/1.jpg"}]},
            "contact": {"businessCard": {"name": "Acme", "website": "https://acme.test"}},
            "footer": {"copyright": "2025"},
            "colors": {"primary": "#ff0000"}
        });
        let doc: ContentDocument = serde_json::from_value(json).unwrap();

        assert_eq!(doc.hero.background_image, "/bg.jpg");
        assert_eq!(doc.hero.extra["badge"], "New");
        assert_eq!(doc.footer.0["copyright"], "2025");
        assert_eq!(doc.business_card().unwrap().name, "Acme");
        assert_eq!(doc.metadata.subdomain, "");
    }

    #[test]
    fn document_without_sections_is_rejected() {
        let json = serde_json::json!({
            "metadata": {"title": "Acme", "description": "Widgets"},
            "colors": {}
        });
        assert!(serde_json::from_value::<ContentDocument>(json).is_err());
    }
}
