//! Contact and website-request submissions, and the notification emails built from them.

use crate::core::pricing::{self, QuoteOptions};
use crate::domain::model::{OutgoingEmail, TenantSlug};
use crate::utils::error::{Result, SiteError};
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn escape_multiline(text: &str) -> String {
    escape_html(text).replace('\n', "<br>")
}

/// `imageGallery` → `Image Gallery`.
pub fn humanize_feature(key: &str) -> String {
    let mut words = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            words.push(' ');
        }
        words.push(c);
    }
    let words = words.trim();
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Optional text field that tolerates numbers and booleans (`"phone": 5551234`).
/// Arrays, objects and `null` read as absent.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Feature checkboxes; entries whose value is not a boolean are dropped.
fn lenient_features<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<BTreeMap<String, bool>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(entries) => Some(
            entries
                .into_iter()
                .filter_map(|(name, selected)| selected.as_bool().map(|b| (name, b)))
                .collect(),
        ),
        _ => None,
    })
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Which site a submission came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteLabel {
    tenant: Option<TenantSlug>,
    apex: String,
}

impl SiteLabel {
    pub fn new(tenant: Option<TenantSlug>, apex: impl Into<String>) -> Self {
        Self {
            tenant,
            apex: apex.into(),
        }
    }

    /// Subject prefix: `[slug]` or `[Main Site]`.
    pub fn tag(&self) -> String {
        match &self.tenant {
            Some(slug) => format!("[{}]", slug),
            None => "[Main Site]".to_string(),
        }
    }

    pub fn site(&self) -> String {
        match &self.tenant {
            Some(slug) => format!("{}.{}", slug, self.apex),
            None => "Main Marketing Site".to_string(),
        }
    }

    pub fn tenant(&self) -> Option<&TenantSlug> {
        self.tenant.as_ref()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Mailbox<'a> {
    pub from: &'a str,
    pub to: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactPayload {
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub message: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub company: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
    pub phone: Option<String>,
    pub company: Option<String>,
}

impl ContactPayload {
    pub fn validate(self) -> Result<ContactSubmission> {
        let (Some(name), Some(email), Some(message)) = (
            present(&self.name),
            present(&self.email),
            present(&self.message),
        ) else {
            return Err(SiteError::validation(
                "Missing required fields. Please fill in name, email, and message.",
            ));
        };

        if !is_valid_email(email) {
            return Err(SiteError::validation("Invalid email address"));
        }

        Ok(ContactSubmission {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
            phone: present(&self.phone).map(str::to_string),
            company: present(&self.company).map(str::to_string),
        })
    }
}

impl ContactSubmission {
    pub fn to_email(&self, site: &SiteLabel, mailbox: Mailbox<'_>, submitted_at: &str) -> OutgoingEmail {
        let tag = site.tag();
        let safe_name = escape_html(&self.name);
        let safe_email = escape_html(&self.email);

        let mut details = vec![
            format!("<p><strong>Name:</strong> {}</p>", safe_name),
            format!(
                "<p><strong>Email:</strong> <a href=\"mailto:{0}\">{0}</a></p>",
                safe_email
            ),
        ];
        if let Some(phone) = &self.phone {
            details.push(format!("<p><strong>Phone:</strong> {}</p>", escape_html(phone)));
        }
        if let Some(company) = &self.company {
            details.push(format!(
                "<p><strong>Company:</strong> {}</p>",
                escape_html(company)
            ));
        }
        details.push(format!(
            "<p><strong>Site:</strong> {}</p>",
            escape_html(&site.site())
        ));

        let html = format!(
            "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
             <h2>New Contact Form Submission {tag}</h2>\
             <h3>Contact Information</h3>{details}\
             <h3>Message</h3><div style=\"white-space: pre-wrap;\">{message}</div>\
             <p><strong>Submitted:</strong> {submitted_at}</p>\
             <p>Reply directly to this email to respond to {name}.</p></div>",
            tag = tag,
            details = details.join(""),
            message = escape_multiline(&self.message),
            submitted_at = submitted_at,
            name = safe_name,
        );

        let mut text = vec![
            format!("New Contact Form Submission {}", tag),
            String::new(),
            "Contact Information".to_string(),
            format!("Name: {}", self.name),
            format!("Email: {}", self.email),
        ];
        if let Some(phone) = &self.phone {
            text.push(format!("Phone: {}", phone));
        }
        if let Some(company) = &self.company {
            text.push(format!("Company: {}", company));
        }
        text.push(format!("Site: {}", site.site()));
        text.extend([
            String::new(),
            "Message".to_string(),
            self.message.clone(),
            String::new(),
            format!("Submitted: {}", submitted_at),
            String::new(),
            format!("Reply to: {}", self.email),
        ]);

        OutgoingEmail {
            from: mailbox.from.to_string(),
            to: vec![mailbox.to.to_string()],
            reply_to: Some(self.email.clone()),
            subject: format!("{} New Contact Form Submission from {}", tag, safe_name),
            html,
            text: text.join("\n"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WebsiteRequestPayload {
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub message: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub pages: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub seo_level: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub delivery_time: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub theme: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub support_level: Option<String>,
    #[serde(deserialize_with = "lenient_features")]
    pub features: Option<BTreeMap<String, bool>>,
    #[serde(deserialize_with = "lenient_string")]
    pub custom_features_text: Option<String>,
    /// Number or string, as sent by the wizard.
    pub estimated_price: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WebsiteRequest {
    pub name: String,
    pub email: String,
    pub message: Option<String>,
    pub pages: String,
    pub seo_level: String,
    pub delivery_time: String,
    pub theme: String,
    pub support_level: String,
    pub features: BTreeMap<String, bool>,
    pub custom_features_text: Option<String>,
    pub estimated_price: Option<String>,
}

impl WebsiteRequestPayload {
    pub fn validate(self) -> Result<WebsiteRequest> {
        let required = (
            present(&self.name),
            present(&self.email),
            present(&self.pages),
            present(&self.seo_level),
            present(&self.delivery_time),
            present(&self.theme),
            present(&self.support_level),
        );
        let (
            Some(name),
            Some(email),
            Some(pages),
            Some(seo_level),
            Some(delivery_time),
            Some(theme),
            Some(support_level),
        ) = required
        else {
            return Err(SiteError::validation("Missing required fields"));
        };

        if !is_valid_email(email) {
            return Err(SiteError::validation("Invalid email address"));
        }

        let estimated_price = match &self.estimated_price {
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::String(s)) if !s.trim().is_empty() => {
                Some(s.trim().trim_start_matches('$').to_string())
            }
            _ => None,
        };

        Ok(WebsiteRequest {
            name: name.to_string(),
            email: email.to_string(),
            message: present(&self.message).map(str::to_string),
            pages: pages.to_string(),
            seo_level: seo_level.to_string(),
            delivery_time: delivery_time.to_string(),
            theme: theme.to_string(),
            support_level: support_level.to_string(),
            features: self.features.unwrap_or_default(),
            custom_features_text: present(&self.custom_features_text).map(str::to_string),
            estimated_price,
        })
    }
}

impl WebsiteRequest {
    pub fn selected_features(&self) -> Vec<String> {
        self.features
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(key, _)| humanize_feature(key))
            .collect()
    }

    /// Client-supplied estimate, else one computed from the selections.
    pub fn price_display(&self) -> String {
        if let Some(price) = &self.estimated_price {
            return format!("${}", price);
        }
        let estimate = pricing::parse_page_count(&self.pages).and_then(|pages| {
            pricing::estimate(&QuoteOptions {
                pages,
                seo_level: self.seo_level.clone(),
                delivery_time: self.delivery_time.clone(),
                theme: self.theme.clone(),
                support_level: self.support_level.clone(),
                features: self.features.clone(),
            })
        });
        match estimate {
            Some(price) => format!("${}", price),
            None => "Not calculated".to_string(),
        }
    }

    pub fn to_email(&self, mailbox: Mailbox<'_>, requested_at: &str) -> OutgoingEmail {
        let safe_name = escape_html(&self.name);
        let features = self.selected_features();
        let price = self.price_display();

        let features_html = if features.is_empty() {
            "<p><em>(No additional features selected)</em></p>".to_string()
        } else {
            let items: Vec<String> = features
                .iter()
                .map(|f| format!("<li>{}</li>", escape_html(f)))
                .collect();
            format!("<ul>{}</ul>", items.join(""))
        };
        let custom_html = self
            .custom_features_text
            .as_deref()
            .map(|t| format!("<h4>Custom Features Details:</h4><p>{}</p>", escape_multiline(t)))
            .unwrap_or_default();
        let message_html = self
            .message
            .as_deref()
            .map(|m| format!("<h3>Additional Details</h3><p>{}</p>", escape_multiline(m)))
            .unwrap_or_default();

        let html = format!(
            "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
             <h2>New Website Request</h2>\
             <h3>Contact Information</h3>\
             <p><strong>Name:</strong> {name}</p>\
             <p><strong>Email:</strong> <a href=\"mailto:{email}\">{email}</a></p>\
             <h3>Website Configuration</h3>\
             <p><strong>Pages:</strong> {pages}</p>\
             <p><strong>Theme:</strong> {theme}</p>\
             <p><strong>SEO Level:</strong> {seo}</p>\
             <p><strong>Support Level:</strong> {support}</p>\
             <p><strong>Delivery Time:</strong> {delivery}</p>\
             <p><strong>Estimated Price:</strong> {price}</p>\
             <h3>Selected Features</h3>{features}{custom}{message}\
             <p><strong>Requested:</strong> {requested_at}</p>\
             <p>Reply directly to this email to respond to {name}.</p></div>",
            name = safe_name,
            email = escape_html(&self.email),
            pages = escape_html(&self.pages),
            theme = escape_html(&self.theme),
            seo = escape_html(&self.seo_level),
            support = escape_html(&self.support_level),
            delivery = escape_html(&self.delivery_time),
            price = escape_html(&price),
            features = features_html,
            custom = custom_html,
            message = message_html,
            requested_at = requested_at,
        );

        let features_text = if features.is_empty() {
            "(No additional features selected)".to_string()
        } else {
            features
                .iter()
                .map(|f| format!("- {}", f))
                .collect::<Vec<_>>()
                .join("\n")
        };
        let mut text = vec![
            "New Website Request".to_string(),
            String::new(),
            "Contact Information".to_string(),
            format!("Name: {}", self.name),
            format!("Email: {}", self.email),
            String::new(),
            "Website Configuration".to_string(),
            format!("Pages: {}", self.pages),
            format!("Theme: {}", self.theme),
            format!("SEO Level: {}", self.seo_level),
            format!("Support Level: {}", self.support_level),
            format!("Delivery Time: {}", self.delivery_time),
            format!("Estimated Price: {}", price),
            String::new(),
            "Selected Features".to_string(),
            features_text,
        ];
        if let Some(custom) = &self.custom_features_text {
            text.extend([String::new(), "Custom Features Details:".to_string(), custom.clone()]);
        }
        if let Some(message) = &self.message {
            text.extend([String::new(), "Additional Details:".to_string(), message.clone()]);
        }
        text.extend([
            String::new(),
            format!("Requested: {}", requested_at),
            String::new(),
            format!("Reply to: {}", self.email),
        ]);

        OutgoingEmail {
            from: mailbox.from.to_string(),
            to: vec![mailbox.to.to_string()],
            reply_to: Some(self.email.clone()),
            subject: format!("New Website Request from {}", safe_name),
            html,
            text: text.join("\n"),
        }
    }
}

pub fn test_email(mailbox: Mailbox<'_>, sent_at: &str) -> OutgoingEmail {
    OutgoingEmail {
        from: mailbox.from.to_string(),
        to: vec![mailbox.to.to_string()],
        reply_to: None,
        subject: "Test Email from Your Website".to_string(),
        html: format!(
            "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
             <h2>Test Email</h2>\
             <p>This is a test email from your website using your verified domain.</p>\
             <p>If you received this, your email setup is working correctly!</p>\
             <p>Sent at: {}</p></div>",
            sent_at
        ),
        text: format!(
            "Test Email\n\nThis is a test email from your website using your verified domain.\n\n\
             If you received this, your email setup is working correctly!\n\nSent at: {}",
            sent_at
        ),
    }
}
