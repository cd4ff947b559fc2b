use crate::config::EmailConfig;
use crate::core::EmailSender;
use crate::domain::model::{OutgoingEmail, SentEmail};
use crate::utils::error::{Result, SiteError};
use async_trait::async_trait;
use reqwest::Client;

/// Client for the Resend `POST /emails` API.
#[derive(Clone)]
pub struct ResendClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl ResendClient {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, client: Client) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        }
    }

    pub fn from_config(config: &EmailConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self::new(
            config.endpoint.clone(),
            config.resolved_api_key(),
            client,
        ))
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl std::fmt::Debug for ResendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[async_trait]
impl EmailSender for ResendClient {
    async fn send(&self, email: &OutgoingEmail) -> Result<SentEmail> {
        let Some(api_key) = &self.api_key else {
            tracing::error!("❌ Email API key is not set (RESEND_API_KEY or [email].api_key)");
            return Err(SiteError::EmailNotConfigured);
        };

        tracing::debug!("Sending email '{}' via {}", email.subject, self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SiteError::EmailProviderError {
                status: status.as_u16(),
                message,
            });
        }

        let sent: SentEmail = response.json().await?;
        tracing::info!("✅ Email sent: {}", sent.id);
        Ok(sent)
    }
}
