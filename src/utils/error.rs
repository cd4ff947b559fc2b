use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Email provider request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Content store error: {message}")]
    ContentStoreError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Rate limit store error: {message}")]
    RateLimitStoreError { message: String },

    #[error("Email service not configured")]
    EmailNotConfigured,

    #[error("Email provider returned {status}: {message}")]
    EmailProviderError { status: u16, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Content,
    Client,
    Email,
    Infrastructure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SiteError {
    pub fn validation(message: impl Into<String>) -> Self {
        SiteError::ValidationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SiteError::ConfigError { .. }
            | SiteError::ConfigValidationError { .. }
            | SiteError::InvalidConfigValueError { .. }
            | SiteError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SiteError::ContentStoreError { .. } | SiteError::SerializationError(_) => {
                ErrorCategory::Content
            }
            SiteError::ValidationError { .. } | SiteError::RateLimited => ErrorCategory::Client,
            SiteError::HttpError(_)
            | SiteError::EmailNotConfigured
            | SiteError::EmailProviderError { .. } => ErrorCategory::Email,
            SiteError::IoError(_) | SiteError::RateLimitStoreError { .. } => {
                ErrorCategory::Infrastructure
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Client => ErrorSeverity::Low,
            ErrorCategory::Content | ErrorCategory::Email => ErrorSeverity::Medium,
            ErrorCategory::Infrastructure => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SiteError::ConfigError { .. }
            | SiteError::ConfigValidationError { .. }
            | SiteError::InvalidConfigValueError { .. } => {
                "Check the TOML configuration file and command-line flags"
            }
            SiteError::MissingConfigError { .. } => {
                "Add the missing setting to the configuration file or environment"
            }
            SiteError::EmailNotConfigured => {
                "Set RESEND_API_KEY or [email].api_key in the configuration file"
            }
            SiteError::HttpError(_) | SiteError::EmailProviderError { .. } => {
                "Verify the email provider endpoint and API key"
            }
            SiteError::ContentStoreError { .. } | SiteError::SerializationError(_) => {
                "Check the tenant content document and the content store settings"
            }
            SiteError::RateLimitStoreError { .. } => "Check connectivity to the rate-limit store",
            SiteError::IoError(_) => "Check file paths and permissions",
            SiteError::ValidationError { .. } => "Fix the submitted fields and retry",
            SiteError::RateLimited => "Wait before submitting again",
        }
    }

    /// Message safe to show to a visitor; never leaks provider or filesystem details.
    pub fn user_friendly_message(&self) -> String {
        match self {
            SiteError::ValidationError { message } => message.clone(),
            SiteError::RateLimited => "Too many requests. Please try again later.".to_string(),
            SiteError::EmailNotConfigured => "Email service not configured".to_string(),
            SiteError::HttpError(_) | SiteError::EmailProviderError { .. } => {
                "Failed to send email. Please try again later.".to_string()
            }
            SiteError::ConfigError { .. }
            | SiteError::ConfigValidationError { .. }
            | SiteError::InvalidConfigValueError { .. }
            | SiteError::MissingConfigError { .. } => format!("Configuration problem: {}", self),
            _ => "Internal server error".to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            SiteError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            SiteError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<toml::de::Error> for SiteError {
    fn from(e: toml::de::Error) -> Self {
        SiteError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(
                "❌ {} (Category: {:?}, Severity: {:?})",
                self,
                self.category(),
                self.severity()
            );
        }
        (
            status,
            Json(ErrorBody {
                error: self.user_friendly_message(),
            }),
        )
            .into_response()
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
