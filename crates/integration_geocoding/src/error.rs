//! Geocoding error types

use thiserror::Error;

/// A failure reported by the vendor itself, as opposed to transport or timeout failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (status {status})")]
pub struct ProviderError {
    status: u16,
    message: String,
}

impl ProviderError {
    /// Create a new vendor error
    #[must_use]
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Status code reported by the vendor (HTTP status when the payload carries none)
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Human-readable vendor message
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors that can occur during geocoding operations
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// Connection to the vendor failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request to the vendor failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The vendor returned an error payload or status
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Failed to parse the vendor response
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The vendor answered successfully but with zero results
    #[error("No results")]
    NoResults,

    /// The call deadline elapsed before the vendor answered
    #[error("Request timed out after {timeout_ms} ms")]
    Timeout {
        /// The deadline budget in milliseconds
        timeout_ms: u64,
    },

    /// Every configured provider failed for this call
    #[error("geocode providers unavailable")]
    ProvidersUnavailable,

    /// Unknown provider key
    #[error("Unsupported geocoding provider: {0}")]
    UnsupportedProvider(String),

    /// Invalid provider configuration
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl GeocodingError {
    /// Returns true if a later attempt against the same vendor could succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::RequestFailed(_) | Self::Timeout { .. }
        )
    }

    /// Returns true if this error was raised while building providers
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedProvider(_) | Self::ConfigurationError(_)
        )
    }
}
