//! Geocoding client configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration shared by all vendor HTTP clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingClientConfig {
    /// Deadline applied to calls made without an explicit context (default: 10)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// TCP connect timeout in seconds (default: 5), capped at `timeout_secs`
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// `User-Agent` header sent with every vendor request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_user_agent() -> String {
    concat!("wayfinder/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for GeocodingClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl GeocodingClientConfig {
    /// Create a configuration for testing (short timeouts)
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 2,
            connect_timeout_secs: 1,
            ..Default::default()
        }
    }

    /// Deadline used by the non-context provider operations
    #[must_use]
    pub const fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Connect timeout for the underlying HTTP client, never longer than the call deadline
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.min(self.timeout_secs))
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.connect_timeout_secs == 0 {
            return Err("connect_timeout_secs must be greater than 0".to_string());
        }

        if self.user_agent.trim().is_empty() {
            return Err("user_agent must not be empty".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeocodingClientConfig::default();
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.connect_timeout_secs, 5);
        assert!(config.user_agent.starts_with("wayfinder/"));
        assert_eq!(config.default_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_testing_config() {
        let config = GeocodingClientConfig::for_testing();
        assert_eq!(config.timeout_secs, 2);
        assert_eq!(config.connect_timeout(), Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_success() {
        assert!(GeocodingClientConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_timeouts() {
        let config = GeocodingClientConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GeocodingClientConfig {
            connect_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_short_timeout_caps_connect_timeout() {
        let config: GeocodingClientConfig = serde_json::from_str(r#"{"timeout_secs":3}"#).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.connect_timeout(), Duration::from_secs(3));

        let config = GeocodingClientConfig {
            timeout_secs: 3,
            connect_timeout_secs: 2,
            ..Default::default()
        };
        assert_eq!(config.connect_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_validation_empty_user_agent() {
        let config = GeocodingClientConfig {
            user_agent: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: GeocodingClientConfig = serde_json::from_str(r#"{"timeout_secs":3}"#).unwrap();
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.connect_timeout_secs, 5);
    }
}
