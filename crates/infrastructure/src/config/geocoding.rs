//! Geocoding vendor configuration.

use std::time::Duration;

use integration_geocoding::{
    EndpointOverrides, GeocodingClientConfig, ProviderKind, ProviderSpec,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// One entry of the ordered vendor list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderEntry {
    /// Vendor key (`here`, `graphhopper`, `osm_nominatim`, `locationiq`, `yandex`)
    pub kind: ProviderKind,

    /// Vendor API key (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Replaces the vendor's forward geocoding URL
    #[serde(default)]
    pub geocode_url: Option<String>,

    /// Replaces the vendor's reverse geocoding URL
    #[serde(default)]
    pub reverse_url: Option<String>,
}

impl ProviderEntry {
    /// Entry for a vendor that needs no credentials
    #[must_use]
    pub const fn keyless(kind: ProviderKind) -> Self {
        Self {
            kind,
            api_key: None,
            geocode_url: None,
            reverse_url: None,
        }
    }

    /// Entry with an API key
    #[must_use]
    pub fn with_key(kind: ProviderKind, api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretString::from(api_key.into())),
            ..Self::keyless(kind)
        }
    }

    /// Point both operations at `url`
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.geocode_url = Some(url.clone());
        self.reverse_url = Some(url);
        self
    }

    fn api_key_str(&self) -> &str {
        self.api_key.as_ref().map_or("", ExposeSecret::expose_secret)
    }

    /// Build the integration-level provider description, exposing the key
    #[must_use]
    pub fn to_spec(&self) -> ProviderSpec {
        ProviderSpec::new(self.kind, self.api_key_str()).with_endpoints(EndpointOverrides {
            geocode_url: self.geocode_url.clone(),
            reverse_url: self.reverse_url.clone(),
        })
    }
}

/// Geocoding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingAppConfig {
    /// Vendors in rotation order
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderEntry>,

    /// Deadline for a single vendor attempt in seconds (default: 10)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// TCP connect timeout in seconds (default: 5)
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Optional budget for a whole failover round in seconds
    ///
    /// When unset every vendor attempt gets its own `timeout_secs`.
    #[serde(default)]
    pub call_timeout_secs: Option<u64>,

    /// `User-Agent` header sent to vendors
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_providers() -> Vec<ProviderEntry> {
    vec![ProviderEntry::keyless(ProviderKind::OsmNominatim)]
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_user_agent() -> String {
    GeocodingClientConfig::default().user_agent
}

impl Default for GeocodingAppConfig {
    fn default() -> Self {
        Self {
            providers: default_providers(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            call_timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

impl GeocodingAppConfig {
    /// HTTP client settings shared by every vendor
    #[must_use]
    pub fn client_config(&self) -> GeocodingClientConfig {
        GeocodingClientConfig {
            timeout_secs: self.timeout_secs,
            connect_timeout_secs: self.connect_timeout_secs,
            user_agent: self.user_agent.clone(),
        }
    }

    /// Vendor specs in rotation order
    #[must_use]
    pub fn provider_specs(&self) -> Vec<ProviderSpec> {
        self.providers.iter().map(ProviderEntry::to_spec).collect()
    }

    /// Budget for a whole failover round, if configured
    #[must_use]
    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_secs.map(Duration::from_secs)
    }

    /// Validate the geocoding section
    ///
    /// # Errors
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.providers.is_empty() {
            return Err("at least one provider must be configured".to_string());
        }
        for entry in &self.providers {
            if entry.kind.requires_api_key() && entry.api_key_str().trim().is_empty() {
                return Err(format!("provider '{}' requires an api_key", entry.kind));
            }
        }
        if self.call_timeout_secs == Some(0) {
            return Err("call_timeout_secs must be greater than zero".to_string());
        }
        self.client_config().validate()
    }
}
