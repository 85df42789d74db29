//! Provider construction from configuration keys

use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    config::GeocodingClientConfig,
    error::GeocodingError,
    provider::GeocodingProvider,
    round_robin::RoundRobinProvider,
    vendors::{EndpointOverrides, graphhopper, here, locationiq, nominatim, yandex},
};

/// Supported geocoding vendors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// HERE Geocoding & Search
    Here,
    /// GraphHopper Geocoding
    #[serde(rename = "graphhopper")]
    GraphHopper,
    /// OpenStreetMap Nominatim
    OsmNominatim,
    /// LocationIQ
    #[serde(rename = "locationiq")]
    LocationIq,
    /// Yandex Geocoder
    Yandex,
}

impl ProviderKind {
    /// Every supported vendor
    pub const ALL: [Self; 5] = [
        Self::Here,
        Self::GraphHopper,
        Self::OsmNominatim,
        Self::LocationIq,
        Self::Yandex,
    ];

    /// Configuration key of the vendor
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Here => here::PROVIDER_KEY,
            Self::GraphHopper => graphhopper::PROVIDER_KEY,
            Self::OsmNominatim => nominatim::PROVIDER_KEY,
            Self::LocationIq => locationiq::PROVIDER_KEY,
            Self::Yandex => yandex::PROVIDER_KEY,
        }
    }

    /// Returns true if the vendor rejects anonymous requests
    #[must_use]
    pub const fn requires_api_key(self) -> bool {
        !matches!(self, Self::OsmNominatim)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ProviderKind {
    type Err = GeocodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key() == s)
            .ok_or_else(|| GeocodingError::UnsupportedProvider(s.to_string()))
    }
}

/// One configured vendor
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderSpec {
    /// Vendor to construct
    pub kind: ProviderKind,
    /// Vendor credential (ignored by vendors without keys)
    pub api_key: String,
    /// Optional base URL overrides
    pub endpoints: EndpointOverrides,
}

impl fmt::Debug for ProviderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSpec")
            .field("kind", &self.kind)
            .field("api_key", &"***")
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

impl ProviderSpec {
    /// Spec with vendor default endpoints
    #[must_use]
    pub fn new(kind: ProviderKind, api_key: impl Into<String>) -> Self {
        Self {
            kind,
            api_key: api_key.into(),
            endpoints: EndpointOverrides::default(),
        }
    }

    /// Replace the vendor endpoints
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: EndpointOverrides) -> Self {
        self.endpoints = endpoints;
        self
    }
}

/// Construct a single vendor adapter
///
/// # Errors
///
/// Returns [`GeocodingError::ConfigurationError`] for a missing API key or an
/// invalid endpoint URL.
pub fn create_provider(
    spec: &ProviderSpec,
    config: &GeocodingClientConfig,
) -> Result<Arc<dyn GeocodingProvider>, GeocodingError> {
    if spec.kind.requires_api_key() && spec.api_key.trim().is_empty() {
        return Err(GeocodingError::ConfigurationError(format!(
            "provider '{}' requires an API key",
            spec.kind
        )));
    }

    let key = spec.api_key.as_str();
    let endpoints = &spec.endpoints;
    let provider = match spec.kind {
        ProviderKind::Here => here::provider(key, endpoints, config)?,
        ProviderKind::GraphHopper => graphhopper::provider(key, endpoints, config)?,
        ProviderKind::OsmNominatim => nominatim::provider(endpoints, config)?,
        ProviderKind::LocationIq => locationiq::provider(key, endpoints, config)?,
        ProviderKind::Yandex => yandex::provider(key, endpoints, config)?,
    };

    Ok(Arc::new(provider))
}

/// Construct a vendor adapter from its configuration key
///
/// # Errors
///
/// Returns [`GeocodingError::UnsupportedProvider`] for unknown keys, otherwise
/// the errors of [`create_provider`].
pub fn create_provider_by_key(
    key: &str,
    api_key: &str,
    config: &GeocodingClientConfig,
) -> Result<Arc<dyn GeocodingProvider>, GeocodingError> {
    let kind = key.parse()?;
    create_provider(&ProviderSpec::new(kind, api_key), config)
}

/// Construct the round-robin aggregator over all configured vendors, in order
///
/// # Errors
///
/// Returns an error if the list is empty or any vendor cannot be constructed.
pub fn create_round_robin(
    specs: &[ProviderSpec],
    config: &GeocodingClientConfig,
) -> Result<RoundRobinProvider, GeocodingError> {
    config
        .validate()
        .map_err(GeocodingError::ConfigurationError)?;

    let providers = specs
        .iter()
        .map(|spec| create_provider(spec, config))
        .collect::<Result<Vec<_>, _>>()?;

    let aggregator = RoundRobinProvider::from_providers(providers)?;
    info!(providers = ?aggregator.provider_names(), "Geocoding providers ready");
    Ok(aggregator)
}
