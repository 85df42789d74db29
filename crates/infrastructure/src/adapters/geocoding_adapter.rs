//! Geocoding adapter - Implements GeocodingPort using integration_geocoding

use std::{fmt, sync::Arc, time::Duration};

use application::{error::ApplicationError, ports::GeocodingPort};
use async_trait::async_trait;
use domain::{Address, GeocodeConfig, Location, ReverseGeocodeConfig};
use integration_geocoding::{
    CallContext, GeocodingError, GeocodingProvider, RoundRobinProvider, create_round_robin,
};
use tracing::{debug, instrument};

use crate::config::GeocodingAppConfig;

/// Adapter exposing the vendor failover aggregator as a [`GeocodingPort`]
pub struct GeocodingAdapter {
    provider: Arc<dyn GeocodingProvider>,
    names: Vec<String>,
    call_timeout: Option<Duration>,
}

impl fmt::Debug for GeocodingAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeocodingAdapter")
            .field("provider", &self.provider.provider_name())
            .field("names", &self.names)
            .field("call_timeout", &self.call_timeout)
            .finish()
    }
}

impl GeocodingAdapter {
    /// Wrap any provider, typically a [`RoundRobinProvider`]
    pub fn new(provider: Arc<dyn GeocodingProvider>) -> Self {
        Self {
            names: vec![provider.provider_name().to_string()],
            provider,
            call_timeout: None,
        }
    }

    /// Wrap an aggregator, remembering its rotation order
    pub fn from_round_robin(aggregator: RoundRobinProvider) -> Self {
        let names = aggregator
            .provider_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        Self {
            provider: Arc::new(aggregator),
            names,
            call_timeout: None,
        }
    }

    /// Build the vendor set described by the configuration
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Configuration`] if the section is invalid
    /// or a vendor cannot be constructed.
    pub fn from_config(config: &GeocodingAppConfig) -> Result<Self, ApplicationError> {
        config.validate().map_err(ApplicationError::Configuration)?;
        let aggregator = create_round_robin(&config.provider_specs(), &config.client_config())
            .map_err(map_error)?;
        Ok(Self::from_round_robin(aggregator).with_call_timeout(config.call_timeout()))
    }

    /// Bound a whole failover round instead of each vendor attempt
    #[must_use]
    pub const fn with_call_timeout(mut self, call_timeout: Option<Duration>) -> Self {
        self.call_timeout = call_timeout;
        self
    }
}

/// Translate integration errors into application errors
///
/// The aggregator's sentinel becomes the fixed
/// [`ApplicationError::GeocodeProvidersUnavailable`].
fn map_error(err: GeocodingError) -> ApplicationError {
    match err {
        GeocodingError::ProvidersUnavailable => ApplicationError::GeocodeProvidersUnavailable,
        e if e.is_configuration() => ApplicationError::Configuration(e.to_string()),
        e => ApplicationError::ExternalService(e.to_string()),
    }
}

#[async_trait]
impl GeocodingPort for GeocodingAdapter {
    #[instrument(skip(self, config))]
    async fn geocode(
        &self,
        address: &str,
        config: &GeocodeConfig,
    ) -> Result<Vec<Location>, ApplicationError> {
        let result = match self.call_timeout {
            Some(budget) => {
                let ctx = CallContext::with_timeout(budget);
                self.provider.geocode_with_context(&ctx, address, config).await
            },
            None => self.provider.geocode(address, config).await,
        };
        let locations = result.map_err(map_error)?;
        debug!(count = locations.len(), "Geocode resolved");
        Ok(locations)
    }

    #[instrument(skip(self, config))]
    async fn reverse_geocode(
        &self,
        location: Location,
        config: &ReverseGeocodeConfig,
    ) -> Result<Vec<Address>, ApplicationError> {
        let result = match self.call_timeout {
            Some(budget) => {
                let ctx = CallContext::with_timeout(budget);
                self.provider
                    .reverse_geocode_with_context(&ctx, location, config)
                    .await
            },
            None => self.provider.reverse_geocode(location, config).await,
        };
        let addresses = result.map_err(map_error)?;
        debug!(count = addresses.len(), "Reverse geocode resolved");
        Ok(addresses)
    }

    fn provider_names(&self) -> Vec<String> {
        self.names.clone()
    }
}

#[cfg(test)]
mod tests {
    use integration_geocoding::{ProviderError, ProviderKind};

    use super::*;
    use crate::config::ProviderEntry;

    #[derive(Debug)]
    struct Unreachable;

    #[async_trait]
    impl GeocodingProvider for Unreachable {
        async fn geocode_with_context(
            &self,
            _ctx: &CallContext,
            _address: &str,
            _config: &GeocodeConfig,
        ) -> Result<Vec<Location>, GeocodingError> {
            Err(GeocodingError::ProvidersUnavailable)
        }

        async fn reverse_geocode_with_context(
            &self,
            _ctx: &CallContext,
            _location: Location,
            _config: &ReverseGeocodeConfig,
        ) -> Result<Vec<Address>, GeocodingError> {
            Err(GeocodingError::Provider(ProviderError::new(401, "bad key")))
        }

        fn provider_name(&self) -> &'static str {
            "unreachable"
        }
    }

    #[test]
    fn sentinel_maps_to_fixed_variant() {
        let err = map_error(GeocodingError::ProvidersUnavailable);
        assert!(matches!(err, ApplicationError::GeocodeProvidersUnavailable));
    }

    #[test]
    fn construction_errors_map_to_configuration() {
        let err = map_error(GeocodingError::UnsupportedProvider("mapquest".into()));
        assert!(matches!(err, ApplicationError::Configuration(_)));
    }

    #[test]
    fn call_errors_map_to_external_service() {
        let err = map_error(GeocodingError::Timeout { timeout_ms: 10 });
        assert!(matches!(err, ApplicationError::ExternalService(_)));
    }

    #[tokio::test]
    async fn adapter_surfaces_unavailable_sentinel() {
        let adapter = GeocodingAdapter::new(Arc::new(Unreachable));

        let err = adapter
            .geocode("Atlantis", &GeocodeConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::GeocodeProvidersUnavailable));
        assert_eq!(adapter.provider_names(), vec!["unreachable".to_string()]);
    }

    #[tokio::test]
    async fn adapter_with_budget_uses_context_variant() {
        let adapter = GeocodingAdapter::new(Arc::new(Unreachable))
            .with_call_timeout(Some(Duration::from_secs(1)));

        let err = adapter
            .reverse_geocode(
                Location::new_unchecked(0.0, 0.0),
                &ReverseGeocodeConfig::default(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::ExternalService(ref m) if m.contains("bad key")));
    }

    #[test]
    fn from_config_reports_rotation_order() {
        let config = GeocodingAppConfig {
            providers: vec![
                ProviderEntry::with_key(ProviderKind::Here, "k"),
                ProviderEntry::keyless(ProviderKind::OsmNominatim),
            ],
            ..Default::default()
        };

        let adapter = GeocodingAdapter::from_config(&config).unwrap();

        assert_eq!(adapter.provider_names(), vec!["here", "osm_nominatim"]);
    }

    #[test]
    fn from_config_rejects_missing_key() {
        let config = GeocodingAppConfig {
            providers: vec![ProviderEntry::keyless(ProviderKind::GraphHopper)],
            ..Default::default()
        };

        let err = GeocodingAdapter::from_config(&config).unwrap_err();
        assert!(matches!(err, ApplicationError::Configuration(_)));
    }
}
