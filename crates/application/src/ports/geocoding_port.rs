//! Geocoding port
//!
//! Forward and reverse lookups as seen by the application layer. The
//! infrastructure adapter backs this with the vendor failover aggregator.

use async_trait::async_trait;
use domain::{Address, GeocodeConfig, Location, ReverseGeocodeConfig};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for address and coordinate lookups
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Resolve a free-text address into candidate coordinates
    ///
    /// Fails with [`ApplicationError::GeocodeProvidersUnavailable`] when no
    /// vendor could answer.
    async fn geocode(
        &self,
        address: &str,
        config: &GeocodeConfig,
    ) -> Result<Vec<Location>, ApplicationError>;

    /// Resolve a coordinate into candidate postal addresses
    async fn reverse_geocode(
        &self,
        location: Location,
        config: &ReverseGeocodeConfig,
    ) -> Result<Vec<Address>, ApplicationError>;

    /// Vendor names in rotation order, for diagnostics
    fn provider_names(&self) -> Vec<String> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geocoding_port_is_object_safe() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn GeocodingPort>();
    }

    #[tokio::test]
    async fn mock_port_returns_configured_locations() {
        let mut mock = MockGeocodingPort::new();
        mock.expect_geocode()
            .withf(|address, config| address == "Berlin" && config.effective_limit() == 1)
            .returning(|_, _| Ok(vec![Location::new_unchecked(52.52, 13.405)]));

        let result = mock
            .geocode("Berlin", &GeocodeConfig::default())
            .await
            .unwrap();
        assert_eq!(result.len(), 1);
        assert!((result[0].lat() - 52.52).abs() < f64::EPSILON);
    }
}
