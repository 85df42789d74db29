//! Geocoding provider trait

use std::{fmt, time::Duration};

use async_trait::async_trait;
use domain::{Address, GeocodeConfig, Location, ReverseGeocodeConfig};

use crate::{context::CallContext, error::GeocodingError};

/// Deadline used by the non-context operations unless a provider overrides it
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Trait for geocoding providers
///
/// Implemented by every vendor adapter and by [`crate::RoundRobinProvider`].
/// A successful call always yields at least one result.
#[async_trait]
pub trait GeocodingProvider: Send + Sync + fmt::Debug {
    /// Resolve an address to coordinates, bounded by the caller's context
    ///
    /// # Errors
    ///
    /// Returns an error on transport, vendor, parse or timeout failures and
    /// when the vendor found nothing.
    async fn geocode_with_context(
        &self,
        ctx: &CallContext,
        address: &str,
        config: &GeocodeConfig,
    ) -> Result<Vec<Location>, GeocodingError>;

    /// Resolve coordinates to addresses, bounded by the caller's context
    ///
    /// # Errors
    ///
    /// Same failure modes as [`GeocodingProvider::geocode_with_context`].
    async fn reverse_geocode_with_context(
        &self,
        ctx: &CallContext,
        location: Location,
        config: &ReverseGeocodeConfig,
    ) -> Result<Vec<Address>, GeocodingError>;

    /// Resolve an address using the provider's default deadline
    async fn geocode(
        &self,
        address: &str,
        config: &GeocodeConfig,
    ) -> Result<Vec<Location>, GeocodingError> {
        let ctx = CallContext::with_timeout(self.default_timeout());
        self.geocode_with_context(&ctx, address, config).await
    }

    /// Resolve coordinates using the provider's default deadline
    async fn reverse_geocode(
        &self,
        location: Location,
        config: &ReverseGeocodeConfig,
    ) -> Result<Vec<Address>, GeocodingError> {
        let ctx = CallContext::with_timeout(self.default_timeout());
        self.reverse_geocode_with_context(&ctx, location, config)
            .await
    }

    /// Deadline applied by [`GeocodingProvider::geocode`] and
    /// [`GeocodingProvider::reverse_geocode`]
    fn default_timeout(&self) -> Duration {
        DEFAULT_TIMEOUT
    }

    /// Get the provider name (e.g., "here", "osm_nominatim")
    fn provider_name(&self) -> &'static str;
}
