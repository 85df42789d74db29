//! Round-robin failover across providers
//!
//! A shared cursor picks the starting provider for each call, so load is
//! spread across vendors. Within one call every provider is tried at most
//! once, strictly one after another, and the first success wins.

use std::{
    fmt,
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use domain::{Address, GeocodeConfig, Location, ReverseGeocodeConfig};
use tracing::{debug, instrument, warn};

use crate::{context::CallContext, error::GeocodingError, provider::GeocodingProvider};

/// Provider that rotates through a fixed, non-empty set of providers
pub struct RoundRobinProvider {
    providers: Vec<Arc<dyn GeocodingProvider>>,
    cursor: AtomicUsize,
}

impl fmt::Debug for RoundRobinProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoundRobinProvider")
            .field("providers", &self.provider_names())
            .field("cursor", &self.cursor.load(Ordering::Relaxed))
            .finish()
    }
}

impl RoundRobinProvider {
    /// Create a new aggregator
    ///
    /// # Errors
    ///
    /// Returns [`GeocodingError::ConfigurationError`] if `providers` is empty.
    pub fn from_providers(
        providers: Vec<Arc<dyn GeocodingProvider>>,
    ) -> Result<Self, GeocodingError> {
        if providers.is_empty() {
            return Err(GeocodingError::ConfigurationError(
                "at least one geocoding provider is required".to_string(),
            ));
        }

        Ok(Self {
            providers,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Names of the wrapped providers in rotation order
    #[must_use]
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.provider_name()).collect()
    }

    /// Number of wrapped providers
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Always false; construction rejects an empty provider list
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Try providers in rotation until one succeeds
    ///
    /// The cursor is advanced once per call. Attempts walk forward from that
    /// start, so concurrent calls never make one call revisit a provider.
    /// With a caller context, the loop stops as soon as the deadline passes.
    async fn first_success<'a, T, F, Fut>(
        &'a self,
        operation: &'static str,
        ctx: Option<&CallContext>,
        mut attempt: F,
    ) -> Result<T, GeocodingError>
    where
        F: FnMut(&'a Arc<dyn GeocodingProvider>) -> Fut,
        Fut: Future<Output = Result<T, GeocodingError>>,
    {
        let total = self.providers.len();
        let start = self.cursor.fetch_add(1, Ordering::Relaxed);
        for offset in 0..total {
            if ctx.is_some_and(CallContext::is_expired) {
                debug!(operation, tried = offset, of = total, "Caller deadline passed, giving up");
                break;
            }

            let attempt_no = offset + 1;
            let provider = &self.providers[start.wrapping_add(offset) % total];
            match attempt(provider).await {
                Ok(value) => {
                    debug!(
                        provider = provider.provider_name(),
                        operation,
                        attempt = attempt_no,
                        "Provider succeeded"
                    );
                    return Ok(value);
                },
                Err(e) => {
                    warn!(
                        provider = provider.provider_name(),
                        operation,
                        attempt = attempt_no,
                        of = total,
                        retryable = e.is_retryable(),
                        error = %e,
                        "Geocoding provider failed, trying next"
                    );
                },
            }
        }

        Err(GeocodingError::ProvidersUnavailable)
    }
}

#[async_trait]
impl GeocodingProvider for RoundRobinProvider {
    #[instrument(skip(self, ctx, config))]
    async fn geocode_with_context(
        &self,
        ctx: &CallContext,
        address: &str,
        config: &GeocodeConfig,
    ) -> Result<Vec<Location>, GeocodingError> {
        self.first_success("geocode", Some(ctx), |p| {
            p.geocode_with_context(ctx, address, config)
        })
            .await
    }

    #[instrument(skip(self, ctx, config))]
    async fn reverse_geocode_with_context(
        &self,
        ctx: &CallContext,
        location: Location,
        config: &ReverseGeocodeConfig,
    ) -> Result<Vec<Address>, GeocodingError> {
        self.first_success("reverse_geocode", Some(ctx), |p| {
            p.reverse_geocode_with_context(ctx, location, config)
        })
        .await
    }

    /// Each attempt gets the provider's own default deadline
    #[instrument(skip(self, config))]
    async fn geocode(
        &self,
        address: &str,
        config: &GeocodeConfig,
    ) -> Result<Vec<Location>, GeocodingError> {
        self.first_success("geocode", None, |p| p.geocode(address, config))
            .await
    }

    /// Each attempt gets the provider's own default deadline
    #[instrument(skip(self, config))]
    async fn reverse_geocode(
        &self,
        location: Location,
        config: &ReverseGeocodeConfig,
    ) -> Result<Vec<Address>, GeocodingError> {
        self.first_success("reverse_geocode", None, |p| {
            p.reverse_geocode(location, config)
        })
            .await
    }

    /// Worst case for a fully failing non-context call
    fn default_timeout(&self) -> Duration {
        self.providers
            .iter()
            .map(|p| p.default_timeout())
            .sum()
    }

    fn provider_name(&self) -> &'static str {
        "round_robin"
    }
}
