//! Generic HTTP vendor adapter
//!
//! Every vendor is an [`HttpGeocodingProvider`] configured with two
//! strategies: an [`EndpointBuilder`] that turns a request into a URL and a
//! [`ResponseParser`] that turns the response body into canonical values.

use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use domain::{Address, GeocodeConfig, Location, ReverseGeocodeConfig};
use reqwest::{Client, header::ACCEPT_LANGUAGE};
use tracing::{debug, instrument};
use url::Url;

use crate::{
    config::GeocodingClientConfig,
    context::CallContext,
    error::{GeocodingError, ProviderError},
    execution::run_with_deadline,
    provider::GeocodingProvider,
};

/// Builds vendor request URLs
///
/// Implementations are pure: they apply vendor defaults (language, limit,
/// zoom) and encode query parameters, nothing else.
pub trait EndpointBuilder: Send + Sync + fmt::Debug {
    /// URL for a forward lookup
    fn geocode_url(&self, address: &str, config: &GeocodeConfig) -> Url;

    /// URL for a reverse lookup
    fn reverse_geocode_url(&self, location: Location, config: &ReverseGeocodeConfig) -> Url;
}

/// Decodes vendor response bodies into canonical values
pub trait ResponseParser: Send + Sync + fmt::Debug {
    /// Locations from a forward lookup body
    ///
    /// # Errors
    ///
    /// Returns [`GeocodingError::ParseError`] for malformed bodies.
    fn locations(&self, body: &[u8]) -> Result<Vec<Location>, GeocodingError>;

    /// Addresses from a reverse lookup body
    ///
    /// # Errors
    ///
    /// Returns [`GeocodingError::ParseError`] for malformed bodies.
    fn addresses(&self, body: &[u8]) -> Result<Vec<Address>, GeocodingError>;

    /// Vendor error payload, if the body carries one
    fn error(&self, status: u16, body: &[u8]) -> Option<ProviderError>;
}

/// Vendor adapter issuing exactly one GET per call
#[derive(Debug, Clone)]
pub struct HttpGeocodingProvider {
    name: &'static str,
    client: Client,
    endpoints: Arc<dyn EndpointBuilder>,
    parser: Arc<dyn ResponseParser>,
    default_timeout: Duration,
}

impl HttpGeocodingProvider {
    /// Create a new adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(
        name: &'static str,
        endpoints: impl EndpointBuilder + 'static,
        parser: impl ResponseParser + 'static,
        config: &GeocodingClientConfig,
    ) -> Result<Self, GeocodingError> {
        let client = Client::builder()
            .timeout(config.default_timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            name,
            client,
            endpoints: Arc::new(endpoints),
            parser: Arc::new(parser),
            default_timeout: config.default_timeout(),
        })
    }

    /// The endpoint strategy of this adapter
    #[must_use]
    pub fn endpoints(&self) -> &dyn EndpointBuilder {
        self.endpoints.as_ref()
    }
}

fn transport_error(e: &reqwest::Error) -> GeocodingError {
    if e.is_connect() {
        GeocodingError::ConnectionFailed(e.to_string())
    } else {
        GeocodingError::RequestFailed(e.to_string())
    }
}

/// Perform the request and return the raw body of a successful response
async fn fetch(
    client: &Client,
    url: Url,
    lang: String,
    parser: &dyn ResponseParser,
) -> Result<Vec<u8>, GeocodingError> {
    let response = client
        .get(url)
        .header(ACCEPT_LANGUAGE, lang)
        .send()
        .await
        .map_err(|e| transport_error(&e))?;

    let status = response.status();
    let body = response.bytes().await.map_err(|e| transport_error(&e))?;

    if let Some(err) = parser.error(status.as_u16(), &body) {
        return Err(err.into());
    }
    if !status.is_success() {
        return Err(ProviderError::new(status.as_u16(), format!("HTTP {status}")).into());
    }

    Ok(body.to_vec())
}

#[async_trait]
impl GeocodingProvider for HttpGeocodingProvider {
    #[instrument(skip(self, ctx, config), fields(provider = self.name))]
    async fn geocode_with_context(
        &self,
        ctx: &CallContext,
        address: &str,
        config: &GeocodeConfig,
    ) -> Result<Vec<Location>, GeocodingError> {
        let url = self.endpoints.geocode_url(address, config);
        debug!(
            host = url.host_str().unwrap_or_default(),
            path = url.path(),
            "Sending geocode request"
        );

        let client = self.client.clone();
        let parser = Arc::clone(&self.parser);
        let lang = config.lang.to_string();

        let locations = run_with_deadline(ctx, "geocode", async move {
            let body = fetch(&client, url, lang, parser.as_ref()).await?;
            parser.locations(&body)
        })
        .await?;

        if locations.is_empty() {
            return Err(GeocodingError::NoResults);
        }
        debug!(results = locations.len(), "Geocode request succeeded");
        Ok(locations)
    }

    #[instrument(skip(self, ctx, config), fields(provider = self.name))]
    async fn reverse_geocode_with_context(
        &self,
        ctx: &CallContext,
        location: Location,
        config: &ReverseGeocodeConfig,
    ) -> Result<Vec<Address>, GeocodingError> {
        let url = self.endpoints.reverse_geocode_url(location, config);
        debug!(
            host = url.host_str().unwrap_or_default(),
            path = url.path(),
            "Sending reverse geocode request"
        );

        let client = self.client.clone();
        let parser = Arc::clone(&self.parser);
        let lang = config.lang.to_string();

        let addresses = run_with_deadline(ctx, "reverse_geocode", async move {
            let body = fetch(&client, url, lang, parser.as_ref()).await?;
            parser.addresses(&body)
        })
        .await?;

        if addresses.is_empty() {
            return Err(GeocodingError::NoResults);
        }
        debug!(results = addresses.len(), "Reverse geocode request succeeded");
        Ok(addresses)
    }

    fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    fn provider_name(&self) -> &'static str {
        self.name
    }
}
