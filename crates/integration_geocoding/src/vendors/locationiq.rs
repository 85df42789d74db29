//! LocationIQ
//!
//! Nominatim-compatible API (<https://docs.locationiq.com>) requiring a key.

use domain::{GeocodeConfig, Location, ReverseGeocodeConfig};
use url::Url;

use super::{ApiKey, EndpointOverrides, coordinate, nominatim::NominatimParser};
use crate::{
    config::GeocodingClientConfig,
    error::GeocodingError,
    http_provider::{EndpointBuilder, HttpGeocodingProvider},
};

/// Provider key used in configuration
pub const PROVIDER_KEY: &str = "locationiq";
/// Default forward geocoding endpoint
pub const DEFAULT_GEOCODE_URL: &str = "https://locationiq.org/v1/search.php";
/// Default reverse geocoding endpoint
pub const DEFAULT_REVERSE_URL: &str = "https://locationiq.org/v1/reverse.php";

/// Create a LocationIQ adapter
///
/// # Errors
///
/// Returns an error if an endpoint URL is invalid or the HTTP client cannot be created.
pub fn provider(
    api_key: &str,
    overrides: &EndpointOverrides,
    config: &GeocodingClientConfig,
) -> Result<HttpGeocodingProvider, GeocodingError> {
    let (geocode_url, reverse_url) = overrides.resolve(DEFAULT_GEOCODE_URL, DEFAULT_REVERSE_URL)?;
    HttpGeocodingProvider::new(
        PROVIDER_KEY,
        LocationIqEndpoints {
            api_key: ApiKey::new(api_key),
            geocode_url,
            reverse_url,
        },
        NominatimParser,
        config,
    )
}

/// LocationIQ request URLs
#[derive(Debug)]
pub struct LocationIqEndpoints {
    api_key: ApiKey,
    geocode_url: Url,
    reverse_url: Url,
}

impl EndpointBuilder for LocationIqEndpoints {
    fn geocode_url(&self, address: &str, config: &GeocodeConfig) -> Url {
        let mut url = self.geocode_url.clone();
        url.query_pairs_mut()
            .append_pair("key", self.api_key.as_str())
            .append_pair("format", "json")
            .append_pair("limit", &config.effective_limit().to_string())
            .append_pair("q", address);
        url
    }

    fn reverse_geocode_url(&self, location: Location, config: &ReverseGeocodeConfig) -> Url {
        let mut url = self.reverse_url.clone();
        url.query_pairs_mut()
            .append_pair("key", self.api_key.as_str())
            .append_pair("format", "json")
            .append_pair("lat", &coordinate(location.lat()))
            .append_pair("lon", &coordinate(location.lng()))
            .append_pair("zoom", &config.effective_zoom().to_string());
        url
    }
}
