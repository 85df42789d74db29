//! HERE Geocoding & Search API
//!
//! <https://www.here.com/docs/bundle/geocoding-and-search-api-developer-guide>

use domain::{Address, GeocodeConfig, Location, ReverseGeocodeConfig};
use serde::Deserialize;
use url::Url;

use super::{ApiKey, EndpointOverrides, coordinate, decode};
use crate::{
    config::GeocodingClientConfig,
    error::{GeocodingError, ProviderError},
    http_provider::{EndpointBuilder, HttpGeocodingProvider, ResponseParser},
};

/// Provider key used in configuration
pub const PROVIDER_KEY: &str = "here";
/// Default forward geocoding endpoint
pub const DEFAULT_GEOCODE_URL: &str = "https://geocode.search.hereapi.com/v1/geocode";
/// Default reverse geocoding endpoint
pub const DEFAULT_REVERSE_URL: &str = "https://revgeocode.search.hereapi.com/v1/revgeocode";

/// Create a HERE adapter
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
        HereEndpoints {
            api_key: ApiKey::new(api_key),
            geocode_url,
            reverse_url,
        },
        HereParser,
        config,
    )
}

/// HERE request URLs
#[derive(Debug)]
pub struct HereEndpoints {
    api_key: ApiKey,
    geocode_url: Url,
    reverse_url: Url,
}

impl EndpointBuilder for HereEndpoints {
    fn geocode_url(&self, address: &str, config: &GeocodeConfig) -> Url {
        let mut url = self.geocode_url.clone();
        url.query_pairs_mut()
            .append_pair("apiKey", self.api_key.as_str())
            .append_pair("lang", config.lang.as_str())
            .append_pair("limit", &config.effective_limit().to_string())
            .append_pair("q", address);
        url
    }

    fn reverse_geocode_url(&self, location: Location, config: &ReverseGeocodeConfig) -> Url {
        let at = format!("{},{}", coordinate(location.lat()), coordinate(location.lng()));
        let mut url = self.reverse_url.clone();
        url.query_pairs_mut()
            .append_pair("apiKey", self.api_key.as_str())
            .append_pair("lang", config.lang.as_str())
            .append_pair("limit", &config.effective_limit().to_string())
            .append_pair("at", &at)
            .append_pair("types", "city,street");
        url
    }
}

mod api {
    use super::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct GeocodeResponse {
        #[serde(default)]
        pub items: Vec<GeocodeItem>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodeItem {
        pub position: Position,
    }

    #[derive(Debug, Deserialize)]
    pub struct Position {
        pub lat: f64,
        pub lng: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct ReverseResponse {
        #[serde(default)]
        pub items: Vec<ReverseItem>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ReverseItem {
        #[serde(default)]
        pub address: HereAddress,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct HereAddress {
        pub label: String,
        pub country_code: String,
        pub country_name: String,
        pub state_code: String,
        pub state: String,
        pub county: String,
        pub district: String,
        pub city: String,
        pub street: String,
        pub postal_code: String,
        pub house_number: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ErrorBody {
        pub status: Option<u16>,
        #[serde(default)]
        pub title: String,
        #[serde(default)]
        pub error_description: String,
    }
}

/// HERE response decoding
#[derive(Debug)]
pub struct HereParser;

impl ResponseParser for HereParser {
    fn locations(&self, body: &[u8]) -> Result<Vec<Location>, GeocodingError> {
        let response: api::GeocodeResponse = decode(body)?;
        Ok(response
            .items
            .into_iter()
            .map(|item| Location::new_unchecked(item.position.lat, item.position.lng))
            .collect())
    }

    fn addresses(&self, body: &[u8]) -> Result<Vec<Address>, GeocodingError> {
        let response: api::ReverseResponse = decode(body)?;
        Ok(response
            .items
            .into_iter()
            .map(|item| {
                let a = item.address;
                Address {
                    formatted_address: a.label,
                    street: a.street,
                    house_number: a.house_number,
                    suburb: a.district,
                    postcode: a.postal_code,
                    state: a.state,
                    state_code: a.state_code,
                    state_district: String::new(),
                    county: a.county,
                    country: a.country_name,
                    country_code: a.country_code,
                    city: a.city,
                }
            })
            .collect())
    }

    fn error(&self, status: u16, body: &[u8]) -> Option<ProviderError> {
        let err: api::ErrorBody = serde_json::from_slice(body).ok()?;
        let message = if err.title.is_empty() {
            err.error_description
        } else {
            err.title
        };
        (!message.is_empty()).then(|| ProviderError::new(err.status.unwrap_or(status), message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> HereEndpoints {
        let (geocode_url, reverse_url) = EndpointOverrides::default()
            .resolve(DEFAULT_GEOCODE_URL, DEFAULT_REVERSE_URL)
            .unwrap();
        HereEndpoints {
            api_key: ApiKey::new("k"),
            geocode_url,
            reverse_url,
        }
    }

    #[test]
    fn test_geocode_url() {
        let config = GeocodeConfig::new("de".parse().unwrap(), 0);
        let url = endpoints().geocode_url("Unter den Linden 1, Berlin", &config);

        assert_eq!(url.host_str(), Some("geocode.search.hereapi.com"));
        assert_eq!(
            url.query(),
            Some("apiKey=k&lang=de&limit=1&q=Unter+den+Linden+1%2C+Berlin")
        );
    }

    #[test]
    fn test_reverse_geocode_url() {
        let url = endpoints().reverse_geocode_url(
            Location::new_unchecked(52.52, 13.405),
            &ReverseGeocodeConfig::default(),
        );

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("at".to_string(), "52.520000,13.405000".to_string())));
        assert!(pairs.contains(&("types".to_string(), "city,street".to_string())));
        assert!(pairs.contains(&("lang".to_string(), "en".to_string())));
    }

    #[test]
    fn test_parse_locations() {
        let body = br#"{"items":[{"title":"x","position":{"lat":37.4224,"lng":-122.0841}}]}"#;
        let locations = HereParser.locations(body).unwrap();
        assert_eq!(locations, vec![Location::new_unchecked(37.4224, -122.0841)]);
    }

    #[test]
    fn test_parse_addresses() {
        let body = r#"{"items":[{"address":{
            "label":"Invalidenstraße 117, 10115 Berlin, Deutschland",
            "countryCode":"DEU","countryName":"Deutschland","stateCode":"BE",
            "state":"Berlin","county":"Berlin","city":"Berlin","district":"Mitte",
            "street":"Invalidenstraße","postalCode":"10115","houseNumber":"117"}}]}"#
            .as_bytes();
        let addresses = HereParser.addresses(body).unwrap();

        assert_eq!(addresses.len(), 1);
        let a = &addresses[0];
        assert_eq!(a.suburb, "Mitte");
        assert_eq!(a.country, "Deutschland");
        assert_eq!(a.state_code, "BE");
        assert_eq!(a.house_number, "117");
        assert!(a.state_district.is_empty());
    }

    #[test]
    fn test_error_payload() {
        let body = br#"{"status":401,"title":"Unauthorized","error_description":"apiKey invalid"}"#;
        let err = HereParser.error(401, body).unwrap();
        assert_eq!(err.message(), "Unauthorized");
        assert_eq!(err.status(), 401);

        let body = br#"{"error":"Forbidden","error_description":"apiKey invalid"}"#;
        let err = HereParser.error(403, body).unwrap();
        assert_eq!(err.message(), "apiKey invalid");
        assert_eq!(err.status(), 403);
    }

    #[test]
    fn test_success_body_is_not_an_error() {
        assert!(HereParser.error(200, br#"{"items":[]}"#).is_none());
        assert!(HereParser.error(502, b"Bad Gateway").is_none());
    }
}
