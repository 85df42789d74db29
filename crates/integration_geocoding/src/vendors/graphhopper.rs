//! GraphHopper Geocoding API
//!
//! <https://docs.graphhopper.com/#tag/Geocoding-API>

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
pub const PROVIDER_KEY: &str = "graphhopper";
/// Default forward geocoding endpoint
pub const DEFAULT_GEOCODE_URL: &str = "https://graphhopper.com/api/1/geocode";
/// Default reverse geocoding endpoint (same resource, `reverse=true`)
pub const DEFAULT_REVERSE_URL: &str = "https://graphhopper.com/api/1/geocode";

/// Create a GraphHopper adapter
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
        GraphHopperEndpoints {
            api_key: ApiKey::new(api_key),
            geocode_url,
            reverse_url,
        },
        GraphHopperParser,
        config,
    )
}

/// GraphHopper request URLs
#[derive(Debug)]
pub struct GraphHopperEndpoints {
    api_key: ApiKey,
    geocode_url: Url,
    reverse_url: Url,
}

impl EndpointBuilder for GraphHopperEndpoints {
    fn geocode_url(&self, address: &str, config: &GeocodeConfig) -> Url {
        let mut url = self.geocode_url.clone();
        url.query_pairs_mut()
            .append_pair("q", address)
            .append_pair("limit", &config.effective_limit().to_string())
            .append_pair("lang", config.lang.as_str())
            .append_pair("key", self.api_key.as_str())
            .append_pair("reverse", "false");
        url
    }

    fn reverse_geocode_url(&self, location: Location, config: &ReverseGeocodeConfig) -> Url {
        let point = format!("{},{}", coordinate(location.lat()), coordinate(location.lng()));
        let mut url = self.reverse_url.clone();
        url.query_pairs_mut()
            .append_pair("point", &point)
            .append_pair("limit", &config.effective_limit().to_string())
            .append_pair("lang", config.lang.as_str())
            .append_pair("key", self.api_key.as_str())
            .append_pair("reverse", "true");
        url
    }
}

mod api {
    use super::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct GeocodeResponse {
        #[serde(default)]
        pub hits: Vec<GeocodeHit>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodeHit {
        pub point: Point,
    }

    #[derive(Debug, Deserialize)]
    pub struct Point {
        pub lat: f64,
        pub lng: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct ReverseResponse {
        #[serde(default)]
        pub hits: Vec<ReverseHit>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub struct ReverseHit {
        pub country: String,
        pub countrycode: String,
        pub city: String,
        pub state: String,
        pub county: String,
        pub street: String,
        pub housenumber: String,
        pub postcode: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ErrorBody {
        #[serde(default)]
        pub message: String,
    }
}

/// Join the non-empty address parts from the most to the least general
fn format_address(hit: &api::ReverseHit) -> String {
    [
        &hit.country,
        &hit.postcode,
        &hit.state,
        &hit.city,
        &hit.street,
        &hit.housenumber,
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .map(String::as_str)
    .collect::<Vec<_>>()
    .join(", ")
}

/// GraphHopper response decoding
#[derive(Debug)]
pub struct GraphHopperParser;

impl ResponseParser for GraphHopperParser {
    fn locations(&self, body: &[u8]) -> Result<Vec<Location>, GeocodingError> {
        let response: api::GeocodeResponse = decode(body)?;
        Ok(response
            .hits
            .into_iter()
            .map(|hit| Location::new_unchecked(hit.point.lat, hit.point.lng))
            .collect())
    }

    fn addresses(&self, body: &[u8]) -> Result<Vec<Address>, GeocodingError> {
        let response: api::ReverseResponse = decode(body)?;
        Ok(response
            .hits
            .into_iter()
            .map(|hit| Address {
                formatted_address: format_address(&hit),
                street: hit.street,
                house_number: hit.housenumber,
                postcode: hit.postcode,
                state: hit.state,
                county: hit.county,
                country: hit.country,
                country_code: hit.countrycode.to_uppercase(),
                city: hit.city,
                ..Default::default()
            })
            .collect())
    }

    fn error(&self, status: u16, body: &[u8]) -> Option<ProviderError> {
        let err: api::ErrorBody = serde_json::from_slice(body).ok()?;
        (!err.message.is_empty()).then(|| ProviderError::new(status, err.message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_address_skips_empty_parts() {
        let hit = api::ReverseHit {
            country: "Deutschland".to_string(),
            postcode: "10117".to_string(),
            city: "Berlin".to_string(),
            street: "Unter den Linden".to_string(),
            ..Default::default()
        };
        assert_eq!(
            format_address(&hit),
            "Deutschland, 10117, Berlin, Unter den Linden"
        );
        assert_eq!(format_address(&api::ReverseHit::default()), "");
    }

    #[test]
    fn test_reverse_url_sets_point_and_flag() {
        let (geocode_url, reverse_url) = EndpointOverrides::default()
            .resolve(DEFAULT_GEOCODE_URL, DEFAULT_REVERSE_URL)
            .unwrap();
        let endpoints = GraphHopperEndpoints {
            api_key: ApiKey::new("gh"),
            geocode_url,
            reverse_url,
        };

        let url = endpoints.reverse_geocode_url(
            Location::new_unchecked(48.1, 11.5),
            &ReverseGeocodeConfig::new("de".parse().unwrap(), 3, 0),
        );
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("point".to_string(), "48.100000,11.500000".to_string())));
        assert!(pairs.contains(&("limit".to_string(), "3".to_string())));
        assert!(pairs.contains(&("reverse".to_string(), "true".to_string())));
        assert!(pairs.contains(&("key".to_string(), "gh".to_string())));

        let url = endpoints.geocode_url("Marienplatz", &GeocodeConfig::default());
        assert_eq!(
            url.query(),
            Some("q=Marienplatz&limit=1&lang=en&key=gh&reverse=false")
        );
    }

    #[test]
    fn test_parse_addresses() {
        let body = r#"{"hits":[{"point":{"lat":52.5,"lng":13.4},"country":"Germany",
            "countrycode":"de","city":"Berlin","street":"Friedrichstraße","housenumber":"43"}]}"#
            .as_bytes();
        let addresses = GraphHopperParser.addresses(body).unwrap();

        assert_eq!(addresses[0].formatted_address, "Germany, Berlin, Friedrichstraße, 43");
        assert_eq!(addresses[0].country_code, "DE");
        assert!(addresses[0].suburb.is_empty());
    }

    #[test]
    fn test_parse_empty_hits() {
        assert!(GraphHopperParser.locations(br#"{"hits":[]}"#).unwrap().is_empty());
        assert!(GraphHopperParser.locations(br#"{"took":3}"#).unwrap().is_empty());
    }

    #[test]
    fn test_error_payload() {
        let err = GraphHopperParser
            .error(401, br#"{"message":"Wrong credentials. Register and get a valid API key"}"#)
            .unwrap();
        assert_eq!(err.status(), 401);
        assert!(err.message().starts_with("Wrong credentials"));
        assert!(GraphHopperParser.error(200, br#"{"hits":[]}"#).is_none());
    }
}
