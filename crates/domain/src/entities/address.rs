//! Normalized postal address

use serde::{Deserialize, Serialize};

/// Vendor-agnostic address produced by reverse geocoding
///
/// Every field is optional; an empty string means the vendor did not supply it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    /// Single-line, human-readable address
    pub formatted_address: String,
    /// Street name
    pub street: String,
    /// House number
    pub house_number: String,
    /// Suburb or city district
    pub suburb: String,
    /// Postal code
    pub postcode: String,
    /// State or province
    pub state: String,
    /// State or province code
    pub state_code: String,
    /// Administrative area below state level
    pub state_district: String,
    /// County
    pub county: String,
    /// Country name
    pub country: String,
    /// ISO 3166-1 country code
    pub country_code: String,
    /// City, town or village
    pub city: String,
}

impl Address {
    /// Returns true if no field carries a value
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_address_is_empty() {
        assert!(Address::default().is_empty());
    }

    #[test]
    fn address_with_any_field_is_not_empty() {
        let addr = Address {
            city: "Berlin".to_string(),
            ..Default::default()
        };
        assert!(!addr.is_empty());
    }

    #[test]
    fn missing_fields_deserialize_as_empty() {
        let addr: Address = serde_json::from_str(r#"{"formatted_address":"X"}"#).unwrap();
        assert_eq!(addr.formatted_address, "X");
        assert!(addr.street.is_empty());
        assert!(addr.country_code.is_empty());
    }
}
