//! Property-based tests for domain value objects
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::{GeocodeConfig, LanguageTag, Location, ReverseGeocodeConfig};
use proptest::prelude::*;

// ============================================================================
// Location Property Tests
// ============================================================================

mod location_tests {
    use super::*;

    proptest! {
        #[test]
        fn valid_coordinates_create_location(
            lat in -90.0f64..=90.0f64,
            lng in -180.0f64..=180.0f64
        ) {
            let result = Location::new(lat, lng);
            prop_assert!(result.is_ok());

            let loc = result.unwrap();
            prop_assert!((loc.lat() - lat).abs() < f64::EPSILON);
            prop_assert!((loc.lng() - lng).abs() < f64::EPSILON);
        }

        #[test]
        fn invalid_latitude_rejected(
            lat in prop_oneof![
                (-1000.0f64..-90.1f64),
                (90.1f64..1000.0f64)
            ],
            lng in -180.0f64..=180.0f64
        ) {
            prop_assert!(Location::new(lat, lng).is_err());
        }

        #[test]
        fn invalid_longitude_rejected(
            lat in -90.0f64..=90.0f64,
            lng in prop_oneof![
                (-1000.0f64..-180.1f64),
                (180.1f64..1000.0f64)
            ]
        ) {
            prop_assert!(Location::new(lat, lng).is_err());
        }

        #[test]
        fn location_survives_json(
            lat in -90.0f64..=90.0f64,
            lng in -180.0f64..=180.0f64
        ) {
            let loc = Location::new(lat, lng).unwrap();
            let json = serde_json::to_string(&loc).unwrap();
            let back: Location = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(loc, back);
        }
    }
}

// ============================================================================
// Lookup Option Property Tests
// ============================================================================

mod config_tests {
    use super::*;

    proptest! {
        #[test]
        fn limit_is_never_zero(limit in 0u32..1000) {
            prop_assert!(GeocodeConfig::new(LanguageTag::english(), limit).limit >= 1);
            prop_assert!(ReverseGeocodeConfig::new(LanguageTag::english(), limit, 0).limit >= 1);
        }

        #[test]
        fn alphabetic_primary_tags_parse(tag in "[a-z]{2,8}") {
            prop_assert!(LanguageTag::parse(&tag).is_ok());
        }

        #[test]
        fn tags_with_underscores_rejected(a in "[a-z]{2,3}", b in "[A-Z]{2}") {
            let tag = format!("{a}_{b}");
            prop_assert!(LanguageTag::parse(&tag).is_err());
        }
    }
}
