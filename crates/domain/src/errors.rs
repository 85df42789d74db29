//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Coordinates outside the valid WGS84 range
    #[error(
        "Invalid coordinates: latitude {latitude} must be -90 to 90, \
         longitude {longitude} must be -180 to 180"
    )]
    InvalidCoordinates {
        /// Rejected latitude
        latitude: f64,
        /// Rejected longitude
        longitude: f64,
    },

    /// Malformed language tag
    #[error("Invalid language tag: {0}")]
    InvalidLanguageTag(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}
