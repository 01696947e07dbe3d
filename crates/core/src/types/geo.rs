//! Geographic coordinates.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when building [`Coordinates`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CoordinatesError {
    #[error("{0} is not a number")]
    NotANumber(&'static str),
    #[error("latitude must be between -90 and 90 (got {0})")]
    LatitudeOutOfRange(f64),
    #[error("longitude must be between -180 and 180 (got {0})")]
    LongitudeOutOfRange(f64),
}

/// A latitude/longitude pair in decimal degrees.
///
/// Forms and the reverse-geocoding request both use the 6-decimal string
/// form returned by [`Coordinates::latitude_fixed`] and
/// [`Coordinates::longitude_fixed`] (roughly 10 cm of precision).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Build coordinates from decimal degrees.
    ///
    /// # Errors
    ///
    /// Returns an error if either value is non-finite or out of range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinatesError> {
        if !latitude.is_finite() {
            return Err(CoordinatesError::NotANumber("latitude"));
        }
        if !longitude.is_finite() {
            return Err(CoordinatesError::NotANumber("longitude"));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinatesError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinatesError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parse coordinates from form strings.
    ///
    /// # Errors
    ///
    /// Returns an error if either string is not a number, or is out of range.
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self, CoordinatesError> {
        let lat = latitude
            .trim()
            .parse::<f64>()
            .map_err(|_| CoordinatesError::NotANumber("latitude"))?;
        let lng = longitude
            .trim()
            .parse::<f64>()
            .map_err(|_| CoordinatesError::NotANumber("longitude"))?;
        Self::new(lat, lng)
    }

    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Latitude with exactly six decimals.
    #[must_use]
    pub fn latitude_fixed(&self) -> String {
        format!("{:.6}", self.latitude)
    }

    /// Longitude with exactly six decimals.
    #[must_use]
    pub fn longitude_fixed(&self) -> String {
        format!("{:.6}", self.longitude)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}
