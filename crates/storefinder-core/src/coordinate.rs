use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A geographic position in decimal degrees.
///
/// Fields are public so catalog data can be deserialized and built as plain
/// literals; anything that feeds the resolver is checked with
/// [`Coordinate::validate`] first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Build a validated coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] if either component is
    /// non-finite or outside its range.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoreError> {
        let coordinate = Self { lat, lng };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Check that latitude is within [-90, 90] and longitude within
    /// [-180, 180], both finite.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] naming the offending component.
    pub fn validate(&self) -> Result<(), CoreError> {
        let reason = if !self.lat.is_finite() {
            Some("latitude is not a finite number")
        } else if !self.lng.is_finite() {
            Some("longitude is not a finite number")
        } else if !(-90.0..=90.0).contains(&self.lat) {
            Some("latitude must be within [-90, 90]")
        } else if !(-180.0..=180.0).contains(&self.lng) {
            Some("longitude must be within [-180, 180]")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(CoreError::InvalidCoordinate {
                lat: self.lat,
                lng: self.lng,
                reason,
            }),
            None => Ok(()),
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_range_boundaries() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn new_rejects_latitude_out_of_range() {
        let err = Coordinate::new(90.000_1, 0.0).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidCoordinate { reason, .. } if reason.starts_with("latitude")
        ));
    }

    #[test]
    fn new_rejects_longitude_out_of_range() {
        let err = Coordinate::new(0.0, -180.5).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidCoordinate { reason, .. } if reason.starts_with("longitude")
        ));
    }

    #[test]
    fn new_rejects_non_finite_values() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
        assert!(Coordinate::new(f64::NEG_INFINITY, f64::NAN).is_err());
    }

    #[test]
    fn validate_catches_literal_construction() {
        let bad = Coordinate {
            lat: 123.0,
            lng: 0.0,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn display_is_comma_separated_without_space() {
        let c = Coordinate {
            lat: 12.9716,
            lng: 77.5946,
        };
        assert_eq!(c.to_string(), "12.9716,77.5946");
    }
}
