//! Deep links to an external directions service.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use storefinder_core::Coordinate;

/// Characters left as-is in a `lat,lng` query value.
const COORDINATE_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b',').remove(b'.').remove(b'-');

/// Build a directions URL from `origin` to `destination`.
///
/// Appends `origin=<lat>,<lng>` and `destination=<lat>,<lng>` to `base`,
/// which may already carry a query string (e.g. `...?api=1`).
#[must_use]
pub fn directions_url(base: &str, origin: Coordinate, destination: Coordinate) -> String {
    let separator = if base.ends_with('?') || base.ends_with('&') {
        ""
    } else if base.contains('?') {
        "&"
    } else {
        "?"
    };

    format!(
        "{base}{separator}origin={}&destination={}",
        encode(origin),
        encode(destination)
    )
}

fn encode(coordinate: Coordinate) -> String {
    utf8_percent_encode(&coordinate.to_string(), COORDINATE_VALUE).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bangalore() -> Coordinate {
        Coordinate {
            lat: 12.9716,
            lng: 77.5946,
        }
    }

    fn store_a() -> Coordinate {
        Coordinate {
            lat: 12.9352,
            lng: 77.6146,
        }
    }

    #[test]
    fn appends_to_existing_query() {
        let url = directions_url("https://www.google.com/maps/dir/?api=1", bangalore(), store_a());
        assert_eq!(
            url,
            "https://www.google.com/maps/dir/?api=1&origin=12.9716,77.5946&destination=12.9352,77.6146"
        );
    }

    #[test]
    fn starts_query_when_base_has_none() {
        let url = directions_url("https://maps.example.com/dir", bangalore(), store_a());
        assert_eq!(
            url,
            "https://maps.example.com/dir?origin=12.9716,77.5946&destination=12.9352,77.6146"
        );
    }

    #[test]
    fn does_not_double_separator() {
        let url = directions_url("https://maps.example.com/dir?", bangalore(), store_a());
        assert!(url.starts_with("https://maps.example.com/dir?origin="));
    }

    #[test]
    fn keeps_negative_signs() {
        let url = directions_url(
            "https://maps.example.com/dir",
            Coordinate {
                lat: -33.8688,
                lng: 151.2093,
            },
            Coordinate {
                lat: 40.7128,
                lng: -74.006,
            },
        );
        assert!(url.ends_with("origin=-33.8688,151.2093&destination=40.7128,-74.006"));
    }
}
