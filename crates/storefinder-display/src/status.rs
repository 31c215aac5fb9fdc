use storefinder_position::LocationState;

/// Human-readable lines describing `state`, in display order.
#[must_use]
pub fn status_lines(state: &LocationState) -> Vec<String> {
    match state {
        LocationState::Fetching => vec!["Getting location...".to_string()],
        LocationState::Failed { message, .. } => vec![format!("Error: {message}")],
        LocationState::Located(snapshot) => {
            let mut lines = vec![
                format!("Latitude: {}", snapshot.origin.lat),
                format!("Longitude: {}", snapshot.origin.lng),
            ];
            if let Some(nearest) = &snapshot.nearest {
                lines.push(format!(
                    "Nearest Store: {} ({:.2} km)",
                    nearest.store.name, nearest.distance_km
                ));
            }
            lines
        }
    }
}

#[cfg(test)]
mod tests {
    use storefinder_core::{Catalog, Coordinate, Store};
    use storefinder_position::{PositionError, PositionEvent, PositionFix};

    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![Store::new(
            "A",
            "addr",
            Coordinate {
                lat: 12.9352,
                lng: 77.6146,
            },
        )])
        .unwrap()
    }

    #[test]
    fn fetching_state() {
        assert_eq!(
            status_lines(&LocationState::Fetching),
            ["Getting location..."]
        );
    }

    #[test]
    fn located_state_lists_position_and_nearest() {
        let fix = PositionFix::new(Coordinate {
            lat: 12.9716,
            lng: 77.5946,
        });
        let state = LocationState::Fetching
            .apply(&PositionEvent::Fix(fix), &catalog())
            .unwrap();
        let lines = status_lines(&state);
        assert_eq!(lines[0], "Latitude: 12.9716");
        assert_eq!(lines[1], "Longitude: 77.5946");
        assert!(lines[2].starts_with("Nearest Store: A ("));
        assert!(lines[2].ends_with(" km)"));
    }

    #[test]
    fn located_without_stores_omits_nearest_line() {
        let empty = Catalog::new(Vec::new()).unwrap();
        let fix = PositionFix::new(Coordinate { lat: 1.0, lng: 2.0 });
        let state = LocationState::Fetching
            .apply(&PositionEvent::Fix(fix), &empty)
            .unwrap();
        assert_eq!(status_lines(&state).len(), 2);
    }

    #[test]
    fn failed_state_shows_error() {
        let state = LocationState::Fetching
            .apply(
                &PositionEvent::Failure(PositionError::PermissionDenied),
                &catalog(),
            )
            .unwrap();
        assert_eq!(
            status_lines(&state),
            ["Error: permission to access location was denied"]
        );
    }
}
