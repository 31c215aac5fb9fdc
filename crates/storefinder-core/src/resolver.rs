//! Nearest-store resolution.
//!
//! Both entry points validate the origin and every catalog coordinate before
//! measuring anything. An invalid catalog coordinate is returned as an error
//! rather than skipped: it means the catalog data is broken.

use crate::{haversine_km, Coordinate, CoreError, RankedStore, Store};

/// Return the store closest to `origin`, or `None` for an empty catalog.
///
/// When several stores share the exact minimum distance the one that appears
/// first in `catalog` wins.
///
/// # Errors
///
/// Returns [`CoreError::InvalidCoordinate`] if `origin` or any catalog
/// coordinate is non-finite or out of range.
pub fn resolve(origin: Coordinate, catalog: &[Store]) -> Result<Option<RankedStore>, CoreError> {
    origin.validate()?;

    let mut nearest: Option<(&Store, f64)> = None;
    for store in catalog {
        store.coordinate.validate()?;
        let distance_km = haversine_km(origin, store.coordinate);
        // Strict comparison keeps the earliest store on ties.
        if nearest.is_none_or(|(_, best)| distance_km < best) {
            nearest = Some((store, distance_km));
        }
    }

    let result = nearest.map(|(store, distance_km)| RankedStore {
        store: store.clone(),
        distance_km,
    });

    if let Some(ranked) = &result {
        tracing::debug!(
            origin = %origin,
            store = %ranked.store.name,
            distance_km = ranked.distance_km,
            candidates = catalog.len(),
            "resolved nearest store"
        );
    }

    Ok(result)
}

/// Annotate every store with its distance from `origin`, nearest first.
///
/// The sort is stable, so stores at equal distance keep catalog order and the
/// first element always agrees with [`resolve`].
///
/// # Errors
///
/// Returns [`CoreError::InvalidCoordinate`] under the same conditions as
/// [`resolve`].
pub fn rank(origin: Coordinate, catalog: &[Store]) -> Result<Vec<RankedStore>, CoreError> {
    origin.validate()?;

    let mut ranked = catalog
        .iter()
        .map(|store| {
            store.coordinate.validate()?;
            Ok(RankedStore {
                store: store.clone(),
                distance_km: haversine_km(origin, store.coordinate),
            })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    Ok(ranked)
}
