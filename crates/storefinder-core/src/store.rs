use serde::{Deserialize, Serialize};

use crate::Coordinate;

/// A store record from the catalog.
///
/// Serialized flat as `name`, `address`, `lat`, `lng`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub name: String,
    pub address: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
}

impl Store {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        coordinate: Coordinate,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            coordinate,
        }
    }
}

/// A store annotated with its distance from some origin.
///
/// Only meaningful together with the origin it was computed for; recomputed
/// on every new position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedStore {
    #[serde(flatten)]
    pub store: Store,
    pub distance_km: f64,
}
