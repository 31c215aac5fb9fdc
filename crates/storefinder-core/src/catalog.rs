use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::{ConfigError, Store};

const BUILTIN_CATALOG: &str = include_str!("../data/stores.yaml");

/// On-disk shape of a catalog file.
#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub stores: Vec<Store>,
}

/// The fixed, ordered list of stores a session resolves against.
///
/// Order is significant: it is the tie-break order for the resolver. A
/// catalog is validated once on construction and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    stores: Vec<Store>,
}

impl Catalog {
    /// Validate and wrap a list of stores.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if a store has an empty name, a
    /// name is repeated (case-insensitively), or a coordinate is invalid.
    pub fn new(stores: Vec<Store>) -> Result<Self, ConfigError> {
        validate_stores(&stores)?;
        Ok(Self { stores })
    }

    /// The catalog bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] only if the bundled data is malformed.
    pub fn builtin() -> Result<Self, ConfigError> {
        parse_catalog(BUILTIN_CATALOG)
    }

    #[must_use]
    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Store> {
        self.stores.iter()
    }

    /// Look a store up by name, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Store> {
        let wanted = name.trim().to_lowercase();
        self.stores.iter().find(|s| s.name.to_lowercase() == wanted)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Store;
    type IntoIter = std::slice::Iter<'a, Store>;

    fn into_iter(self) -> Self::IntoIter {
        self.stores.iter()
    }
}

/// Load and validate a store catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<Catalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let catalog = parse_catalog(&content)?;
    tracing::debug!(path = %path.display(), stores = catalog.len(), "loaded store catalog");
    Ok(catalog)
}

fn parse_catalog(content: &str) -> Result<Catalog, ConfigError> {
    let file: CatalogFile = serde_yaml::from_str(content)?;
    Catalog::new(file.stores)
}

fn validate_stores(stores: &[Store]) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for store in stores {
        if store.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "store name must be non-empty".to_string(),
            ));
        }

        if let Err(e) = store.coordinate.validate() {
            return Err(ConfigError::Validation(format!(
                "store '{}' has an invalid location: {e}",
                store.name
            )));
        }

        if !seen_names.insert(store.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate store name: '{}'",
                store.name
            )));
        }
    }

    Ok(())
}
