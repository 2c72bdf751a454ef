//! Accumulated search results keyed by location, with JSON persistence.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RightmoveError;
use crate::types::{LocationResult, Property};

/// Dispatch output: location name → collected result. Locations that failed
/// entirely are simply absent.
///
/// Backed by a `BTreeMap`, so iteration and JSON serialization are always in
/// sorted key order (reproducible diffs between runs).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchResults {
    pub(crate) results: BTreeMap<String, LocationResult>,
}

impl SearchResults {
    pub(crate) fn new(results: BTreeMap<String, LocationResult>) -> Self {
        Self { results }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    #[must_use]
    pub fn get(&self, location: &str) -> Option<&LocationResult> {
        self.results.get(location)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LocationResult)> {
        self.results.iter().map(|(name, r)| (name.as_str(), r))
    }

    /// Every collected property across all locations, the flat-list view of
    /// the result set.
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.results.values().flat_map(|r| r.properties.iter())
    }

    #[must_use]
    pub fn property_count(&self) -> usize {
        self.results.values().map(|r| r.properties.len()).sum()
    }

    /// Writes the location-keyed mapping as JSON, keys sorted.
    ///
    /// # Errors
    ///
    /// Returns [`RightmoveError::Io`] or [`RightmoveError::Json`].
    pub fn write_json(&self, path: &Path) -> Result<(), RightmoveError> {
        let file = File::create(path).map_err(|e| RightmoveError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        serde_json::to_writer(BufWriter::new(file), self).map_err(|e| RightmoveError::Json {
            context: path.display().to_string(),
            source: e,
        })
    }

    /// Writes the flat property list as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RightmoveError::Io`] or [`RightmoveError::Json`].
    pub fn write_properties_json(&self, path: &Path) -> Result<(), RightmoveError> {
        let file = File::create(path).map_err(|e| RightmoveError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let flat: Vec<&Property> = self.properties().collect();
        serde_json::to_writer(BufWriter::new(file), &flat).map_err(|e| RightmoveError::Json {
            context: path.display().to_string(),
            source: e,
        })
    }

    /// Reads back a mapping previously written by [`Self::write_json`].
    ///
    /// # Errors
    ///
    /// Returns [`RightmoveError::Io`] or [`RightmoveError::Json`].
    pub fn read_json(path: &Path) -> Result<Self, RightmoveError> {
        let file = File::open(path).map_err(|e| RightmoveError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| RightmoveError::Json {
            context: path.display().to_string(),
            source: e,
        })
    }
}
