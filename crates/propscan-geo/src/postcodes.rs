//! Interface boundary over the externally parsed UK postcode directory.
//!
//! The raw directory CSV is cleaned elsewhere; this module consumes
//! ready-made `(postcode, latitude, longitude)` records and exposes the
//! lookups the fetch and enrichment layers need. Postcodes are expected in
//! canonical uppercase form with a single separating space (`"SW10 0JG"`).

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::nearest::{Coord, NearestIndex};

/// One centroid record from the external postcode source.
#[derive(Debug, Clone, Deserialize)]
pub struct PostcodeRecord {
    pub postcode: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Postcode → centroid reference table.
///
/// Multiple postcodes may share one centroid (the source rounds coordinates);
/// the table keeps every postcode, so indexes built from it carry all labels.
#[derive(Debug, Clone, Default)]
pub struct PostcodeTable {
    coords: BTreeMap<String, Coord>,
}

impl PostcodeTable {
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = PostcodeRecord>,
    {
        let coords = records
            .into_iter()
            .map(|r| (r.postcode, (r.latitude, r.longitude)))
            .collect();
        Self { coords }
    }

    #[must_use]
    pub fn coord(&self, postcode: &str) -> Option<Coord> {
        self.coords.get(postcode).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Coord)> {
        self.coords.iter().map(|(p, c)| (p.as_str(), *c))
    }

    /// Postcode → centroid map in sorted order, as the dispatch layer wants
    /// its target list.
    #[must_use]
    pub fn to_coord_map(&self) -> BTreeMap<String, Coord> {
        self.coords.clone()
    }

    /// Sorted unique outcodes across the table.
    #[must_use]
    pub fn outcodes(&self) -> Vec<String> {
        let mut outcodes: Vec<String> = self
            .coords
            .keys()
            .filter_map(|p| outcode(p))
            .map(str::to_owned)
            .collect();
        outcodes.dedup();
        outcodes
    }

    /// Centroid index partitioned by outcode, for postcode estimation.
    #[must_use]
    pub fn nearest_index(&self) -> NearestIndex<String> {
        NearestIndex::partitioned(
            self.coords.iter().map(|(p, c)| (*c, p.clone())),
            |postcode| outcode(postcode).map(str::to_owned),
        )
    }
}

/// The outward part of a postcode (`"SW10 0JG"` → `"SW10"`), or `None` when
/// there is no space separator.
#[must_use]
pub fn outcode(postcode: &str) -> Option<&str> {
    postcode.split_once(' ').map(|(out, _)| out)
}

/// The postcode sector: everything except the final two characters
/// (`"SW10 0JG"` → `"SW10 0"`).
#[must_use]
pub fn sector(postcode: &str) -> &str {
    let cut = postcode.len().saturating_sub(2);
    postcode.get(..cut).unwrap_or(postcode)
}
