//! Linear-scan nearest-neighbor index over labeled coordinates.
//!
//! Distances are plain Euclidean on raw latitude/longitude degrees. That is a
//! deliberate simplification: over a single-city span the distortion is small
//! and the reference output depends on it, so it must not be "corrected" to a
//! geodesic formula. Partitioning by a group key (the outcode) keeps each
//! scan bounded.

use std::collections::BTreeMap;

/// A `(latitude, longitude)` pair in decimal degrees.
pub type Coord = (f64, f64);

/// Immutable nearest-neighbor index, optionally partitioned by a group key.
///
/// Ties on distance resolve deterministically: entries are sorted by label at
/// construction and the scan only replaces the current best on a strictly
/// smaller distance, so equal-distance matches go to the lowest-ordered
/// label (and, for cross-group scans, the lowest-ordered group first).
#[derive(Debug, Clone)]
pub struct NearestIndex<L> {
    groups: BTreeMap<String, Vec<(Coord, L)>>,
}

impl<L: Ord> NearestIndex<L> {
    /// Builds an unpartitioned index; queries scan every entry.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Coord, L)>,
    {
        let mut group: Vec<(Coord, L)> = entries.into_iter().collect();
        group.sort_by(|(_, a), (_, b)| a.cmp(b));
        let mut groups = BTreeMap::new();
        if !group.is_empty() {
            groups.insert(String::new(), group);
        }
        Self { groups }
    }

    /// Builds an index partitioned by `key_fn`; entries mapping to `None`
    /// are dropped.
    pub fn partitioned<I, F>(entries: I, key_fn: F) -> Self
    where
        I: IntoIterator<Item = (Coord, L)>,
        F: Fn(&L) -> Option<String>,
    {
        let mut groups: BTreeMap<String, Vec<(Coord, L)>> = BTreeMap::new();
        for (coord, label) in entries {
            if let Some(key) = key_fn(&label) {
                groups.entry(key).or_default().push((coord, label));
            }
        }
        for group in groups.values_mut() {
            group.sort_by(|(_, a), (_, b)| a.cmp(b));
        }
        Self { groups }
    }
}

impl<L> NearestIndex<L> {
    /// Closest entry across every group, or `None` for an empty index.
    #[must_use]
    pub fn nearest(&self, lat: f64, lon: f64) -> Option<(&L, f64)> {
        scan(self.groups.values().flat_map(|g| g.iter()), lat, lon)
    }

    /// Closest entry within one group. An unknown or empty group returns
    /// `None`.
    #[must_use]
    pub fn nearest_in(&self, group: &str, lat: f64, lon: f64) -> Option<(&L, f64)> {
        scan(self.groups.get(group)?.iter(), lat, lon)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of entries in one group; 0 for an unknown group.
    #[must_use]
    pub fn group_len(&self, group: &str) -> usize {
        self.groups.get(group).map_or(0, Vec::len)
    }
}

fn scan<'a, L>(
    entries: impl Iterator<Item = &'a (Coord, L)>,
    lat: f64,
    lon: f64,
) -> Option<(&'a L, f64)> {
    let mut best: Option<(&L, f64)> = None;
    for ((lat2, lon2), label) in entries {
        let distance = ((lat - lat2).powi(2) + (lon - lon2).powi(2)).sqrt();
        match best {
            Some((_, shortest)) if shortest <= distance => {}
            _ => best = Some((label, distance)),
        }
    }
    best
}
