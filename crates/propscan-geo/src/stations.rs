//! Nearest-station enrichment over the postcode table.

use serde::{Deserialize, Serialize};

use crate::nearest::NearestIndex;
use crate::postcodes::PostcodeTable;

/// One station record from the external stations source.
#[derive(Debug, Clone, Deserialize)]
pub struct StationRecord {
    pub station: String,
    pub zone: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Station identity carried as the index label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct StationLabel {
    name: String,
    zone: String,
}

/// One postcode annotated with its closest station.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostcodeStationRow {
    pub postcode: String,
    pub nearest_station: String,
    pub station_zone: String,
    pub station_distance: f64,
}

/// Annotates every postcode in the table with its nearest station.
///
/// Returns one row per postcode, in the table's sorted order. An empty
/// station list yields no rows.
#[must_use]
pub fn annotate_nearest_stations(
    table: &PostcodeTable,
    stations: &[StationRecord],
) -> Vec<PostcodeStationRow> {
    let index = NearestIndex::from_entries(stations.iter().map(|s| {
        (
            (s.latitude, s.longitude),
            StationLabel {
                name: s.station.clone(),
                zone: s.zone.clone(),
            },
        )
    }));
    if index.is_empty() {
        tracing::warn!("no station records supplied; skipping nearest-station annotation");
        return Vec::new();
    }

    table
        .iter()
        .filter_map(|(postcode, (lat, lon))| {
            let (label, distance) = index.nearest(lat, lon)?;
            Some(PostcodeStationRow {
                postcode: postcode.to_owned(),
                nearest_station: label.name.clone(),
                station_zone: label.zone.clone(),
                station_distance: distance,
            })
        })
        .collect()
}
