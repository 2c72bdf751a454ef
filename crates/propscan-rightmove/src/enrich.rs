//! Post-collection passes: cleaning, postcode estimation, journey times.

use std::collections::HashMap;

use propscan_geo::{sector, PostcodeTable};

use crate::results::SearchResults;
use crate::types::PropertyType;

/// Property types excluded from cleaned results by default.
pub const DEFAULT_EXCLUDED_TYPES: &[&str] = &["share", "garage", "retirement", "park", "multiple"];

impl SearchResults {
    /// Drops unwanted property types, strips the bulky passthrough fields,
    /// and attaches the owning location and public listing URL to each
    /// property.
    pub fn clean(&mut self, prop_type: PropertyType, excluded_types: &[&str]) {
        let prefix = prop_type.listing_url_prefix();
        let before = self.property_count();
        for (location, result) in &mut self.results {
            result
                .properties
                .retain(|p| !excluded_types.iter().any(|t| p.property_type.contains(t)));
            for property in &mut result.properties {
                property.extra.remove("branch");
                property.extra.remove("displayPrices");
                property.location = Some(location.clone());
                property.url = Some(format!("{prefix}{}.html", property.identifier));
            }
        }
        tracing::info!(
            dropped = before - self.property_count(),
            kept = self.property_count(),
            "results cleaned"
        );
    }

    /// Estimates each property's postcode from the nearest centroid within
    /// its own outcode group.
    ///
    /// Fills `postcode_estimate`, `postcode_sector`, and
    /// `postcode_distance`. Properties in a location with no centroids are
    /// left unestimated and counted in a warning.
    pub fn estimate_postcodes(&mut self, table: &PostcodeTable) {
        let index = table.nearest_index();
        let mut unmatched = 0usize;
        for (location, result) in &mut self.results {
            for property in &mut result.properties {
                match index.nearest_in(location, property.latitude, property.longitude) {
                    Some((postcode, distance)) => {
                        property.postcode_estimate = Some(postcode.clone());
                        property.postcode_sector = Some(sector(postcode).to_owned());
                        property.postcode_distance = Some(distance);
                    }
                    None => unmatched += 1,
                }
            }
        }
        if unmatched > 0 {
            tracing::warn!(unmatched, "properties without a centroid in their outcode group");
        }
    }

    /// Joins journey times onto estimated postcodes from an externally
    /// supplied postcode → minutes mapping.
    pub fn add_journey_times(&mut self, journey_times: &HashMap<String, f64>) {
        let mut missing = 0usize;
        for result in self.results.values_mut() {
            for property in &mut result.properties {
                let Some(postcode) = property.postcode_estimate.as_deref() else {
                    continue;
                };
                match journey_times.get(postcode) {
                    Some(minutes) => property.journey_time = Some(*minutes),
                    None => {
                        missing += 1;
                        tracing::warn!(postcode = %postcode, "no journey time for postcode");
                    }
                }
            }
        }
        if missing > 0 {
            tracing::warn!(missing, "properties without a journey time");
        }
    }
}
