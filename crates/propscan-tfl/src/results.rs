//! Accumulated journey results keyed by postcode, with JSON persistence.

use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TflError;
use crate::export::{JourneyRow, LegSummary, PostcodeRow};
use crate::types::JourneyResult;

/// Dispatch output: postcode → journey result. Postcodes that failed are
/// simply absent.
///
/// Backed by a `BTreeMap`, so iteration and JSON serialization are always in
/// sorted key order (reproducible diffs between runs).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JourneyResults {
    pub(crate) results: BTreeMap<String, JourneyResult>,
}

impl JourneyResults {
    pub(crate) fn new(results: BTreeMap<String, JourneyResult>) -> Self {
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
    pub fn get(&self, postcode: &str) -> Option<&JourneyResult> {
        self.results.get(postcode)
    }

    /// The postcodes present in this collection, for incremental updates.
    #[must_use]
    pub fn collected_postcodes(&self) -> HashSet<String> {
        self.results.keys().cloned().collect()
    }

    /// Merges another collection into this one; `other` wins on duplicate
    /// postcodes.
    pub fn merge(&mut self, other: JourneyResults) {
        self.results.extend(other.results);
    }

    /// One summary row per postcode with the fastest journey's duration.
    /// Results without any journey are skipped with a warning.
    #[must_use]
    pub fn postcode_rows(&self) -> Vec<PostcodeRow> {
        self.results
            .iter()
            .filter_map(|(postcode, result)| {
                let Some(journey_time) = result.journeys.iter().map(|j| j.duration).min() else {
                    tracing::warn!(postcode = %postcode, "result has no journeys; skipping row");
                    return None;
                };
                Some(PostcodeRow {
                    postcode: postcode.clone(),
                    from: result.journey_vector.from.clone(),
                    to: result.journey_vector.to.clone(),
                    date_time: result.search_criteria.date_time.clone(),
                    journey_time,
                })
            })
            .collect()
    }

    /// One detail row per proposed journey, legs summarised to mode and
    /// duration.
    #[must_use]
    pub fn journey_rows(&self) -> Vec<JourneyRow> {
        self.results
            .iter()
            .flat_map(|(postcode, result)| {
                result
                    .journeys
                    .iter()
                    .enumerate()
                    .map(move |(journey_idx, journey)| JourneyRow {
                        postcode: postcode.clone(),
                        from: result.journey_vector.from.clone(),
                        to: result.journey_vector.to.clone(),
                        date_time: result.search_criteria.date_time.clone(),
                        date_time_type: result.search_criteria.date_time_type.clone(),
                        journey_idx,
                        duration: journey.duration,
                        legs: journey
                            .legs
                            .iter()
                            .map(|leg| LegSummary {
                                mode: leg.mode.name.clone(),
                                duration: leg.duration,
                            })
                            .collect(),
                    })
            })
            .collect()
    }

    /// Writes the postcode-keyed mapping as JSON, keys sorted.
    ///
    /// # Errors
    ///
    /// Returns [`TflError::Io`] or [`TflError::Json`].
    pub fn write_json(&self, path: &Path) -> Result<(), TflError> {
        let file = File::create(path).map_err(|e| TflError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        serde_json::to_writer(BufWriter::new(file), self).map_err(|e| TflError::Json {
            context: path.display().to_string(),
            source: e,
        })
    }

    /// Reads back a mapping previously written by [`Self::write_json`].
    ///
    /// # Errors
    ///
    /// Returns [`TflError::Io`] or [`TflError::Json`].
    pub fn read_json(path: &Path) -> Result<Self, TflError> {
        let file = File::open(path).map_err(|e| TflError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| TflError::Json {
            context: path.display().to_string(),
            source: e,
        })
    }
}
