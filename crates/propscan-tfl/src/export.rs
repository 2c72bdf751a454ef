//! Row-oriented export of journey results for downstream analysis.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;

use crate::error::TflError;

/// Per-postcode summary row: the fastest proposed journey.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostcodeRow {
    pub postcode: String,
    pub from: String,
    pub to: String,
    pub date_time: String,
    /// Minutes, minimum over the proposed journeys.
    pub journey_time: i64,
}

/// Per-journey detail row.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JourneyRow {
    pub postcode: String,
    pub from: String,
    pub to: String,
    pub date_time: String,
    pub date_time_type: Option<String>,
    pub journey_idx: usize,
    pub duration: i64,
    pub legs: Vec<LegSummary>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LegSummary {
    pub mode: String,
    pub duration: i64,
}

/// Writes export rows as a JSON array.
///
/// # Errors
///
/// Returns [`TflError::Io`] or [`TflError::Json`].
pub fn write_rows_json<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), TflError> {
    let file = File::create(path).map_err(|e| TflError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::to_writer(BufWriter::new(file), rows).map_err(|e| TflError::Json {
        context: path.display().to_string(),
        source: e,
    })
}
