//! Concurrent per-postcode journey dispatch.

use std::collections::{BTreeMap, HashSet};

use chrono::Local;
use futures::stream::{self, StreamExt};

use crate::client::JourneyClient;
use crate::error::TflError;
use crate::results::JourneyResults;
use crate::types::{Departure, JourneyResult};

impl JourneyClient {
    /// Plans one journey per postcode to `destination`, all tasks sharing
    /// this client's rate limiter.
    ///
    /// A postcode whose fetch fails (terminal transport error, missing
    /// `journeys` field, unrecognised status) is logged and absent from the
    /// result map; it never aborts its siblings. HTTP 300 answers are
    /// retried once with the postcode's raw coordinates, which the planner
    /// always accepts.
    ///
    /// # Errors
    ///
    /// Returns [`TflError::DepartureInPast`] before issuing any request if
    /// the departure has already happened. Per-postcode failures are not
    /// errors at this level.
    pub async fn plan_journeys(
        &self,
        postcodes: &BTreeMap<String, (f64, f64)>,
        destination: &str,
        departure: Departure,
    ) -> Result<JourneyResults, TflError> {
        if departure.is_past(Local::now().naive_local()) {
            return Err(TflError::DepartureInPast {
                requested: departure.to_string(),
            });
        }
        if postcodes.is_empty() {
            return Ok(JourneyResults::default());
        }

        let targets: Vec<(String, (f64, f64))> = postcodes
            .iter()
            .map(|(postcode, coord)| (postcode.clone(), *coord))
            .collect();
        let limit = if self.max_concurrent == 0 {
            targets.len()
        } else {
            self.max_concurrent
        };
        tracing::info!(
            targets = targets.len(),
            destination = %destination,
            limit,
            "dispatching journey requests"
        );

        let settled: Vec<(String, Result<JourneyResult, TflError>)> = stream::iter(targets)
            .map(|(postcode, coord)| async move {
                let outcome = self
                    .fetch_journey(&postcode, coord, destination, departure)
                    .await;
                (postcode, outcome)
            })
            .buffer_unordered(limit)
            .collect()
            .await;

        let mut results = BTreeMap::new();
        for (postcode, outcome) in settled {
            match outcome {
                Ok(journey) => {
                    tracing::info!(
                        postcode = %postcode,
                        journeys = journey.journeys.len(),
                        "journey fetched"
                    );
                    results.insert(postcode, journey);
                }
                Err(error) => {
                    tracing::warn!(
                        postcode = %postcode,
                        error = %error,
                        "journey failed; dropped from results"
                    );
                }
            }
        }
        tracing::info!(collected = results.len(), "journey dispatch complete");
        Ok(JourneyResults::new(results))
    }

    /// Plans journeys only for postcodes not yet present in an existing
    /// collection, for incremental top-ups of a journey-time table.
    ///
    /// # Errors
    ///
    /// Same as [`Self::plan_journeys`].
    pub async fn plan_missing(
        &self,
        postcodes: &BTreeMap<String, (f64, f64)>,
        collected: &HashSet<String>,
        destination: &str,
        departure: Departure,
    ) -> Result<JourneyResults, TflError> {
        let missing: BTreeMap<String, (f64, f64)> = postcodes
            .iter()
            .filter(|(postcode, _)| !collected.contains(*postcode))
            .map(|(postcode, coord)| (postcode.clone(), *coord))
            .collect();
        tracing::info!(
            new = missing.len(),
            already_collected = collected.len(),
            "planning journeys for new postcodes only"
        );
        self.plan_journeys(&missing, destination, departure).await
    }

    /// One postcode's journey: primary fetch by postcode, with a single
    /// coordinate-form fallback when the planner answers 300 (ambiguous
    /// origin).
    async fn fetch_journey(
        &self,
        postcode: &str,
        coord: (f64, f64),
        destination: &str,
        departure: Departure,
    ) -> Result<JourneyResult, TflError> {
        let url = self.journey_url(postcode, destination, departure)?;
        let (body, status) = self.fetch.get_json_with_status(&url).await?;
        match status.as_u16() {
            200 => Self::parse_journey(postcode, body),
            300 => {
                let (lat, lon) = coord;
                let from = format!("{lat},{lon}");
                tracing::debug!(
                    postcode = %postcode,
                    from = %from,
                    "ambiguous origin; retrying with coordinates"
                );
                let fallback = self.journey_url(&from, destination, departure)?;
                let (body, _status) = self.fetch.get_json_with_status(&fallback).await?;
                Self::parse_journey(postcode, body)
            }
            other => Err(TflError::UnexpectedStatus {
                postcode: postcode.to_owned(),
                status: other,
            }),
        }
    }

    fn parse_journey(postcode: &str, body: serde_json::Value) -> Result<JourneyResult, TflError> {
        serde_json::from_value(body).map_err(|e| TflError::Deserialize {
            postcode: postcode.to_owned(),
            source: e,
        })
    }
}
