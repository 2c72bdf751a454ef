//! Concurrent multi-location dispatch and per-location pagination.

use std::collections::BTreeMap;

use futures::stream::{self, StreamExt};
use reqwest::Url;

use crate::client::{Location, RightmoveClient, API_APPLICATION, PAGE_SIZE};
use crate::error::RightmoveError;
use crate::results::SearchResults;
use crate::types::{LocationResult, PropertyType, SearchFilters, SearchPage};

impl RightmoveClient {
    /// Searches every resolvable outcode concurrently and merges the settled
    /// results.
    ///
    /// One collection task per location, all sharing this client's rate
    /// limiter, so the aggregate request rate honours the configured
    /// interval regardless of fan-out. A location whose first page never
    /// succeeds is logged and omitted; it never aborts its siblings. The
    /// returned map is keyed by the API-reported location name.
    ///
    /// # Errors
    ///
    /// Returns [`RightmoveError::InvalidBaseUrl`] if the search URL cannot
    /// be built. Per-location failures are not errors at this level.
    pub async fn search(
        &self,
        prop_type: PropertyType,
        filters: &SearchFilters,
        outcodes: &[String],
    ) -> Result<SearchResults, RightmoveError> {
        let url = self.search_url(prop_type)?;
        let locations = self.locations(outcodes);
        if locations.is_empty() {
            tracing::warn!("no resolvable locations in the requested outcodes");
            return Ok(SearchResults::default());
        }

        let limit = if self.max_concurrent == 0 {
            locations.len()
        } else {
            self.max_concurrent
        };
        tracing::info!(
            targets = locations.len(),
            prop_type = %prop_type,
            limit,
            "dispatching property search"
        );

        let url = &url;
        let settled: Vec<(Location, Result<LocationResult, RightmoveError>)> =
            stream::iter(locations)
                .map(|location| async move {
                    let outcome = self.collect_location(url, filters, &location).await;
                    (location, outcome)
                })
                .buffer_unordered(limit)
                .collect()
                .await;

        let mut results = BTreeMap::new();
        for (location, outcome) in settled {
            match outcome {
                Ok(collected) => {
                    tracing::info!(
                        location = %collected.info.searchable_location.name,
                        received = collected.properties.len(),
                        expected = collected.info.total_available_results,
                        "location collected"
                    );
                    results.insert(collected.info.searchable_location.name.clone(), collected);
                }
                Err(error) => {
                    tracing::error!(
                        outcode = %location.outcode,
                        error = %error,
                        "location failed; dropped from results"
                    );
                }
            }
        }
        Ok(SearchResults::new(results))
    }

    /// Collects all pages for one location.
    ///
    /// The first page must succeed (it carries the total and the resolved
    /// location name); later pages that fail are logged and skipped, so the
    /// accumulated count may undershoot the reported total.
    async fn collect_location(
        &self,
        url: &Url,
        filters: &SearchFilters,
        location: &Location,
    ) -> Result<LocationResult, RightmoveError> {
        let first = self.fetch_page(url, filters, &location.identifier, 0).await?;
        let mut info = first.info;
        let mut properties = first.properties;
        info.num_returned_results = properties.len() as u64;

        let total = info.total_available_results;
        let remaining_pages = if total == 0 {
            0
        } else {
            total.div_ceil(PAGE_SIZE) - 1
        };

        for page in 1..=remaining_pages {
            let index = page * PAGE_SIZE;
            match self.fetch_page(url, filters, &location.identifier, index).await {
                Ok(fetched) => {
                    info.num_returned_results += fetched.properties.len() as u64;
                    properties.extend(fetched.properties);
                }
                Err(error) => {
                    tracing::warn!(
                        location = %location.identifier,
                        index,
                        error = %error,
                        "page failed — items omitted"
                    );
                }
            }
        }

        Ok(LocationResult { info, properties })
    }

    /// Fetches one page at the given item index through the shared retrying
    /// fetch layer, and checks the API-level result flag.
    async fn fetch_page(
        &self,
        url: &Url,
        filters: &SearchFilters,
        location_identifier: &str,
        index: u64,
    ) -> Result<SearchPage, RightmoveError> {
        let mut url = url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in filters.query_pairs() {
                pairs.append_pair(key, &value);
            }
            pairs.append_pair("apiApplication", API_APPLICATION);
            pairs.append_pair("numberOfPropertiesRequested", &PAGE_SIZE.to_string());
            pairs.append_pair("locationIdentifier", location_identifier);
            pairs.append_pair("index", &index.to_string());
        }

        let page: SearchPage = self.fetch.get_json(&url).await?;
        if page.result != "SUCCESS" {
            return Err(RightmoveError::SearchFailed {
                location: location_identifier.to_owned(),
                result: page.result,
            });
        }
        Ok(page)
    }
}
