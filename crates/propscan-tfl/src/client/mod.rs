//! HTTP client for the TfL Journey Planner API.

mod journeys;

use reqwest::Url;

use propscan_fetch::{FetchClient, FetchConfig};

use crate::error::TflError;
use crate::types::Departure;

const DEFAULT_BASE_URL: &str = "https://api.tfl.gov.uk/";

/// Client for the TfL `Journey/JourneyResults` endpoint.
///
/// Owns the shared [`FetchClient`] (and so the single rate limiter) used by
/// every concurrent per-postcode fetch in a dispatch batch. TfL allows 500
/// requests per minute; the fetch config's interval is expected to respect
/// that.
pub struct JourneyClient {
    pub(crate) fetch: FetchClient,
    base_url: Url,
    app_id: String,
    app_key: String,
    /// Ceiling on concurrently dispatched postcodes; 0 means one task per
    /// postcode, throttled only by the rate limiter.
    pub(crate) max_concurrent: usize,
}

impl JourneyClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`TflError::Fetch`] if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(
        fetch_config: &FetchConfig,
        app_id: &str,
        app_key: &str,
    ) -> Result<Self, TflError> {
        Self::with_base_url(fetch_config, app_id, app_key, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`TflError::Fetch`] if the underlying HTTP client cannot be
    /// constructed, or [`TflError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(
        fetch_config: &FetchConfig,
        app_id: &str,
        app_key: &str,
        base_url: &str,
    ) -> Result<Self, TflError> {
        let fetch = FetchClient::new(fetch_config)?;
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| TflError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            fetch,
            base_url,
            app_id: app_id.to_owned(),
            app_key: app_key.to_owned(),
            max_concurrent: 0,
        })
    }

    /// Sets the dispatch concurrency ceiling; 0 restores the unbounded
    /// default.
    #[must_use]
    pub fn with_max_concurrent(mut self, ceiling: usize) -> Self {
        self.max_concurrent = ceiling;
        self
    }

    /// Builds `Journey/JourneyResults/{from}/to/{destination}` with the
    /// departure and preference parameters. `from` may be a postcode or a
    /// raw `lat,lon` pair; either way it is percent-encoded as one path
    /// segment.
    pub(crate) fn journey_url(
        &self,
        from: &str,
        destination: &str,
        departure: Departure,
    ) -> Result<Url, TflError> {
        let mut url = self.base_url.clone();
        {
            let mut segments =
                url.path_segments_mut()
                    .map_err(|()| TflError::InvalidBaseUrl {
                        url: self.base_url.to_string(),
                        reason: "URL cannot be a base".to_owned(),
                    })?;
            segments.pop_if_empty();
            segments.extend(["Journey", "JourneyResults", from, "to", destination]);
        }
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("date", &departure.date_param());
            pairs.append_pair("time", &departure.time_param());
            pairs.append_pair("walkingSpeed", "Fast");
            pairs.append_pair("cyclePreference", "None");
            pairs.append_pair("alternativeCycle", "false");
            pairs.append_pair("alternativeWalking", "true");
            pairs.append_pair("app_id", &self.app_id);
            pairs.append_pair("app_key", &self.app_key);
        }
        Ok(url)
    }
}
