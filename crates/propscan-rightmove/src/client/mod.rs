//! HTTP client for the Rightmove mobile search API.

mod search;

use std::collections::HashMap;

use reqwest::Url;

use propscan_fetch::{FetchClient, FetchConfig};

use crate::error::RightmoveError;
use crate::types::PropertyType;

const DEFAULT_BASE_URL: &str = "https://api.rightmove.co.uk/api/";
const API_APPLICATION: &str = "ANDROID";

/// Items requested per page (`numberOfPropertiesRequested`). The API caps
/// this at 50 for the mobile application profile.
pub const PAGE_SIZE: u64 = 50;

/// Client for the Rightmove mobile search API.
///
/// Owns the shared [`FetchClient`] (and so the single rate limiter) used by
/// every concurrent per-location collection in a dispatch batch.
pub struct RightmoveClient {
    pub(crate) fetch: FetchClient,
    base_url: Url,
    /// Outcode → Rightmove numeric location code, supplied externally.
    outcode_codes: HashMap<String, u64>,
    /// Ceiling on concurrently dispatched locations; 0 means one task per
    /// location, throttled only by the rate limiter.
    pub(crate) max_concurrent: usize,
}

/// One resolved dispatch target.
pub(crate) struct Location {
    pub outcode: String,
    pub identifier: String,
}

impl RightmoveClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`RightmoveError::Fetch`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(
        fetch_config: &FetchConfig,
        outcode_codes: HashMap<String, u64>,
    ) -> Result<Self, RightmoveError> {
        Self::with_base_url(fetch_config, outcode_codes, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`RightmoveError::Fetch`] if the underlying HTTP client cannot
    /// be constructed, or [`RightmoveError::InvalidBaseUrl`] if `base_url`
    /// does not parse.
    pub fn with_base_url(
        fetch_config: &FetchConfig,
        outcode_codes: HashMap<String, u64>,
        base_url: &str,
    ) -> Result<Self, RightmoveError> {
        let fetch = FetchClient::new(fetch_config)?;
        // Normalise to exactly one trailing slash so join() appends the find
        // path instead of replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalised).map_err(|e| RightmoveError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            fetch,
            base_url,
            outcode_codes,
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

    /// Resolves outcodes to Rightmove location identifiers
    /// (`OUTCODE^<code>`). Outcodes without a known code are logged and
    /// skipped.
    pub(crate) fn locations(&self, outcodes: &[String]) -> Vec<Location> {
        outcodes
            .iter()
            .filter_map(|outcode| match self.outcode_codes.get(outcode) {
                Some(code) => Some(Location {
                    outcode: outcode.clone(),
                    identifier: format!("OUTCODE^{code}"),
                }),
                None => {
                    tracing::warn!(outcode = %outcode, "no location code for outcode; skipping");
                    None
                }
            })
            .collect()
    }

    pub(crate) fn search_url(&self, prop_type: PropertyType) -> Result<Url, RightmoveError> {
        self.base_url
            .join(prop_type.find_path())
            .map_err(|e| RightmoveError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(codes: &[(&str, u64)]) -> RightmoveClient {
        let codes = codes
            .iter()
            .map(|(o, c)| ((*o).to_owned(), *c))
            .collect::<HashMap<_, _>>();
        RightmoveClient::new(&FetchConfig::default(), codes)
            .expect("client construction should not fail")
    }

    #[test]
    fn search_url_selects_the_market_path() {
        let client = test_client(&[]);
        assert_eq!(
            client.search_url(PropertyType::Rent).unwrap().as_str(),
            "https://api.rightmove.co.uk/api/rent/find"
        );
        assert_eq!(
            client.search_url(PropertyType::Sale).unwrap().as_str(),
            "https://api.rightmove.co.uk/api/sale/find"
        );
    }

    #[test]
    fn locations_resolve_known_outcodes_and_skip_unknown() {
        let client = test_client(&[("SW10", 2_260), ("N1", 1_666)]);
        let locations = client.locations(&[
            "SW10".to_owned(),
            "ZZ99".to_owned(),
            "N1".to_owned(),
        ]);
        let identifiers: Vec<&str> = locations.iter().map(|l| l.identifier.as_str()).collect();
        assert_eq!(identifiers, vec!["OUTCODE^2260", "OUTCODE^1666"]);
    }
}
