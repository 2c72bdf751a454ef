//! Rightmove mobile API request and response types.
//!
//! The mobile `find` endpoints return camelCase JSON. Fields the pipeline
//! reads are typed; everything else rides along in `#[serde(flatten)]` maps
//! so persisted results keep the upstream shape verbatim.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Which market to search. Selects the endpoint path and the public listing
/// URL prefix; an invalid property type is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    Rent,
    Sale,
}

impl PropertyType {
    pub(crate) fn find_path(self) -> &'static str {
        match self {
            PropertyType::Rent => "rent/find",
            PropertyType::Sale => "sale/find",
        }
    }

    /// Prefix of the public listing page; append `{identifier}.html`.
    #[must_use]
    pub fn listing_url_prefix(self) -> &'static str {
        match self {
            PropertyType::Rent => "https://www.rightmove.co.uk/property-to-rent/property-",
            PropertyType::Sale => "https://www.rightmove.co.uk/property-for-sale/property-",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyType::Rent => write!(f, "rent"),
            PropertyType::Sale => write!(f, "sale"),
        }
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rent" => Ok(PropertyType::Rent),
            "sale" => Ok(PropertyType::Sale),
            other => Err(format!(
                "unknown property type \"{other}\" (expected \"rent\" or \"sale\")"
            )),
        }
    }
}

/// User-tunable search filters, serialized into query parameters. Unset
/// fields are omitted from the request.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub min_bedrooms: Option<u32>,
    pub max_bedrooms: Option<u32>,
    pub radius: Option<f64>,
    pub sort_type: Option<u32>,
    pub property_types: Vec<String>,
    pub must_have: Vec<String>,
    pub dont_show: Vec<String>,
    pub furnish_types: Vec<String>,
    pub keywords: Vec<String>,
}

impl SearchFilters {
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(n) = self.min_bedrooms {
            pairs.push(("minBedrooms", n.to_string()));
        }
        if let Some(n) = self.max_bedrooms {
            pairs.push(("maxBedrooms", n.to_string()));
        }
        if let Some(r) = self.radius {
            pairs.push(("radius", r.to_string()));
        }
        if let Some(s) = self.sort_type {
            pairs.push(("sortType", s.to_string()));
        }
        if !self.property_types.is_empty() {
            pairs.push(("propertyTypes", self.property_types.join(",")));
        }
        if !self.must_have.is_empty() {
            pairs.push(("mustHave", self.must_have.join(",")));
        }
        if !self.dont_show.is_empty() {
            pairs.push(("dontShow", self.dont_show.join(",")));
        }
        if !self.furnish_types.is_empty() {
            pairs.push(("furnishTypes", self.furnish_types.join(",")));
        }
        if !self.keywords.is_empty() {
            pairs.push(("keywords", self.keywords.join(",")));
        }
        pairs
    }
}

/// One page of the paginated `find` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub result: String,
    #[serde(flatten)]
    pub info: SearchInfo,
    #[serde(default)]
    pub properties: Vec<Property>,
}

/// First-page summary metadata kept alongside the accumulated properties.
///
/// `num_returned_results` accumulates the items actually received across all
/// pages, so comparing it with `total_available_results` exposes pages lost
/// to mid-pagination failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchInfo {
    #[serde(default)]
    pub create_date: Option<i64>,
    pub num_returned_results: u64,
    #[serde(default)]
    pub radius: Option<f64>,
    pub searchable_location: SearchableLocation,
    pub total_available_results: u64,
}

/// The location the API resolved the search to. For outcode searches the
/// `name` is the outcode itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchableLocation {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One property listing. Enrichment fields are absent until the cleaning /
/// estimation passes fill them in, and are skipped on write while absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub identifier: i64,
    pub property_type: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode_estimate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode_sector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode_distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journey_time: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A completed collection for one location: first-page metadata plus every
/// property received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationResult {
    pub info: SearchInfo,
    pub properties: Vec<Property>,
}
