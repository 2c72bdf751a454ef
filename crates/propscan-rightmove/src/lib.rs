pub mod client;
pub mod enrich;
pub mod error;
pub mod results;
pub mod types;

pub use client::{RightmoveClient, PAGE_SIZE};
pub use enrich::DEFAULT_EXCLUDED_TYPES;
pub use error::RightmoveError;
pub use results::SearchResults;
pub use types::{
    LocationResult, Property, PropertyType, SearchFilters, SearchInfo, SearchableLocation,
};
