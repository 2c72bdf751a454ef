pub mod client;
pub mod error;
pub mod export;
pub mod results;
pub mod types;

pub use client::JourneyClient;
pub use error::TflError;
pub use export::{write_rows_json, JourneyRow, LegSummary, PostcodeRow};
pub use results::JourneyResults;
pub use types::{Departure, Journey, JourneyResult, JourneyVector, Leg, Mode, SearchCriteria};
