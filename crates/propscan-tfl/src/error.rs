use thiserror::Error;

/// Errors returned by the TfL journey planner client.
#[derive(Debug, Error)]
pub enum TflError {
    /// Terminal failure from the shared fetch layer, retries already spent.
    #[error("fetch error: {0}")]
    Fetch(#[from] propscan_fetch::FetchError),

    /// The requested departure does not form a valid calendar date/time.
    #[error("invalid departure date: {year:04}-{month:02}-{day:02} {hour:02}:00")]
    InvalidDeparture {
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
    },

    /// Journeys cannot be planned backwards in time. Checked before any
    /// request is issued.
    #[error("requested departure {requested} is in the past")]
    DepartureInPast { requested: String },

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The journey planner answered but the body is missing expected fields
    /// (`journeys` and friends).
    #[error("journey response for {postcode} is missing expected fields: {source}")]
    Deserialize {
        postcode: String,
        #[source]
        source: serde_json::Error,
    },

    /// A status that is neither success nor the recognised 300
    /// disambiguation signal.
    #[error("unexpected HTTP status {status} for {postcode}")]
    UnexpectedStatus { postcode: String, status: u16 },

    #[error("i/o error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error for {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
