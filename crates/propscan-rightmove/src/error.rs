use thiserror::Error;

/// Errors returned by the Rightmove search client.
#[derive(Debug, Error)]
pub enum RightmoveError {
    /// Terminal failure from the shared fetch layer, retries already spent.
    #[error("fetch error: {0}")]
    Fetch(#[from] propscan_fetch::FetchError),

    /// The API answered but flagged the search itself as failed.
    #[error("search for {location} returned result \"{result}\"")]
    SearchFailed { location: String, result: String },

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },

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
