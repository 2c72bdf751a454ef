use thiserror::Error;

/// Errors returned by the shared fetch layer.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network or TLS failure from the underlying HTTP client, including the
    /// per-request timeout.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a status outside the 2xx range.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected shape.
    /// Covers both invalid JSON and a valid body missing an expected field.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A request URL could not be constructed. This is a caller bug, never a
    /// transient upstream condition.
    #[error("invalid request URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl FetchError {
    /// Returns `true` if another attempt through the rate limiter may succeed.
    ///
    /// Transport failures, unexpected statuses, and malformed bodies are all
    /// retried under the same budget — the upstream APIs are known to return
    /// transient garbage under load. Only [`FetchError::InvalidUrl`] is
    /// excluded: a bad URL fails the same way every time.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        !matches!(self, FetchError::InvalidUrl { .. })
    }
}
