use thiserror::Error;

/// Top-level error type for the `tellive-api` crate.
///
/// Transport-level failures (connect, timeout, HTTP status) never surface
/// here from `Client::request` / `Client::execute` — they are logged and
/// reduced to an absent result. The variants below are the conditions a
/// caller can actually observe.
#[derive(Debug, Error)]
pub enum Error {
    /// A view's backing id is missing from the current cache, either because
    /// `refresh` has not run yet or because the last refresh dropped it.
    #[error("{kind} {id} is not in the cache")]
    NotFound { kind: &'static str, id: String },

    /// A well-formed response carrying an explicit `error` payload.
    #[error("Telldus Live API error: {message}")]
    RemoteApi { message: String },

    /// A list request did not complete (network, timeout, or HTTP failure).
    /// Raised by `refresh` so a partial fetch can never replace a good cache.
    #[error("request to {path} did not complete")]
    Incomplete { path: String },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// URL parsing error.
    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Failed to construct the underlying HTTP client.
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Returns `true` if this is a "not found" error for a stale handle.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
