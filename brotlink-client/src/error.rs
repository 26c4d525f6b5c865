use std::time::Duration;

use thiserror::Error;

/// Everything that can go wrong between sending a request and holding a
/// decoded response.
///
/// None of these are fatal: the dispatcher turns them into the `"Error"`
/// metrics label and the page stays interactive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("failed to build HTTP client: {0}")]
    HttpClientBuild(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response body: {0}")]
    Malformed(String),

    #[error("no response within {0:?}")]
    Timeout(Duration),
}
