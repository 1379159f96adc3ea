use std::time::Duration;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("invalid url {url}: {source}")]
    Url {
        url: String,
        source: url::ParseError,
    },
    #[error("building request: {0}")]
    Request(#[from] http::Error),
    #[error("content type {0} does not support structured payloads")]
    UnsupportedPayload(String),
    #[error("encoding JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reading body: {0}")]
    Io(#[from] std::io::Error),
    #[error("transport: {0}")]
    Transport(#[source] BoxError),
    #[error("reading response body: {0}")]
    Body(#[source] BoxError),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("stopped after {0} redirects")]
    TooManyRedirects(usize),
}
