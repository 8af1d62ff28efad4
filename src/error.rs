//! CLI error type.

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("missing API token; pass --token or set STUDIO_TOKEN")]
    MissingToken,
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    #[error("server returned HTTP {status}: {message}")]
    ServerError { status: u16, message: String },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid composition: {0}")]
    Composition(#[from] canvas::error::CanvasError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("saved image not found: {0}")]
    NotFound(String),
}
