//! Error type for the few fallible entry points of the canvas crate.
//!
//! Interaction input never fails: bad gestures degrade to no-ops. Errors only
//! arise when parsing payloads handed in by the host or when the browser
//! rejects a 2D context call.

#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("canvas 2d context unavailable")]
    NoContext,
    #[error("paint failed: {0}")]
    Paint(String),
}
