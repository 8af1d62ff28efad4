//! CLI configuration parsed from environment variables.

use canvas::engine::EngineConfig;
use canvas::geometry::Size;

use crate::error::CliError;

pub const DEFAULT_API_URL: &str = "http://localhost:4050";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HISTORY_DEPTH: usize = canvas::consts::DEFAULT_HISTORY_DEPTH;
pub const DEFAULT_STAGE_WIDTH: f64 = 800.0;
pub const DEFAULT_STAGE_HEIGHT: f64 = 600.0;

#[derive(Debug, Clone, PartialEq)]
pub struct StudioConfig {
    /// Backend base URL, without a trailing slash.
    pub api_url: String,
    /// Bearer token for account endpoints.
    pub token: Option<String>,
    pub request_timeout_secs: u64,
    pub history_depth: usize,
    /// Stage size used when replaying a saved composition.
    pub stage: Size,
}

impl StudioConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `STUDIO_API_URL`: default `http://localhost:4050`
    /// - `STUDIO_TOKEN`: bearer token, required by account endpoints
    /// - `STUDIO_REQUEST_TIMEOUT_SECS`: default 30
    /// - `STUDIO_HISTORY_DEPTH`: default 50
    /// - `STUDIO_STAGE_WIDTH` / `STUDIO_STAGE_HEIGHT`: default 800×600
    ///
    /// # Errors
    ///
    /// Returns an error if the API URL is not http(s).
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`], reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API URL is not http(s).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CliError> {
        let api_url = normalize_api_url(lookup("STUDIO_API_URL").as_deref().unwrap_or(DEFAULT_API_URL))?;
        let token = lookup("STUDIO_TOKEN").filter(|t| !t.trim().is_empty());
        let request_timeout_secs =
            parse_or(lookup("STUDIO_REQUEST_TIMEOUT_SECS"), DEFAULT_REQUEST_TIMEOUT_SECS).max(1);
        let history_depth = parse_or(lookup("STUDIO_HISTORY_DEPTH"), DEFAULT_HISTORY_DEPTH).max(1);
        let stage = Size::new(
            parse_dimension(lookup("STUDIO_STAGE_WIDTH"), DEFAULT_STAGE_WIDTH),
            parse_dimension(lookup("STUDIO_STAGE_HEIGHT"), DEFAULT_STAGE_HEIGHT),
        );

        Ok(Self { api_url, token, request_timeout_secs, history_depth, stage })
    }

    /// Apply command-line overrides on top of the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the overriding API URL is not http(s).
    pub fn with_overrides(mut self, api_url: Option<&str>, token: Option<&str>) -> Result<Self, CliError> {
        if let Some(url) = api_url {
            self.api_url = normalize_api_url(url)?;
        }
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.token = Some(token.to_string());
        }
        Ok(self)
    }

    #[must_use]
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig { history_depth: self.history_depth }
    }

    /// The bearer token, or an error naming how to provide one.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::MissingToken`] when no token is configured.
    pub fn require_token(&self) -> Result<&str, CliError> {
        self.token.as_deref().ok_or(CliError::MissingToken)
    }
}

fn normalize_api_url(raw: &str) -> Result<String, CliError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Err(CliError::InvalidBaseUrl(raw.to_string()))
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse::<T>().ok()).unwrap_or(default)
}

fn parse_dimension(raw: Option<String>, default: f64) -> f64 {
    let value = parse_or(raw, default);
    if value.is_finite() && value > 0.0 { value } else { default }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
