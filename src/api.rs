//! REST client for the catalog and saved-composition endpoints.
//!
//! DESIGN
//! ======
//! One `reqwest::Client` per process, built with the configured timeout.
//! Catalog reads are anonymous; saved-image endpoints send the bearer token.
//! Non-success responses surface the server's body text in
//! [`CliError::ServerError`].

use std::time::Duration;

use canvas::catalog::{ApiImageResolver, Catalog};
use canvas::doc::{PlacedItemData, SavedImage};
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::multipart::{Form, Part};

use crate::config::StudioConfig;
use crate::error::CliError;

/// File name the rendered composition is uploaded under.
pub const UPLOAD_FILE_NAME: &str = "canvas.png";

pub struct StudioClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl StudioClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &StudioConfig) -> Result<Self, CliError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { base_url: config.api_url.clone(), token: config.token.clone(), http })
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Image resolver for the same backend.
    #[must_use]
    pub fn resolver(&self) -> ApiImageResolver {
        ApiImageResolver::new(&self.base_url)
    }

    /// `GET /items`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or a malformed body.
    pub async fn catalog(&self) -> Result<Catalog, CliError> {
        let url = self.url("/items");
        tracing::debug!(%url, "fetching catalog");
        let response = checked(self.http.get(&url).send().await?).await?;
        let body = response.text().await?;
        Ok(Catalog::from_json(&body)?)
    }

    /// `GET /saved-images` for the token's account.
    ///
    /// # Errors
    ///
    /// Returns an error without a token, on transport failure, or on a non-success status.
    pub async fn saved_images(&self) -> Result<Vec<SavedImage>, CliError> {
        let url = self.url("/saved-images");
        tracing::debug!(%url, "listing saved images");
        let response = self.http.get(&url).header(AUTHORIZATION, self.bearer()?).send().await?;
        Ok(checked(response).await?.json::<Vec<SavedImage>>().await?)
    }

    /// One saved image by id, looked up in the account's listing.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::NotFound`] when no saved image has this id.
    pub async fn saved_image(&self, id: &str) -> Result<SavedImage, CliError> {
        self.saved_images()
            .await?
            .into_iter()
            .find(|image| image.id == id)
            .ok_or_else(|| CliError::NotFound(id.to_string()))
    }

    /// `DELETE /saved-images/:id`.
    ///
    /// # Errors
    ///
    /// Returns an error without a token, on transport failure, or on a non-success status.
    pub async fn delete_saved_image(&self, id: &str) -> Result<(), CliError> {
        let url = self.url(&format!("/saved-images/{id}"));
        let response = self.http.delete(&url).header(AUTHORIZATION, self.bearer()?).send().await?;
        checked(response).await?;
        tracing::info!(%id, "saved image deleted");
        Ok(())
    }

    /// `POST /saved-images` with the rendered PNG and the composition that produced it.
    ///
    /// # Errors
    ///
    /// Returns an error without a token, on transport failure, or on a non-success status.
    pub async fn save_canvas_image(
        &self,
        name: &str,
        png: Vec<u8>,
        placed_items: &[PlacedItemData],
    ) -> Result<SavedImage, CliError> {
        let image = Part::bytes(png).file_name(UPLOAD_FILE_NAME).mime_str("image/png")?;
        let mut form = Form::new().part("image", image).text("name", name.to_string());
        if let Some(json) = placed_items_field(placed_items)? {
            form = form.text("placedItems", json);
        }

        let url = self.url("/saved-images");
        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, self.bearer()?)
            .multipart(form)
            .send()
            .await?;
        let saved = checked(response).await?.json::<SavedImage>().await?;
        tracing::info!(id = %saved.id, overlays = placed_items.len(), "saved image uploaded");
        Ok(saved)
    }

    fn bearer(&self) -> Result<HeaderValue, CliError> {
        let token = self.token.as_deref().ok_or(CliError::MissingToken)?;
        Ok(HeaderValue::from_str(&format!("Bearer {token}"))?)
    }
}

/// The `placedItems` form field; omitted for an empty composition.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn placed_items_field(placed_items: &[PlacedItemData]) -> Result<Option<String>, CliError> {
    if placed_items.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::to_string(placed_items)?))
}

/// Error for a non-success response carrying `body`.
#[must_use]
pub fn server_error(status: u16, body: &str) -> CliError {
    let body = body.trim();
    let message = if body.is_empty() { "API error" } else { body };
    CliError::ServerError { status, message: message.to_string() }
}

async fn checked(response: reqwest::Response) -> Result<reqwest::Response, CliError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), "request failed");
    Err(server_error(status.as_u16(), &body))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
