// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Blocking HTTP client for the overlay service.
//!
//! The service exposes a small REST-like resource: list/create/update/
//! delete overlays plus an image upload endpoint that returns a URL
//! servable back to the client.

use crate::models::overlay::{Overlay, OverlayDraft};
use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

/// Response body of the upload endpoint.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

/// Blocking client bound to one overlay service instance.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the service at `base_url` (no trailing slash).
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch all overlays.
    pub fn list_overlays(&self) -> Result<Vec<Overlay>> {
        let overlays = self
            .http
            .get(overlays_url(&self.base_url))
            .send()?
            .error_for_status()?
            .json()?;
        Ok(overlays)
    }

    /// Create an overlay from a form draft. Returns the stored overlay
    /// with its server-assigned id.
    pub fn create_overlay(&self, draft: &OverlayDraft) -> Result<Overlay> {
        let overlay = self
            .http
            .post(overlays_url(&self.base_url))
            .json(draft)
            .send()?
            .error_for_status()?
            .json()?;
        Ok(overlay)
    }

    /// Replace the stored fields of an overlay with the draft.
    pub fn update_overlay(&self, id: &str, draft: &OverlayDraft) -> Result<()> {
        self.http
            .put(overlay_url(&self.base_url, id))
            .json(draft)
            .send()?
            .error_for_status()?;
        Ok(())
    }

    /// Delete an overlay.
    pub fn delete_overlay(&self, id: &str) -> Result<()> {
        self.http
            .delete(overlay_url(&self.base_url, id))
            .send()?
            .error_for_status()?;
        Ok(())
    }

    /// Upload an image file; returns the URL the service will serve it from.
    pub fn upload_image(&self, path: &Path) -> Result<String> {
        let form = reqwest::blocking::multipart::Form::new().file("file", path)?;
        let response: UploadResponse = self
            .http
            .post(upload_url(&self.base_url))
            .multipart(form)
            .send()?
            .error_for_status()?
            .json()?;
        Ok(response.url)
    }

    /// Fetch raw image bytes (used to render image overlays).
    pub fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self
            .http
            .get(url)
            .send()?
            .error_for_status()?
            .bytes()?;
        Ok(bytes.to_vec())
    }
}

fn overlays_url(base: &str) -> String {
    format!("{base}/api/overlays")
}

fn overlay_url(base: &str, id: &str) -> String {
    format!("{base}/api/overlays/{id}")
}

fn upload_url(base: &str) -> String {
    format!("{base}/api/upload")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_urls() {
        let base = "http://127.0.0.1:5000";
        assert_eq!(overlays_url(base), "http://127.0.0.1:5000/api/overlays");
        assert_eq!(
            overlay_url(base, "64f1c3a2e8b1"),
            "http://127.0.0.1:5000/api/overlays/64f1c3a2e8b1"
        );
        assert_eq!(upload_url(base), "http://127.0.0.1:5000/api/upload");
    }

    #[test]
    fn test_base_url_trailing_slash_is_stripped() {
        let client = ApiClient::new("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(overlays_url(client.base_url()), "http://localhost:5000/api/overlays");
    }
}
