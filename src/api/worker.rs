// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Background request dispatch for the overlay service.
//!
//! Every request runs on its own spawned thread and reports back to the
//! UI thread over a channel polled from the egui update loop. Requests
//! are unordered with respect to each other; failures are logged and
//! reported as events, never retried.

use crate::api::client::ApiClient;
use crate::models::overlay::{Overlay, OverlayDraft};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

/// Decoded RGBA image fetched for an image overlay.
pub struct FetchedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Result of a completed background request.
pub enum ApiEvent {
    /// Full overlay list from the service.
    Overlays(Vec<Overlay>),
    /// An overlay was created.
    Created(Overlay),
    /// An overlay was updated.
    Updated { id: String },
    /// An overlay was deleted.
    Deleted { id: String },
    /// An image file was uploaded; the draft should point at this URL.
    Uploaded { url: String },
    /// Image bytes for an image overlay were fetched and decoded.
    Image { url: String, image: FetchedImage },
    /// Fetching or decoding an overlay image failed.
    ImageFailed { url: String, message: String },
    /// Any other request failed.
    Failed { action: &'static str, message: String },
}

/// Handle owned by the application; spawns request threads and receives
/// their results.
pub struct ApiWorker {
    client: ApiClient,
    event_tx: Sender<ApiEvent>,
    event_rx: Receiver<ApiEvent>,
    egui_ctx: egui::Context,
}

impl ApiWorker {
    pub fn new(base_url: &str, egui_ctx: egui::Context) -> Self {
        let client = ApiClient::new(base_url);
        log::info!("Using overlay service at {}", client.base_url());

        let (event_tx, event_rx) = channel();
        Self {
            client,
            event_tx,
            event_rx,
            egui_ctx,
        }
    }

    /// Next completed result, if any. Polled once per frame.
    pub fn try_recv(&self) -> Option<ApiEvent> {
        match self.event_rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    pub fn fetch_overlays(&self) {
        self.spawn("list overlays", |client| {
            client.list_overlays().map(ApiEvent::Overlays)
        });
    }

    pub fn create_overlay(&self, draft: OverlayDraft) {
        self.spawn("create overlay", move |client| {
            client.create_overlay(&draft).map(ApiEvent::Created)
        });
    }

    pub fn update_overlay(&self, id: String, draft: OverlayDraft) {
        self.spawn("update overlay", move |client| {
            client.update_overlay(&id, &draft)?;
            Ok(ApiEvent::Updated { id })
        });
    }

    pub fn delete_overlay(&self, id: String) {
        self.spawn("delete overlay", move |client| {
            client.delete_overlay(&id)?;
            Ok(ApiEvent::Deleted { id })
        });
    }

    pub fn upload_image(&self, path: PathBuf) {
        self.spawn("upload image", move |client| {
            let url = client.upload_image(&path)?;
            Ok(ApiEvent::Uploaded { url })
        });
    }

    /// Fetch and decode the image behind an image overlay's URL.
    pub fn fetch_image(&self, url: String) {
        let client = self.client.clone();
        let event_tx = self.event_tx.clone();
        let egui_ctx = self.egui_ctx.clone();

        std::thread::spawn(move || {
            let result = (|| -> anyhow::Result<FetchedImage> {
                let bytes = client.fetch_image(&url)?;
                let decoded = image::load_from_memory(&bytes)?.to_rgba8();
                let (width, height) = decoded.dimensions();
                Ok(FetchedImage {
                    width,
                    height,
                    pixels: decoded.into_raw(),
                })
            })();

            let event = match result {
                Ok(image) => ApiEvent::Image { url, image },
                Err(e) => ApiEvent::ImageFailed {
                    url,
                    message: format!("{e:#}"),
                },
            };
            let _ = event_tx.send(event);
            egui_ctx.request_repaint();
        });
    }

    fn spawn<F>(&self, action: &'static str, request: F)
    where
        F: FnOnce(&ApiClient) -> anyhow::Result<ApiEvent> + Send + 'static,
    {
        let client = self.client.clone();
        let event_tx = self.event_tx.clone();
        let egui_ctx = self.egui_ctx.clone();

        std::thread::spawn(move || {
            let event = match request(&client) {
                Ok(event) => event,
                Err(e) => ApiEvent::Failed {
                    action,
                    message: format!("{e:#}"),
                },
            };
            let _ = event_tx.send(event);
            // Wake the UI so the result is picked up promptly
            egui_ctx.request_repaint();
        });
    }
}
