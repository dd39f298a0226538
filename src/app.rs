// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait, coordinating the stream player, the overlay
//! service worker, and the UI panels. All background work reports back
//! over channels drained at the top of each frame.

use crate::api::worker::{ApiEvent, ApiWorker};
use crate::cli::Args;
use crate::models::overlay::{Overlay, OverlayDraft, OverlayKind};
use crate::player::stream::{PlayerEvent, StreamPlayer};
use crate::ui::{canvas, controls, overlay_list, stream_bar};
use std::collections::HashMap;

/// Preview sizes matching the classic player widths (16:9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PreviewSize {
    Small,
    Medium,
    Large,
}

impl PreviewSize {
    pub fn width(self) -> f32 {
        match self {
            PreviewSize::Small => 480.0,
            PreviewSize::Medium => 720.0,
            PreviewSize::Large => 1080.0,
        }
    }

    pub fn height(self) -> f32 {
        self.width() * 9.0 / 16.0
    }

    pub fn label(self) -> &'static str {
        match self {
            PreviewSize::Small => "Small",
            PreviewSize::Medium => "Medium",
            PreviewSize::Large => "Large",
        }
    }
}

/// Playback status shown in the canvas status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerStatus {
    Idle,
    Connecting,
    Live,
    Ended,
}

/// Display state of an image overlay's fetched texture, keyed by URL.
pub enum OverlayImage {
    Loading,
    Ready(egui::TextureHandle),
    Failed,
}

/// Main application state.
pub struct LotsApp {
    /// Background worker for the overlay service
    api: ApiWorker,

    /// Client-side mirror of the stored overlay list
    overlays: Vec<Overlay>,

    /// Overlay form draft
    draft: OverlayDraft,

    /// Id of the overlay loaded into the form, if editing
    editing_id: Option<String>,

    /// An image upload is running
    upload_in_flight: bool,

    /// Fetched textures for image overlays, keyed by content URL
    overlay_images: HashMap<String, OverlayImage>,

    /// Contents of the stream URL field
    stream_url_input: String,

    /// Running stream player, if any
    player: Option<StreamPlayer>,

    player_status: PlayerStatus,

    /// Latest decoded video frame as a texture
    video_texture: Option<egui::TextureHandle>,

    /// Native size of the incoming video frames
    frame_size: Option<(u32, u32)>,

    /// Timestamp of the first frame since (re)connecting
    first_pts: Option<f64>,

    /// Seconds of stream shown since connecting
    stream_clock_secs: Option<f64>,

    preview_size: PreviewSize,
}

impl LotsApp {
    /// Create the application and start mirroring the overlay service.
    pub fn new(cc: &eframe::CreationContext<'_>, args: &Args) -> Self {
        let api = ApiWorker::new(&args.api_base, cc.egui_ctx.clone());
        api.fetch_overlays();

        let mut app = Self {
            api,
            overlays: Vec::new(),
            draft: OverlayDraft::default(),
            editing_id: None,
            upload_in_flight: false,
            overlay_images: HashMap::new(),
            stream_url_input: args.stream_url.clone().unwrap_or_default(),
            player: None,
            player_status: PlayerStatus::Idle,
            video_texture: None,
            frame_size: None,
            first_pts: None,
            stream_clock_secs: None,
            preview_size: args.size,
        };

        if !app.stream_url_input.is_empty() {
            app.apply_stream();
        }

        app
    }

    /// Reset the form to its defaults and leave edit mode.
    fn reset_draft(&mut self) {
        self.draft = OverlayDraft::default();
        self.editing_id = None;
    }

    /// Connect to the URL in the stream field.
    ///
    /// The previous decoder is fully released (stopped and joined)
    /// before a new one attaches to the preview.
    fn apply_stream(&mut self) {
        let url = self.stream_url_input.trim().to_string();

        self.player = None;
        self.video_texture = None;
        self.frame_size = None;
        self.first_pts = None;
        self.stream_clock_secs = None;

        if url.is_empty() {
            self.player_status = PlayerStatus::Idle;
            return;
        }

        log::info!("Connecting to stream: {}", url);
        self.player = Some(StreamPlayer::connect(&url));
        self.player_status = PlayerStatus::Connecting;
    }

    /// Stop playback and release the player.
    fn stop_stream(&mut self) {
        if let Some(player) = &self.player {
            log::info!("Stopping stream {}", player.url());
        }
        self.player = None;
        self.player_status = PlayerStatus::Idle;
        self.video_texture = None;
        self.frame_size = None;
        self.first_pts = None;
        self.stream_clock_secs = None;
    }

    /// Queue texture fetches for image overlays not seen before.
    fn request_overlay_images(&mut self) {
        for overlay in &self.overlays {
            if overlay.kind == OverlayKind::Image
                && !overlay.content.is_empty()
                && !self.overlay_images.contains_key(&overlay.content)
            {
                self.overlay_images
                    .insert(overlay.content.clone(), OverlayImage::Loading);
                self.api.fetch_image(overlay.content.clone());
            }
        }
    }

    fn handle_api_event(&mut self, event: ApiEvent, ctx: &egui::Context) {
        match event {
            ApiEvent::Overlays(overlays) => {
                log::info!("Fetched {} overlays", overlays.len());
                self.overlays = overlays;
                self.request_overlay_images();
            }
            ApiEvent::Created(overlay) => {
                log::info!("Created overlay {}", overlay.id);
                self.reset_draft();
                self.api.fetch_overlays();
            }
            ApiEvent::Updated { id } => {
                log::info!("Updated overlay {}", id);
                self.reset_draft();
                self.api.fetch_overlays();
            }
            ApiEvent::Deleted { id } => {
                log::info!("Deleted overlay {}", id);
                if self.editing_id.as_deref() == Some(id.as_str()) {
                    self.reset_draft();
                }
                self.api.fetch_overlays();
            }
            ApiEvent::Uploaded { url } => {
                log::info!("Uploaded image: {}", url);
                self.upload_in_flight = false;
                self.draft.kind = OverlayKind::Image;
                self.draft.content = url;
            }
            ApiEvent::Image { url, image } => {
                let color_image = egui::ColorImage::from_rgba_unmultiplied(
                    [image.width as usize, image.height as usize],
                    &image.pixels,
                );
                let texture = ctx.load_texture(
                    format!("overlay:{url}"),
                    color_image,
                    egui::TextureOptions::LINEAR,
                );
                self.overlay_images.insert(url, OverlayImage::Ready(texture));
            }
            ApiEvent::ImageFailed { url, message } => {
                log::error!("Fetching overlay image {} failed: {}", url, message);
                self.overlay_images.insert(url, OverlayImage::Failed);
            }
            ApiEvent::Failed { action, message } => {
                log::error!("Request to {} failed: {}", action, message);
                if action == "upload image" {
                    self.upload_in_flight = false;
                }
            }
        }
    }

    fn handle_player_event(&mut self, event: PlayerEvent, ctx: &egui::Context) {
        match event {
            PlayerEvent::Connected { width, height } => {
                log::info!("Stream connected: {}x{}", width, height);
                self.frame_size = Some((width, height));
                self.player_status = PlayerStatus::Live;
            }
            PlayerEvent::Frame(frame) => {
                let first = *self.first_pts.get_or_insert(frame.pts_secs);
                self.stream_clock_secs = Some((frame.pts_secs - first).max(0.0));

                let image = egui::ColorImage::from_rgba_unmultiplied(
                    [frame.width as usize, frame.height as usize],
                    &frame.rgba,
                );
                match &mut self.video_texture {
                    Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
                    None => {
                        self.video_texture = Some(ctx.load_texture(
                            "video_frame",
                            image,
                            egui::TextureOptions::LINEAR,
                        ));
                    }
                }
            }
            PlayerEvent::Ended => {
                log::info!("Stream ended");
                self.player = None;
                self.player_status = PlayerStatus::Ended;
            }
            PlayerEvent::Error(message) => {
                log::error!("Stream playback failed: {}", message);
                self.player = None;
                self.player_status = PlayerStatus::Idle;
                self.video_texture = None;
                self.frame_size = None;
                self.first_pts = None;
                self.stream_clock_secs = None;
            }
        }
    }

    /// Pick an image with the native file dialog and upload it.
    fn pick_and_upload_image(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "gif", "bmp", "webp"])
            .pick_file()
        {
            log::info!("Uploading {}", path.display());
            self.upload_in_flight = true;
            self.api.upload_image(path);
        }
    }

    fn overlay_mut(&mut self, id: &str) -> Option<&mut Overlay> {
        self.overlays.iter_mut().find(|o| o.id == id)
    }
}

impl eframe::App for LotsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Background work completed since the last frame
        while let Some(event) = self.api.try_recv() {
            self.handle_api_event(event, ctx);
        }
        loop {
            let Some(event) = self.player.as_ref().and_then(|p| p.try_recv()) else {
                break;
            };
            self.handle_player_event(event, ctx);
        }

        // Keep pulling frames while a stream is attached
        if self.player.is_some() {
            ctx.request_repaint();
        }

        // Escape leaves edit mode
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) && self.editing_id.is_some() {
            self.reset_draft();
        }

        let playing = self.player.is_some();
        let bounds = (
            self.preview_size.width() as u32,
            self.preview_size.height() as u32,
        );

        // Stream bar (top)
        let stream_action = egui::TopBottomPanel::top("stream_bar")
            .show(ctx, |ui| {
                stream_bar::show(
                    ui,
                    &mut self.stream_url_input,
                    &mut self.preview_size,
                    playing,
                )
            })
            .inner;

        match stream_action {
            stream_bar::StreamBarAction::Play => self.apply_stream(),
            stream_bar::StreamBarAction::Stop => self.stop_stream(),
            stream_bar::StreamBarAction::None => {}
        }

        // Overlay form and stored overlay list (right side)
        let (controls_action, list_action) = egui::SidePanel::right("overlay_panel")
            .default_width(280.0)
            .show(ctx, |ui| {
                let controls_action = controls::show(
                    ui,
                    &mut self.draft,
                    self.editing_id.is_some(),
                    self.upload_in_flight,
                    bounds,
                );
                ui.separator();
                let list_action =
                    overlay_list::show(ui, &self.overlays, self.editing_id.as_deref());
                (controls_action, list_action)
            })
            .inner;

        // Handle form actions
        match controls_action {
            controls::ControlsAction::Create => {
                log::info!("Submitting new overlay");
                self.api.create_overlay(self.draft.clone());
            }
            controls::ControlsAction::Update => {
                if let Some(id) = self.editing_id.clone() {
                    log::info!("Submitting update for overlay {}", id);
                    self.api.update_overlay(id, self.draft.clone());
                }
            }
            controls::ControlsAction::CancelEdit => self.reset_draft(),
            controls::ControlsAction::PickImage => self.pick_and_upload_image(),
            controls::ControlsAction::None => {}
        }

        // Handle list actions
        match list_action {
            overlay_list::OverlayListAction::Edit(id) => {
                if let Some(overlay) = self.overlays.iter().find(|o| o.id == id) {
                    self.draft = OverlayDraft::from_overlay(overlay);
                    log::info!("Editing overlay {}", id);
                    self.editing_id = Some(id);
                }
            }
            overlay_list::OverlayListAction::Delete(id) => {
                log::info!("Deleting overlay {}", id);
                self.api.delete_overlay(id);
            }
            overlay_list::OverlayListAction::None => {}
        }

        // Video canvas (center)
        let canvas_action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                egui::ScrollArea::both()
                    .show(ui, |ui| {
                        canvas::show(
                            ui,
                            &self.overlays,
                            self.editing_id.as_deref(),
                            &self.video_texture,
                            self.frame_size,
                            self.stream_clock_secs,
                            self.preview_size,
                            self.player_status,
                            &self.overlay_images,
                        )
                    })
                    .inner
            })
            .inner;

        // Handle canvas actions. Moves and resizes are client-side
        // optimistic updates; they are persisted only when the overlay
        // is resubmitted through the edit form.
        match canvas_action {
            canvas::CanvasAction::MoveOverlay { id, x, y } => {
                if let Some(overlay) = self.overlay_mut(&id) {
                    overlay.move_to(x, y);
                }
            }
            canvas::CanvasAction::ResizeOverlay { id, width, height } => {
                if let Some(overlay) = self.overlay_mut(&id) {
                    overlay.resize_to(width, height);
                }
            }
            canvas::CanvasAction::None => {}
        }
    }
}
