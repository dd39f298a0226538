// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video preview canvas with overlay display and interaction.
//!
//! This module provides the main canvas area where the live stream is
//! rendered and overlays can be dragged and resized directly on top of
//! the video.

use crate::app::{OverlayImage, PlayerStatus, PreviewSize};
use crate::models::overlay::{Overlay, OverlayKind};
use crate::util::geometry;
use std::collections::HashMap;

/// Side of the square resize grip in the overlay's bottom-right corner.
const GRIP_SIZE: f32 = 12.0;

/// Result of canvas interaction.
pub enum CanvasAction {
    None,
    /// An overlay was dragged to a new position (client-side only).
    MoveOverlay { id: String, x: u32, y: u32 },
    /// An overlay was resized from its corner grip (client-side only).
    ResizeOverlay { id: String, width: u32, height: u32 },
}

/// Display the video preview and overlays, handling drag interactions.
pub fn show(
    ui: &mut egui::Ui,
    overlays: &[Overlay],
    editing_id: Option<&str>,
    video_texture: &Option<egui::TextureHandle>,
    frame_size: Option<(u32, u32)>,
    clock_secs: Option<f64>,
    preview_size: PreviewSize,
    status: PlayerStatus,
    overlay_images: &HashMap<String, OverlayImage>,
) -> CanvasAction {
    let mut action = CanvasAction::None;

    // Set background color
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let bounds_width = preview_size.width() as u32;
    let bounds_height = preview_size.height() as u32;

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        let (canvas_rect, _) = ui.allocate_exact_size(
            egui::vec2(preview_size.width(), preview_size.height()),
            egui::Sense::hover(),
        );

        ui.painter().rect_filled(canvas_rect, 4.0, egui::Color32::BLACK);

        if let (Some(texture), Some((frame_width, frame_height))) = (video_texture, frame_size) {
            // Letterbox the frame into the fixed-size preview
            let (display_width, display_height) = geometry::fit_size(
                frame_width,
                frame_height,
                canvas_rect.width(),
                canvas_rect.height(),
            );
            let video_rect = egui::Rect::from_center_size(
                canvas_rect.center(),
                egui::vec2(display_width, display_height),
            );

            ui.painter().image(
                texture.id(),
                video_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        } else {
            show_placeholder(ui, canvas_rect, status);
        }

        // Overlays sit above the video, positioned relative to the
        // preview's top-left corner
        for overlay in overlays {
            let overlay_rect = egui::Rect::from_min_size(
                canvas_rect.min + egui::vec2(overlay.x as f32, overlay.y as f32),
                egui::vec2(overlay.width as f32, overlay.height as f32),
            );

            draw_overlay(ui.painter(), overlay, overlay_rect, overlay_images);

            if editing_id == Some(overlay.id.as_str()) {
                ui.painter().rect_stroke(
                    overlay_rect,
                    2.0,
                    egui::Stroke::new(2.0, egui::Color32::YELLOW),
                );
            }

            // Body drag moves the overlay
            let body_id = egui::Id::new(("overlay", &overlay.id));
            let body = ui
                .interact(overlay_rect, body_id, egui::Sense::drag())
                .on_hover_cursor(egui::CursorIcon::Move);
            if body.dragged() {
                let delta = body.drag_delta();
                let (x, y, _, _) = geometry::clamp_rect(
                    overlay.x as f32 + delta.x,
                    overlay.y as f32 + delta.y,
                    overlay.width as f32,
                    overlay.height as f32,
                    bounds_width,
                    bounds_height,
                );
                if (x, y) != (overlay.x, overlay.y) {
                    action = CanvasAction::MoveOverlay {
                        id: overlay.id.clone(),
                        x,
                        y,
                    };
                }
            }

            // Corner grip drag resizes it
            let grip_rect = egui::Rect::from_min_size(
                overlay_rect.max - egui::vec2(GRIP_SIZE, GRIP_SIZE),
                egui::vec2(GRIP_SIZE, GRIP_SIZE),
            );
            let grip = ui
                .interact(grip_rect, body_id.with("resize"), egui::Sense::drag())
                .on_hover_cursor(egui::CursorIcon::ResizeSouthEast);
            if grip.dragged() {
                let delta = grip.drag_delta();
                let (width, height) = geometry::clamp_size_at(
                    overlay.x,
                    overlay.y,
                    overlay.width as f32 + delta.x,
                    overlay.height as f32 + delta.y,
                    bounds_width,
                    bounds_height,
                );
                if (width, height) != (overlay.width, overlay.height) {
                    action = CanvasAction::ResizeOverlay {
                        id: overlay.id.clone(),
                        width,
                        height,
                    };
                }
            }

            // Grip handle, drawn like a vertex marker
            let grip_center = overlay_rect.max - egui::vec2(GRIP_SIZE / 2.0, GRIP_SIZE / 2.0);
            ui.painter().circle_filled(grip_center, 4.0, egui::Color32::WHITE);
            ui.painter().circle_stroke(
                grip_center,
                4.0,
                egui::Stroke::new(1.0, egui::Color32::BLACK),
            );
        }
    });

    // Status line at the bottom
    ui.separator();
    ui.horizontal(|ui| {
        let status_text = match (status, frame_size) {
            (PlayerStatus::Live, Some((w, h))) => {
                let clock = format_clock(clock_secs.unwrap_or(0.0));
                format!("Live {}x{} ({})", w, h, clock)
            }
            (PlayerStatus::Live, None) | (PlayerStatus::Connecting, _) => {
                "Connecting...".to_string()
            }
            (PlayerStatus::Ended, _) => "Stream ended".to_string(),
            (PlayerStatus::Idle, _) => "No stream".to_string(),
        };
        ui.label(status_text);
        ui.separator();
        ui.label(format!("{} overlays", overlays.len()));
    });

    action
}

/// Draw a single overlay's content.
fn draw_overlay(
    painter: &egui::Painter,
    overlay: &Overlay,
    rect: egui::Rect,
    overlay_images: &HashMap<String, OverlayImage>,
) {
    match overlay.kind {
        OverlayKind::Text => {
            painter.rect_filled(rect, 0.0, egui::Color32::from_rgba_unmultiplied(0, 0, 0, 102));
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                &overlay.content,
                egui::FontId::proportional(16.0),
                egui::Color32::RED,
            );
        }
        OverlayKind::Image => match overlay_images.get(&overlay.content) {
            Some(OverlayImage::Ready(texture)) => {
                painter.image(
                    texture.id(),
                    rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }
            Some(OverlayImage::Failed) => {
                painter.rect_filled(rect, 0.0, egui::Color32::from_rgba_unmultiplied(40, 0, 0, 120));
                painter.rect_stroke(rect, 0.0, egui::Stroke::new(1.0, egui::Color32::GRAY));
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "image unavailable",
                    egui::FontId::proportional(12.0),
                    egui::Color32::LIGHT_GRAY,
                );
            }
            _ => {
                // Fetch still in flight
                painter.rect_stroke(rect, 0.0, egui::Stroke::new(1.0, egui::Color32::GRAY));
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "loading...",
                    egui::FontId::proportional(12.0),
                    egui::Color32::LIGHT_GRAY,
                );
            }
        },
    }
}

/// Watch time as hh:mm:ss.
fn format_clock(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

/// Centered canvas message when no video frame is available.
fn show_placeholder(ui: &egui::Ui, canvas_rect: egui::Rect, status: PlayerStatus) {
    let message = match status {
        PlayerStatus::Connecting => "Connecting to stream...",
        PlayerStatus::Ended => "Stream ended",
        _ => "Enter an HLS stream URL above to start the preview",
    };
    ui.painter().text(
        canvas_rect.center(),
        egui::Align2::CENTER_CENTER,
        message,
        egui::FontId::proportional(16.0),
        egui::Color32::from_gray(180),
    );
}
