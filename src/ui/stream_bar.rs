// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Stream bar UI.
//!
//! This module provides the top bar with the stream URL input, playback
//! buttons, and the preview size selector.

use crate::app::PreviewSize;

/// Result of stream bar interaction.
pub enum StreamBarAction {
    None,
    /// Connect to the entered stream URL.
    Play,
    /// Stop playback and release the player.
    Stop,
}

/// Display the stream bar.
pub fn show(
    ui: &mut egui::Ui,
    url_input: &mut String,
    preview_size: &mut PreviewSize,
    playing: bool,
) -> StreamBarAction {
    let mut action = StreamBarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Stream URL:");

        let response = ui.add(
            egui::TextEdit::singleline(url_input)
                .desired_width(380.0)
                .hint_text("https://example.com/live/stream.m3u8"),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        if ui.button("▶ Play").clicked() || submitted {
            action = StreamBarAction::Play;
        }

        if ui.add_enabled(playing, egui::Button::new("⏹ Stop")).clicked() {
            action = StreamBarAction::Stop;
        }

        ui.separator();

        ui.label("Preview:");
        for size in [PreviewSize::Small, PreviewSize::Medium, PreviewSize::Large] {
            if ui.selectable_label(*preview_size == size, size.label()).clicked() {
                *preview_size = size;
            }
        }

        ui.separator();

        ui.label(
            egui::RichText::new("Drag overlays on the preview, resize from the corner grip")
                .italics()
                .weak(),
        );
    });

    action
}
