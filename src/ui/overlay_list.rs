// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Existing overlay list panel.

use crate::models::overlay::{Overlay, OverlayKind};

/// Result of list interaction.
pub enum OverlayListAction {
    None,
    /// Load this overlay into the edit form.
    Edit(String),
    /// Delete this overlay on the service.
    Delete(String),
}

/// Display the list of overlays stored on the service.
pub fn show(ui: &mut egui::Ui, overlays: &[Overlay], editing_id: Option<&str>) -> OverlayListAction {
    let mut action = OverlayListAction::None;

    ui.heading("Overlays");
    ui.separator();

    if overlays.is_empty() {
        ui.label(egui::RichText::new("No overlays yet").weak());
        return action;
    }

    egui::ScrollArea::vertical().auto_shrink(false).show(ui, |ui| {
        for overlay in overlays {
            ui.horizontal(|ui| {
                let kind = match overlay.kind {
                    OverlayKind::Text => "text",
                    OverlayKind::Image => "image",
                };
                ui.strong(kind);
                ui.label(summarize(overlay.content_summary()));
            });

            ui.label(format!(
                "Position: ({}, {})  Size: {}x{}",
                overlay.x, overlay.y, overlay.width, overlay.height
            ));

            ui.horizontal(|ui| {
                if ui.small_button("Edit").clicked() {
                    action = OverlayListAction::Edit(overlay.id.clone());
                }
                if ui.small_button("Delete").clicked() {
                    action = OverlayListAction::Delete(overlay.id.clone());
                }
                if editing_id == Some(overlay.id.as_str()) {
                    ui.label(egui::RichText::new("editing").italics().weak());
                }
            });

            ui.separator();
        }
    });

    action
}

/// Keep long content (image URLs in particular) to one short line.
fn summarize(content: &str) -> String {
    const MAX_CHARS: usize = 40;
    let mut summary: String = content.chars().take(MAX_CHARS).collect();
    if content.chars().count() > MAX_CHARS {
        summary.push_str("...");
    }
    summary
}
