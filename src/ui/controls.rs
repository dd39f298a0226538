// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Overlay form panel.
//!
//! This module provides the create/edit form for overlays: kind
//! selection, content entry (literal text or an uploaded image), and
//! position/size fields.

use crate::models::overlay::{OverlayDraft, OverlayKind};
use crate::util::geometry::MIN_OVERLAY_SIZE;

/// Result of form interaction.
pub enum ControlsAction {
    None,
    /// Submit the draft as a new overlay.
    Create,
    /// Submit the draft as an update of the overlay being edited.
    Update,
    /// Leave edit mode and reset the draft.
    CancelEdit,
    /// Open a file dialog and upload the chosen image.
    PickImage,
}

/// Display the overlay form.
pub fn show(
    ui: &mut egui::Ui,
    draft: &mut OverlayDraft,
    editing: bool,
    upload_in_flight: bool,
    bounds: (u32, u32),
) -> ControlsAction {
    let mut action = ControlsAction::None;

    ui.heading(if editing { "Edit Overlay" } else { "New Overlay" });
    ui.separator();

    ui.horizontal(|ui| {
        ui.label("Type:");
        ui.selectable_value(&mut draft.kind, OverlayKind::Text, "Text");
        ui.selectable_value(&mut draft.kind, OverlayKind::Image, "Image");
    });

    match draft.kind {
        OverlayKind::Text => {
            ui.horizontal(|ui| {
                ui.label("Content:");
                ui.text_edit_singleline(&mut draft.content);
            });
        }
        OverlayKind::Image => {
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(!upload_in_flight, egui::Button::new("Choose Image..."))
                    .clicked()
                {
                    action = ControlsAction::PickImage;
                }
                if upload_in_flight {
                    ui.spinner();
                    ui.label("Uploading...");
                }
            });
            if !draft.content.is_empty() {
                ui.label(egui::RichText::new(&draft.content).small().weak());
            }
        }
    }

    ui.add_space(4.0);

    ui.horizontal(|ui| {
        ui.label("X:");
        ui.add(egui::DragValue::new(&mut draft.x).range(0..=bounds.0));
        ui.label("Y:");
        ui.add(egui::DragValue::new(&mut draft.y).range(0..=bounds.1));
    });
    ui.horizontal(|ui| {
        ui.label("Width:");
        ui.add(egui::DragValue::new(&mut draft.width).range(MIN_OVERLAY_SIZE..=bounds.0));
        ui.label("Height:");
        ui.add(egui::DragValue::new(&mut draft.height).range(MIN_OVERLAY_SIZE..=bounds.1));
    });

    ui.add_space(4.0);

    ui.horizontal(|ui| {
        if editing {
            if ui.button("Update").clicked() {
                action = ControlsAction::Update;
            }
            if ui.button("Cancel").clicked() {
                action = ControlsAction::CancelEdit;
            }
        } else if ui.button("Create").clicked() {
            action = ControlsAction::Create;
        }
    });

    action
}
