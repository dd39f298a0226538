// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Overlay data structures.
//!
//! This module defines the overlay entity mirrored from the overlay
//! service and the form draft used to create and edit overlays.

use serde::{Deserialize, Serialize};

/// Kind of overlay content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayKind {
    Text,
    Image,
}

/// An overlay as stored by the overlay service.
///
/// Positions and sizes are whole pixels relative to the top-left corner
/// of the video preview. The id is assigned by the service. Extra wire
/// fields (such as `createdAt`) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: OverlayKind,
    pub content: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Overlay {
    /// Move the overlay to a new position.
    pub fn move_to(&mut self, x: u32, y: u32) {
        self.x = x;
        self.y = y;
    }

    /// Resize the overlay.
    pub fn resize_to(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Short content summary for list display.
    pub fn content_summary(&self) -> &str {
        match self.kind {
            OverlayKind::Text => {
                if self.content.is_empty() {
                    "(empty)"
                } else {
                    &self.content
                }
            }
            OverlayKind::Image => &self.content,
        }
    }
}

/// Form draft sent as the create/update request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayDraft {
    #[serde(rename = "type")]
    pub kind: OverlayKind,
    pub content: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for OverlayDraft {
    fn default() -> Self {
        Self {
            kind: OverlayKind::Text,
            content: String::new(),
            x: 50,
            y: 50,
            width: 100,
            height: 50,
        }
    }
}

impl OverlayDraft {
    /// Fill the draft from an existing overlay for editing.
    pub fn from_overlay(overlay: &Overlay) -> Self {
        Self {
            kind: overlay.kind,
            content: overlay.content.clone(),
            x: overlay.x,
            y: overlay.y,
            width: overlay.width,
            height: overlay.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_service_payload() {
        // The service echoes inserted documents with `_id` and `createdAt`
        let json = r#"{
            "_id": "64f1c3a2e8b1",
            "type": "text",
            "content": "LIVE",
            "x": 50,
            "y": 50,
            "width": 100,
            "height": 50,
            "createdAt": 1724673920.12
        }"#;

        let overlay: Overlay = serde_json::from_str(json).unwrap();
        assert_eq!(overlay.id, "64f1c3a2e8b1");
        assert_eq!(overlay.kind, OverlayKind::Text);
        assert_eq!(overlay.content, "LIVE");
        assert_eq!((overlay.x, overlay.y), (50, 50));
        assert_eq!((overlay.width, overlay.height), (100, 50));
    }

    #[test]
    fn test_draft_serializes_wire_field_names() {
        let draft = OverlayDraft {
            kind: OverlayKind::Image,
            content: "http://127.0.0.1:5000/uploads/logo.png".to_string(),
            ..OverlayDraft::default()
        };

        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["type"], "image");
        assert_eq!(value["content"], "http://127.0.0.1:5000/uploads/logo.png");
        assert_eq!(value["x"], 50);
        assert_eq!(value["height"], 50);
        // `_id` is server-assigned and never sent by the client
        assert!(value.get("_id").is_none());
    }

    #[test]
    fn test_draft_defaults_match_form() {
        let draft = OverlayDraft::default();
        assert_eq!(draft.kind, OverlayKind::Text);
        assert!(draft.content.is_empty());
        assert_eq!((draft.x, draft.y, draft.width, draft.height), (50, 50, 100, 50));
    }

    #[test]
    fn test_draft_from_overlay_copies_geometry() {
        let overlay = Overlay {
            id: "abc".to_string(),
            kind: OverlayKind::Text,
            content: "Breaking".to_string(),
            x: 10,
            y: 20,
            width: 300,
            height: 60,
        };

        let draft = OverlayDraft::from_overlay(&overlay);
        assert_eq!(draft.kind, overlay.kind);
        assert_eq!(draft.content, overlay.content);
        assert_eq!((draft.x, draft.y), (10, 20));
        assert_eq!((draft.width, draft.height), (300, 60));
    }
}
