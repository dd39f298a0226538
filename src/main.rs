// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! LOTS - Live Overlay Titling System
//!
//! A cross-platform desktop control panel that plays live HLS streams
//! and manages text/image overlays rendered on top of the video,
//! mirrored to a remote overlay service.

mod api;
mod app;
mod cli;
mod models;
mod player;
mod ui;
mod util;

use anyhow::Result;
use app::LotsApp;
use clap::Parser;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let args = cli::Args::parse();

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 760.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("LOTS - Live Overlay Titling System"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "LOTS",
        options,
        Box::new(move |cc| Ok(Box::new(LotsApp::new(cc, &args)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
