// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Command line interface.

use crate::app::PreviewSize;
use clap::Parser;

/// Live overlay control panel for HLS streams
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Base URL of the overlay service
    #[arg(
        long = "api-base",
        value_name = "URL",
        default_value = "http://127.0.0.1:5000"
    )]
    pub api_base: String,

    /// HLS stream URL to start playing immediately
    #[arg(long = "stream-url", value_name = "URL")]
    pub stream_url: Option<String>,

    /// Initial preview size
    #[arg(long = "size", value_enum, default_value = "medium")]
    pub size: PreviewSize,
}
