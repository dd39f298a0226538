// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the LOTS application.

pub mod canvas;
pub mod controls;
pub mod overlay_list;
pub mod stream_bar;
