// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Stream player handle and lifecycle.
//!
//! [`StreamPlayer`] owns the decoder thread for one stream URL. Dropping
//! the handle stops the decoder and joins the thread, so replacing a
//! player (drop the old one, connect a new one) never leaves two
//! decoders running against the same video surface.

use super::decoder;
use std::sync::mpsc::{channel, sync_channel, Receiver, Sender};
use std::thread::JoinHandle;

/// Decoded frames buffered between the decoder thread and the UI.
/// The decoder drops frames instead of blocking when the UI is behind.
const FRAME_CHANNEL_CAPACITY: usize = 8;

/// Commands sent to the decoder thread.
#[derive(Debug, Clone, Copy)]
pub enum PlayerCommand {
    Stop,
}

/// A decoded video frame ready for display.
pub struct VideoFrame {
    /// RGBA pixel data (width x height x 4 bytes).
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Presentation timestamp in seconds.
    pub pts_secs: f64,
}

/// Events sent from the decoder thread to the UI.
pub enum PlayerEvent {
    /// Stream opened and the video parameters are known.
    Connected { width: u32, height: u32 },
    /// A new frame is ready for display.
    Frame(VideoFrame),
    /// The stream ended.
    Ended,
    /// The decoder failed; the thread has exited.
    Error(String),
}

/// Handle to a running stream decoder.
pub struct StreamPlayer {
    url: String,
    command_tx: Sender<PlayerCommand>,
    event_rx: Receiver<PlayerEvent>,
    thread: Option<JoinHandle<()>>,
}

impl StreamPlayer {
    /// Spawn a decoder thread for the given stream URL.
    ///
    /// Never blocks: the stream is opened on the decoder thread, and
    /// connection failures arrive later as [`PlayerEvent::Error`].
    pub fn connect(url: &str) -> Self {
        let (command_tx, command_rx) = channel();
        let (event_tx, event_rx) = sync_channel(FRAME_CHANNEL_CAPACITY);

        let thread_url = url.to_string();
        let thread = std::thread::spawn(move || {
            match decoder::run(&thread_url, &command_rx, &event_tx) {
                Ok(()) => log::info!("Stream decoder finished: {thread_url}"),
                Err(e) => {
                    log::error!("Stream decoder failed: {e:#}");
                    let _ = event_tx.try_send(PlayerEvent::Error(format!("{e:#}")));
                }
            }
        });

        Self {
            url: url.to_string(),
            command_tx,
            event_rx,
            thread: Some(thread),
        }
    }

    /// The stream URL this player was connected to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Next pending event, if any. Polled from the UI update loop.
    pub fn try_recv(&self) -> Option<PlayerEvent> {
        self.event_rx.try_recv().ok()
    }
}

impl Drop for StreamPlayer {
    fn drop(&mut self) {
        // Stop the decoder and wait for it to exit before the handle
        // goes away, so a replacement player never runs concurrently
        let _ = self.command_tx.send(PlayerCommand::Stop);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("Stream decoder thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_connect_reports_error_for_unreachable_source() {
        let player = StreamPlayer::connect("/nonexistent/stream.m3u8");

        // The decoder thread fails to open the source and reports it
        let event = player
            .event_rx
            .recv_timeout(Duration::from_secs(30))
            .expect("decoder should emit an event");
        match event {
            PlayerEvent::Error(message) => assert!(!message.is_empty()),
            _ => panic!("expected an error event for a nonexistent source"),
        }
    }

    #[test]
    fn test_drop_joins_decoder_thread() {
        let player = StreamPlayer::connect("/nonexistent/stream.m3u8");
        assert_eq!(player.url(), "/nonexistent/stream.m3u8");
        // Must not hang: the decoder exits after the open failure
        drop(player);
    }
}
