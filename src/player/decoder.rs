// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! FFmpeg decode loop for live streams.
//!
//! Runs on a dedicated thread owned by [`super::stream::StreamPlayer`].
//! Opens the stream URL with low-latency demuxer options, decodes the
//! best video stream, converts frames to RGBA, and paces delivery by
//! presentation timestamp.

use super::stream::{PlayerCommand, PlayerEvent, VideoFrame};
use anyhow::{anyhow, Result};
use std::sync::mpsc::{Receiver, SyncSender, TryRecvError};
use std::sync::Once;
use std::time::{Duration, Instant};

/// Frames due further out than this indicate a timestamp discontinuity
/// (live playlists restart their clock); the pacer resyncs instead of
/// sleeping through the gap.
const MAX_FRAME_DELAY: Duration = Duration::from_secs(1);

/// Initialize FFmpeg once per process and quiet its logging down to
/// errors.
fn init_ffmpeg() -> Result<()> {
    static FFMPEG_INIT: Once = Once::new();

    let mut result = Ok(());
    FFMPEG_INIT.call_once(|| {
        result = ffmpeg_next::init().map_err(Into::into);
        if result.is_ok() {
            ffmpeg_next::util::log::set_level(ffmpeg_next::util::log::Level::Error);
        }
    });
    result
}

/// Decode `url` until the stream ends or a stop command arrives.
///
/// Frames are delivered with `try_send`: when the UI falls behind, stale
/// live frames are dropped rather than queued.
pub fn run(
    url: &str,
    commands: &Receiver<PlayerCommand>,
    events: &SyncSender<PlayerEvent>,
) -> Result<()> {
    init_ffmpeg()?;

    // Keep demuxer buffering minimal so playback stays near the live edge
    let mut options = ffmpeg_next::Dictionary::new();
    options.set("fflags", "nobuffer");
    options.set("flags", "low_delay");
    // A stalled network read must not outlive a stop request for long
    options.set("rw_timeout", "10000000");

    let mut ictx = ffmpeg_next::format::input_with_dictionary(url, options)?;

    let input = ictx
        .streams()
        .best(ffmpeg_next::media::Type::Video)
        .ok_or_else(|| anyhow!("no video stream in {url}"))?;
    let stream_index = input.index();
    let time_base = input.time_base();
    let time_base_secs = f64::from(time_base.numerator()) / f64::from(time_base.denominator());
    let parameters = input.parameters();

    let context = ffmpeg_next::codec::context::Context::from_parameters(parameters)?;
    let mut decoder = context.decoder().video()?;
    let width = decoder.width();
    let height = decoder.height();

    let mut scaler = ffmpeg_next::software::scaling::Context::get(
        decoder.format(),
        width,
        height,
        ffmpeg_next::format::Pixel::RGBA,
        width,
        height,
        ffmpeg_next::software::scaling::Flags::BILINEAR,
    )?;

    log::info!("Stream opened: {} ({}x{})", url, width, height);
    let _ = events.try_send(PlayerEvent::Connected { width, height });

    let mut pacer = Pacer::new();

    loop {
        if should_stop(commands) {
            return Ok(());
        }

        // Pull packets until one video frame is delivered, then come
        // back around
        let mut delivered = false;
        for (stream, packet) in ictx.packets() {
            if should_stop(commands) {
                return Ok(());
            }
            if stream.index() != stream_index {
                continue;
            }

            if let Err(e) = decoder.send_packet(&packet) {
                // Live segments occasionally carry corrupt packets
                log::warn!("Dropping packet: {}", e);
                continue;
            }

            if deliver_frames(&mut decoder, &mut scaler, time_base_secs, &mut pacer, events) > 0 {
                delivered = true;
                break;
            }
        }

        if !delivered {
            // Demuxer ran dry: the stream ended
            let _ = events.try_send(PlayerEvent::Ended);
            return Ok(());
        }
    }
}

fn should_stop(commands: &Receiver<PlayerCommand>) -> bool {
    match commands.try_recv() {
        Ok(PlayerCommand::Stop) | Err(TryRecvError::Disconnected) => true,
        Err(TryRecvError::Empty) => false,
    }
}

/// Drain every frame the decoder has ready, convert to RGBA, and send it.
/// Returns the number of frames produced.
fn deliver_frames(
    decoder: &mut ffmpeg_next::decoder::Video,
    scaler: &mut ffmpeg_next::software::scaling::Context,
    time_base_secs: f64,
    pacer: &mut Pacer,
    events: &SyncSender<PlayerEvent>,
) -> usize {
    let mut delivered = 0;

    let mut decoded = ffmpeg_next::frame::Video::empty();
    while decoder.receive_frame(&mut decoded).is_ok() {
        let mut rgba = ffmpeg_next::frame::Video::empty();
        if let Err(e) = scaler.run(&decoded, &mut rgba) {
            log::warn!("Frame scaling failed: {}", e);
            continue;
        }

        let pts_secs = decoded
            .timestamp()
            .map_or(0.0, |pts| pts as f64 * time_base_secs);
        pacer.wait_until_due(pts_secs);

        let frame = VideoFrame {
            rgba: extract_rgba(&rgba),
            width: rgba.width(),
            height: rgba.height(),
            pts_secs,
        };
        let _ = events.try_send(PlayerEvent::Frame(frame));
        delivered += 1;
    }

    delivered
}

/// Extracts RGBA data from a frame, handling stride correctly.
fn extract_rgba(frame: &ffmpeg_next::frame::Video) -> Vec<u8> {
    let width = frame.width() as usize;
    let height = frame.height() as usize;
    let data = frame.data(0);
    let stride = frame.stride(0);
    let row_bytes = width * 4;

    let mut rgba = Vec::with_capacity(row_bytes * height);
    for y in 0..height {
        let start = y * stride;
        rgba.extend_from_slice(&data[start..start + row_bytes]);
    }
    rgba
}

/// Paces frame delivery against the first observed timestamp so a burst
/// of decoded segment frames plays out in real time.
struct Pacer {
    started: Instant,
    first_pts: Option<f64>,
}

impl Pacer {
    fn new() -> Self {
        Self {
            started: Instant::now(),
            first_pts: None,
        }
    }

    fn wait_until_due(&mut self, pts_secs: f64) {
        if let Some(delay) = self.delay_until_due(pts_secs, Instant::now()) {
            std::thread::sleep(delay);
        }
    }

    /// How long to sleep before `pts_secs` is due, or `None` if it
    /// should be shown immediately. Timestamp discontinuities (backward
    /// jumps, or frames due more than [`MAX_FRAME_DELAY`] out) restart
    /// the clock at the current frame.
    fn delay_until_due(&mut self, pts_secs: f64, now: Instant) -> Option<Duration> {
        let first = *self.first_pts.get_or_insert(pts_secs);
        let offset = pts_secs - first;

        if offset < 0.0 {
            self.resync(pts_secs, now);
            return None;
        }

        let due = self.started + Duration::from_secs_f64(offset);
        match due.checked_duration_since(now) {
            Some(delay) if delay > MAX_FRAME_DELAY => {
                self.resync(pts_secs, now);
                None
            }
            Some(delay) if !delay.is_zero() => Some(delay),
            _ => None,
        }
    }

    fn resync(&mut self, pts_secs: f64, now: Instant) {
        self.started = now;
        self.first_pts = Some(pts_secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_shows_immediately() {
        let now = Instant::now();
        let mut pacer = Pacer {
            started: now,
            first_pts: None,
        };
        assert_eq!(pacer.delay_until_due(12.5, now), None);
    }

    #[test]
    fn test_next_frame_waits_for_its_timestamp() {
        let now = Instant::now();
        let mut pacer = Pacer {
            started: now,
            first_pts: None,
        };
        pacer.delay_until_due(0.0, now);

        let delay = pacer.delay_until_due(0.5, now).expect("frame is due later");
        assert!((delay.as_secs_f64() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_late_frame_is_not_delayed() {
        let now = Instant::now();
        let mut pacer = Pacer {
            started: now,
            first_pts: None,
        };
        pacer.delay_until_due(0.0, now);

        // Decoder is running behind the frame's due time
        let late = now + Duration::from_secs(1);
        assert_eq!(pacer.delay_until_due(0.2, late), None);
    }

    #[test]
    fn test_backward_jump_resyncs_clock() {
        let now = Instant::now();
        let mut pacer = Pacer {
            started: now,
            first_pts: None,
        };
        pacer.delay_until_due(100.0, now);

        // Playlist restarted its timestamps
        assert_eq!(pacer.delay_until_due(1.0, now), None);

        // Pacing continues from the new baseline
        let delay = pacer.delay_until_due(1.04, now).expect("frame is due later");
        assert!((delay.as_secs_f64() - 0.04).abs() < 0.001);
    }

    #[test]
    fn test_forward_jump_resyncs_clock() {
        let now = Instant::now();
        let mut pacer = Pacer {
            started: now,
            first_pts: None,
        };
        pacer.delay_until_due(0.0, now);

        // A frame due far in the future is a discontinuity, not a wait
        assert_eq!(pacer.delay_until_due(600.0, now), None);
    }
}
