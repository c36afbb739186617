//! Headless playback: one JSON snapshot per frame, on a simulated clock.

use std::io::Write;

use tracing::info;

use crate::error::Result;
use crate::playback::Playback;

/// Drive `playback` with fixed `frame_ms` ticks and write each frame to `out`
/// as a JSON line. Returns the number of frames written.
///
/// Stops after `max_frames`. Without a limit it runs until the schedule is
/// finished, or writes a single frame if playback is paused.
pub fn run_headless<W: Write>(
    playback: &mut Playback,
    mut out: W,
    frame_ms: u64,
    max_frames: Option<usize>,
) -> Result<usize> {
    // A zero-length frame would never advance the move delay.
    let frame_ms = frame_ms.max(1);
    let mut frames = 0;
    loop {
        if max_frames.is_some_and(|max| frames >= max) {
            break;
        }

        playback.tick(frame_ms);
        serde_json::to_writer(&mut out, &playback.snapshot())?;
        writeln!(out)?;
        frames += 1;

        if max_frames.is_none() && (playback.is_paused() || playback.is_finished()) {
            break;
        }
    }
    out.flush()?;

    info!(frames, cursor = playback.cursor(), "headless run complete");
    Ok(frames)
}
