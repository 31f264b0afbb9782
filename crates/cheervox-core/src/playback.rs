//! Interruptible playback of an assembled clip.
//!
//! One clip plays at a time on the processing thread: Idle → Playing →
//! {Completed, Cancelled}. While playing, the controller polls a shared
//! [`CancelToken`] every 50 ms; an input adapter (e.g. the daemon's hotkey
//! listener) raises the token, keeping key detection out of the transition
//! logic. Playback also ends when the clip finishes or a hard time cap is
//! reached, whichever comes first.

use crate::error::{CheerError, CheerResult};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Cooperative cancellation signal shared between an input adapter and the
/// playback controller.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal. Safe from any thread.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Clear a stale signal. The controller resets on entry so a press from
    /// before this clip cannot cancel it.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Terminal state of one clip's playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    Completed,
    Cancelled,
}

/// Play a WAV clip to the default output device, blocking until it ends.
///
/// Runs on the processing thread by design: playback of one task fully
/// blocks processing of the next.
pub fn play_clip(
    path: &Path,
    cancel: &CancelToken,
    hard_cap: Duration,
) -> CheerResult<PlaybackOutcome> {
    let duration = clip_duration(path)?;
    let deadline = duration.min(hard_cap);

    let (_stream, stream_handle) = rodio::OutputStream::try_default()
        .map_err(|e| CheerError::Playback(e.to_string()))?;
    let sink = rodio::Sink::try_new(&stream_handle)
        .map_err(|e| CheerError::Playback(e.to_string()))?;

    let file = BufReader::new(File::open(path)?);
    let source = rodio::Decoder::new(file).map_err(|e| CheerError::Playback(e.to_string()))?;

    cancel.reset();
    sink.append(source);
    let start = Instant::now();
    info!(clip = %path.display(), secs = duration.as_secs_f32(), "playback started");

    loop {
        if cancel.is_cancelled() {
            sink.stop();
            info!(clip = %path.display(), "playback cancelled");
            return Ok(PlaybackOutcome::Cancelled);
        }
        if sink.empty() || start.elapsed() >= deadline {
            sink.stop();
            return Ok(PlaybackOutcome::Completed);
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

fn clip_duration(path: &Path) -> CheerResult<Duration> {
    let reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    Ok(Duration::from_secs_f64(
        reader.duration() as f64 / spec.sample_rate as f64,
    ))
}
