//! Cheervox daemon: cheer events in, spoken audio out.
//!
//! Wires the two threads of the pipeline together: an ingestion thread that
//! owns the EventSub websocket and pushes admitted tasks, and a processing
//! thread that owns everything from parsing to playback. A global hotkey
//! listener raises the cancellation token that interrupts playback.

mod hotkey;
mod twitch;

use cheervox_core::{pipeline, task_queue, CancelToken, CheerConfig, ElevenLabsTts};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before any env::var calls)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[cheervox-daemon] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CheerConfig::load();
    tracing::info!(
        bit_threshold = config.bit_threshold,
        indicator = %config.indicator,
        audio_dir = %config.audio_dir.display(),
        "cheervox daemon starting"
    );

    let twitch_config = twitch::TwitchConfig::from_env()?;
    let tts = ElevenLabsTts::from_env()?;
    let cancel = CancelToken::new();
    let (producer, consumer) = task_queue();

    hotkey::spawn(cancel.clone());

    let playback_cancel = cancel.clone();
    std::thread::spawn(move || {
        pipeline::run(consumer, &tts, &playback_cancel);
    });

    std::thread::spawn(move || {
        twitch::run_ingestion(twitch_config, producer);
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!("CTRL-C received; shutting down");
    Ok(())
}
