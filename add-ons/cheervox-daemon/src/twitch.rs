//! Twitch EventSub ingestion over websocket.
//!
//! Owns the realtime connection on a dedicated thread: connect, capture the
//! session id from the welcome frame, register the `channel.cheer`
//! subscription over Helix, then forward each cheer notification through
//! admission into the task queue. The thread only ever pushes; it never
//! waits on synthesis or playback. Dropped connections reconnect with a
//! fixed delay, re-subscribing under the new session (duplicate delivery
//! across reconnects is accepted).

use anyhow::{anyhow, Context, Result};
use cheervox_core::{blacklist, pipeline, AuditLog, CheerConfig, CheerEvent, TaskProducer};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};
use tungstenite::Message;

const RECONNECT_DELAY: Duration = Duration::from_secs(10);

/// Credentials and endpoints for the EventSub session.
#[derive(Debug, Clone)]
pub struct TwitchConfig {
    pub client_id: String,
    pub auth_token: String,
    pub channel_id: String,
    pub eventsub_url: String,
}

impl TwitchConfig {
    /// Build from the environment: `CLIENT_ID`, `AUTH_TOKEN`, `CHANNEL_ID`,
    /// optional `EVENTSUB_URL`.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            client_id: std::env::var("CLIENT_ID").context("CLIENT_ID not set")?,
            auth_token: std::env::var("AUTH_TOKEN").context("AUTH_TOKEN not set")?,
            channel_id: std::env::var("CHANNEL_ID").context("CHANNEL_ID not set")?,
            eventsub_url: std::env::var("EVENTSUB_URL")
                .unwrap_or_else(|_| "wss://eventsub.wss.twitch.tv/ws".to_string()),
        })
    }
}

/// Connect-and-read forever. Runs on the ingestion thread.
pub fn run_ingestion(config: TwitchConfig, producer: TaskProducer) {
    loop {
        match read_session(&config, &producer) {
            Ok(()) => info!("EventSub session closed, reconnecting"),
            Err(e) => warn!(error = %e, "EventSub session failed, reconnecting"),
        }
        std::thread::sleep(RECONNECT_DELAY);
    }
}

/// One websocket session: read frames until the connection drops.
fn read_session(config: &TwitchConfig, producer: &TaskProducer) -> Result<()> {
    let (mut socket, _response) =
        tungstenite::connect(config.eventsub_url.as_str()).context("EventSub connect failed")?;
    info!(url = %config.eventsub_url, "EventSub connected");
    let mut session_id: Option<String> = None;

    loop {
        let message = socket.read().context("EventSub read failed")?;
        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => return Ok(()),
            _ => continue,
        };
        let frame: Value = match serde_json::from_str(&text) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "unparseable EventSub frame");
                continue;
            }
        };

        if session_id.is_none() {
            if let Some(id) = frame["payload"]["session"]["id"].as_str() {
                debug!(session = id, "EventSub session established");
                session_id = Some(id.to_string());
                subscribe_to_cheers(config, id)?;
                continue;
            }
        }
        if frame["payload"]["event"].is_object() {
            process_notification(&frame["payload"]["event"], producer);
        }
    }
}

/// Register the `channel.cheer` subscription for this websocket session.
fn subscribe_to_cheers(config: &TwitchConfig, session_id: &str) -> Result<()> {
    let body = serde_json::json!({
        "type": "channel.cheer",
        "version": "1",
        "condition": { "broadcaster_user_id": config.channel_id },
        "transport": { "method": "websocket", "session_id": session_id },
    });
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(15))
        .build()
        .context("subscription client")?;
    let res = client
        .post("https://api.twitch.tv/helix/eventsub/subscriptions")
        .header("Client-ID", &config.client_id)
        .bearer_auth(&config.auth_token)
        .json(&body)
        .send()
        .context("subscription request failed")?;
    if !res.status().is_success() {
        let status = res.status();
        let body = res.text().unwrap_or_default();
        return Err(anyhow!("subscription rejected {}: {}", status, body));
    }
    info!("subscribed to channel.cheer");
    Ok(())
}

/// Turn one cheer notification into a queued task (or a logged rejection).
/// Config and blacklist are re-read per event so edits apply immediately.
fn process_notification(event: &Value, producer: &TaskProducer) {
    let cheer = CheerEvent {
        sender: event["user_name"]
            .as_str()
            .unwrap_or("anonymous")
            .to_lowercase(),
        message: event["message"].as_str().unwrap_or_default().to_string(),
        bits: event["bits"].as_i64().unwrap_or(0),
    };
    debug!(sender = %cheer.sender, bits = cheer.bits, "cheer received");

    let config = CheerConfig::load();
    let blocked = blacklist::load(&config.blacklist_path);
    let audit = AuditLog::new(&config.audit_log_path);
    pipeline::ingest(cheer, &config, &blocked, &audit, producer);
}
