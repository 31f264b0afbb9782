//! Shared data types flowing through the pipeline
//!
//! A platform event becomes a [`CheerEvent`], admission turns it into a
//! [`Task`], parsing splits the task text into [`Prompt`]s, and each prompt
//! that survives synthesis yields a [`SynthesisResult`].

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use uuid::Uuid;

/// A donation-triggered platform notification, as delivered by ingestion.
/// Immutable once constructed; consumed exactly once by the event filter.
#[derive(Debug, Clone)]
pub struct CheerEvent {
    /// Sender identity, lowercased by the ingestion layer.
    pub sender: String,
    /// Raw message text attached to the cheer.
    pub message: String,
    /// Donated bit quantity.
    pub bits: i64,
}

impl CheerEvent {
    /// Whether the configured indicator token appears anywhere in the message.
    pub fn has_indicator(&self, indicator: &str) -> bool {
        self.message.contains(indicator)
    }
}

/// The unit of work carried through the queue from admission to playback.
/// Owned by the queue until dequeued; dropped after the pipeline finishes.
#[derive(Debug, Clone)]
pub struct Task {
    /// Time-ordered unique identifier (UUIDv7); never collides across runs.
    pub id: Uuid,
    pub text: String,
    pub bits: i64,
    pub sender: String,
    /// Privileged senders are exempt from the character quota.
    pub bypass: bool,
}

impl Task {
    pub fn new(text: String, bits: i64, sender: String, bypass: bool) -> Self {
        Self {
            id: Uuid::now_v7(),
            text,
            bits,
            sender,
            bypass,
        }
    }
}

/// One (voice alias, text) unit extracted from a task's message.
/// Sequence order within a task is playback order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub voice_alias: String,
    pub text: String,
}

impl Prompt {
    pub fn new(voice_alias: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            voice_alias: voice_alias.into(),
            text: text.into(),
        }
    }
}

/// Synthesized audio for one prompt, persisted to disk.
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    pub prompt: Prompt,
    /// Path of the canonical WAV written for this prompt.
    pub audio_path: PathBuf,
    pub synthesized_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_ids_are_unique_and_time_ordered() {
        let a = Task::new("one".into(), 100, "alice".into(), false);
        let b = Task::new("two".into(), 100, "bob".into(), false);
        assert_ne!(a.id, b.id);

        // v7 ids sort by creation time across timestamp ticks
        std::thread::sleep(std::time::Duration::from_millis(2));
        let c = Task::new("three".into(), 100, "carol".into(), false);
        assert!(a.id < c.id);
    }

    #[test]
    fn indicator_is_substring_match() {
        let event = CheerEvent {
            sender: "alice".into(),
            message: "cheer100 11io dwight: hi".into(),
            bits: 100,
        };
        assert!(event.has_indicator("11io"));
        assert!(!event.has_indicator("22io"));
    }
}
