//! # Cheervox Core - Cheer-to-Speech Pipeline
//!
//! Turns donation-triggered chat messages into spoken audio: admitted cheer
//! events are queued, their voice-tagged prompts synthesized one by one,
//! stitched into a single clip, and played aloud with a live kill-switch.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ ingestion thread                                             │
//! │  ┌───────────┐   ┌──────────────┐   ┌───────────┐            │
//! │  │ EventSub  │ → │ Event Filter │ → │ Audit Log │ → queue    │
//! │  └───────────┘   └──────────────┘   └───────────┘            │
//! └──────────────────────────────────────────────────────────────┘
//! ┌──────────────────────────────────────────────────────────────┐
//! │ processing thread (one task at a time)                       │
//! │  queue → Parser → Allowance → TTS → Assembler → Playback     │
//! │                                                  ↑           │
//! │                               CancelToken ───────┘           │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod allowance;
pub mod audio;
pub mod audit;
pub mod blacklist;
pub mod config;
pub mod error;
pub mod filter;
pub mod parser;
pub mod pipeline;
pub mod playback;
pub mod queue;
pub mod tts;
pub mod types;
pub mod voices;

pub use audio::{assemble, AudioSegment};
pub use audit::AuditLog;
pub use config::CheerConfig;
pub use error::{CheerError, CheerResult};
pub use filter::{admit, AdmitDecision, AdmitReason};
pub use playback::{CancelToken, PlaybackOutcome};
pub use queue::{task_queue, TaskConsumer, TaskProducer};
pub use tts::{ElevenLabsTts, PlaceholderTts, TtsBackend};
pub use types::{CheerEvent, Prompt, SynthesisResult, Task};
