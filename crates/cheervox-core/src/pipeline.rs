//! The sequential processing loop: one task at a time, parse to playback.
//!
//! Runs on its own thread, blocking on the queue when idle. Every stage
//! failure degrades to "drop this prompt/task and continue"; nothing here is
//! allowed to kill the thread, since a dead consumer means cheers pile up
//! and nothing ever plays.

use crate::audio;
use crate::audit::AuditLog;
use crate::config::CheerConfig;
use crate::error::CheerResult;
use crate::filter::{self, AdmitDecision};
use crate::parser;
use crate::playback::{self, CancelToken};
use crate::queue::{TaskConsumer, TaskProducer};
use crate::tts::{self, TtsBackend};
use crate::types::{CheerEvent, Task};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Run one event through admission and, if admitted, hand it to the queue.
///
/// Called from the ingestion thread for every qualifying platform event.
/// The audit line is written before the push so a crash mid-synthesis still
/// leaves a trace of what was accepted; an audit write failure is logged but
/// does not revoke admission.
pub fn ingest(
    event: CheerEvent,
    config: &CheerConfig,
    blacklist: &HashSet<String>,
    audit: &AuditLog,
    producer: &TaskProducer,
) -> AdmitDecision {
    let decision = filter::admit(&event, config, blacklist);
    if !decision.admitted {
        info!(sender = %event.sender, reason = decision.reason.as_str(), "event rejected");
        return decision;
    }

    let sender = event.sender.to_lowercase();
    let bypass = config.is_free_pass(&sender);
    let task = Task::new(event.message, event.bits, sender, bypass);
    info!(task = %task.id, sender = %task.sender, reason = decision.reason.as_str(), "event admitted");

    if let Err(e) = audit.append(task.id, &task.text) {
        warn!(task = %task.id, error = %e, "audit write failed");
    }
    if let Err(e) = producer.push(task) {
        error!(error = %e, "task queue closed, event lost");
    }
    decision
}

/// Pop and process tasks until every producer is gone.
///
/// Configuration is reloaded at each task boundary, so settings edits apply
/// between tasks, never mid-task. Playback of one task intentionally blocks
/// processing of the next.
pub fn run(mut consumer: TaskConsumer, tts: &dyn TtsBackend, cancel: &CancelToken) {
    info!("processing loop started");
    while let Some(task) = consumer.pop() {
        let config = CheerConfig::load();
        info!(task = %task.id, sender = %task.sender, bits = task.bits, "processing task");

        let clip = match process_task(&task, tts, &config) {
            Ok(Some(path)) => path,
            Ok(None) => continue,
            Err(e) => {
                warn!(task = %task.id, error = %e, "task failed, moving on");
                continue;
            }
        };

        match playback::play_clip(&clip, cancel, config.playback_hard_cap) {
            Ok(outcome) => info!(task = %task.id, ?outcome, "task finished"),
            Err(e) => error!(task = %task.id, error = %e, "playback failed"),
        }
    }
    info!("all producers gone, processing loop stopped");
}

/// Parse, synthesize, and assemble one task. Returns the combined clip path,
/// or `None` when the task yields nothing to play (no prompts, or every
/// prompt was filtered or failed), which is an expected outcome rather than
/// an error.
pub fn process_task(
    task: &Task,
    tts: &dyn TtsBackend,
    config: &CheerConfig,
) -> CheerResult<Option<PathBuf>> {
    let prompts = parser::parse(&task.text, &config.indicator);
    if prompts.is_empty() {
        info!(task = %task.id, "no voice prompts in message, task abandoned");
        return Ok(None);
    }

    let results = tts::synthesize_prompts(task, &prompts, tts, config);
    if results.is_empty() {
        info!(task = %task.id, "no prompt produced audio, task abandoned");
        return Ok(None);
    }

    let Some(clip) = audio::assemble(&results, config)? else {
        return Ok(None);
    };

    std::fs::create_dir_all(&config.audio_dir)?;
    let path = config.audio_dir.join(tts::clip_file_name(task));
    clip.export_wav(&path)?;
    info!(task = %task.id, clip = %path.display(), secs = clip.duration().as_secs_f32(), "clip assembled");
    Ok(Some(path))
}
