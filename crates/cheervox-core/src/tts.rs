//! Synthesis: per-prompt TTS calls, persistence, and post-processing.
//!
//! Each prompt that survives the character allowance is synthesized through a
//! [`TtsBackend`], decoded, and written as a uniquely named WAV under the
//! audio directory. A failed prompt is dropped and its siblings continue; a
//! task never aborts mid-way because one voice misbehaved.

use crate::allowance;
use crate::audio::{self, AudioSegment, QUIET_VOICE_ALIAS};
use crate::config::CheerConfig;
use crate::error::{CheerError, CheerResult};
use crate::types::{Prompt, SynthesisResult, Task};
use crate::voices;
use chrono::Utc;
use std::path::PathBuf;
use tracing::{debug, warn};

const STABILITY: f64 = 0.65;
const SIMILARITY_BOOST: f64 = 0.85;
/// Playback-rate multiplier applied to the quiet voice to deepen its tone.
const QUIET_VOICE_SPEED: f32 = 0.95;

/// Backend that turns (voice id, text) into audio bytes. Implement for the
/// real provider or a test double.
pub trait TtsBackend: Send + Sync {
    /// Synthesize text with the given provider voice. Return the raw audio
    /// bytes (MP3/WAV); an empty vec means "nothing to play".
    fn synthesize(&self, voice_id: &str, text: &str) -> CheerResult<Vec<u8>>;
}

/// Placeholder TTS: returns empty audio so nothing is persisted or played.
#[derive(Debug, Default)]
pub struct PlaceholderTts;

impl TtsBackend for PlaceholderTts {
    fn synthesize(&self, _voice_id: &str, _text: &str) -> CheerResult<Vec<u8>> {
        Ok(Vec::new())
    }
}

/// Production backend: the ElevenLabs text-to-speech API.
#[derive(Debug, Clone)]
pub struct ElevenLabsTts {
    /// Base URL without trailing slash (e.g. https://api.elevenlabs.io/v1).
    pub base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
}

impl ElevenLabsTts {
    /// Build from the environment: `ELEVENLABS_API_KEY`, optional
    /// `ELEVENLABS_API_URL`.
    pub fn from_env() -> CheerResult<Self> {
        let api_key = std::env::var("ELEVENLABS_API_KEY")
            .map_err(|_| CheerError::Config("TTS requires ELEVENLABS_API_KEY".to_string()))?;
        let base_url = std::env::var("ELEVENLABS_API_URL")
            .unwrap_or_else(|_| "https://api.elevenlabs.io/v1".to_string());
        Self::new(base_url, api_key)
    }

    /// Create with explicit config (e.g. for tests or non-env wiring).
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> CheerResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| CheerError::Tts(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client,
        })
    }
}

impl TtsBackend for ElevenLabsTts {
    fn synthesize(&self, voice_id: &str, text: &str) -> CheerResult<Vec<u8>> {
        let url = format!(
            "{}/text-to-speech/{}",
            self.base_url.trim_end_matches('/'),
            voice_id
        );
        let body = serde_json::json!({
            "text": text,
            "voice_settings": {
                "stability": STABILITY,
                "similarity_boost": SIMILARITY_BOOST,
            },
        });
        let res = self
            .client
            .post(&url)
            .header("accept", "audio/mpeg")
            .header("xi-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| CheerError::Tts(e.to_string()))?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().unwrap_or_default();
            return Err(CheerError::Tts(format!("TTS API error {}: {}", status, body)));
        }
        let bytes = res.bytes().map_err(|e| CheerError::Tts(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Synthesize every prompt of a task, in order, enforcing the cumulative
/// character allowance. Returns one result per prompt that produced audio.
pub fn synthesize_prompts(
    task: &Task,
    prompts: &[Prompt],
    tts: &dyn TtsBackend,
    config: &CheerConfig,
) -> Vec<SynthesisResult> {
    let mut results = Vec::new();
    let mut prior_chars = 0usize;

    for (idx, prompt) in prompts.iter().enumerate() {
        debug!("{}::::{}::::{}: {}", task.id, idx, prompt.voice_alias, prompt.text);

        let text = allowance::allow(&prompt.text, task.bits, prior_chars, task.bypass, config);
        if text.is_empty() {
            debug!(task = %task.id, idx, "prompt dropped: character budget exhausted");
            continue;
        }
        prior_chars += text.chars().count();

        let Some(voice_id) = voices::resolve(&prompt.voice_alias) else {
            warn!(task = %task.id, idx, alias = %prompt.voice_alias, "unknown voice alias, skipping prompt");
            continue;
        };

        match synthesize_one(task, idx, &prompt.voice_alias, voice_id, &text, tts, config) {
            Ok(audio_path) => results.push(SynthesisResult {
                prompt: Prompt::new(prompt.voice_alias.clone(), text),
                audio_path,
                synthesized_at: Utc::now(),
            }),
            Err(e) => {
                warn!(task = %task.id, idx, alias = %prompt.voice_alias, error = %e, "prompt synthesis failed, continuing");
            }
        }
    }

    results
}

fn synthesize_one(
    task: &Task,
    idx: usize,
    alias: &str,
    voice_id: &str,
    text: &str,
    tts: &dyn TtsBackend,
    config: &CheerConfig,
) -> CheerResult<PathBuf> {
    let bytes = tts.synthesize(voice_id, text)?;
    if bytes.is_empty() {
        return Err(CheerError::Tts("provider returned no audio".to_string()));
    }
    let segment = AudioSegment::from_bytes(bytes)?;

    std::fs::create_dir_all(&config.audio_dir)?;
    let path = config.audio_dir.join(prompt_file_name(task, idx, alias));
    segment.export_wav(&path)?;

    if alias == QUIET_VOICE_ALIAS {
        audio::adjust_wav_speed(&path, QUIET_VOICE_SPEED)?;
    }
    Ok(path)
}

/// `{datestamp}_{task_id}_{idx}_{alias}.wav`, unique across concurrent and
/// historical runs.
fn prompt_file_name(task: &Task, idx: usize, alias: &str) -> String {
    format!("{}_{}_{}_{}.wav", datestamp(), task.id, idx, alias)
}

/// File name for a task's combined clip.
pub fn clip_file_name(task: &Task) -> String {
    format!("{}_{}.wav", datestamp(), task.id)
}

fn datestamp() -> String {
    Utc::now().format("%Y-%m-%d__%H_%M_%S_%3f").to_string()
}
