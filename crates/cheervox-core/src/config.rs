//! Pipeline configuration loaded from `settings.txt` and the environment.
//!
//! The original deployment keeps tunables in a flat `OPTION=VALUE` settings
//! file next to the binary so they can be edited mid-stream; values already
//! present in the process environment win. The loaded [`CheerConfig`] is an
//! immutable snapshot passed explicitly into the filter, allowance, and
//! synthesis stages. The processing loop reloads it at the top of each task,
//! so edits apply at task boundaries, never mid-task.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Immutable configuration snapshot for one task's processing.
///
/// | Key | Default | Description |
/// |-----|---------|-------------|
/// | BIT_THRESHOLD | 100 | Minimum bits for a cheer to be read. |
/// | INDICATOR | 11io | Marker token required in the message. |
/// | MAX_CHARS | 200 | Base character cap per donation. |
/// | EXTRA_CHARS_PER_BIT | 2 | Extra characters granted per bit above threshold. |
/// | AUDIO_INCREASE | 0.0 | Gain offset (dB) applied to segments after the first. |
/// | PLAYBACK_HARD_CAP_SECS | 60 | Upper bound on playback time per clip. |
/// | FREE_PASS_USERS | bemoor | Comma list of senders exempt from bits/quota. |
#[derive(Debug, Clone)]
pub struct CheerConfig {
    pub bit_threshold: i64,
    pub indicator: String,
    pub base_char_cap: i64,
    pub extra_chars_per_bit: i64,
    pub gain_offset_db: f32,
    pub playback_hard_cap: Duration,
    pub free_pass_users: Vec<String>,
    pub audio_dir: PathBuf,
    pub audit_log_path: PathBuf,
    pub blacklist_path: PathBuf,
}

impl Default for CheerConfig {
    fn default() -> Self {
        Self {
            bit_threshold: 100,
            indicator: "11io".to_string(),
            base_char_cap: 200,
            extra_chars_per_bit: 2,
            gain_offset_db: 0.0,
            playback_hard_cap: Duration::from_secs(60),
            free_pass_users: vec!["bemoor".to_string()],
            audio_dir: PathBuf::from("audio"),
            audit_log_path: PathBuf::from("data.txt"),
            blacklist_path: PathBuf::from("user_blacklist.txt"),
        }
    }
}

impl CheerConfig {
    /// Load from `settings.txt` (or `SETTINGS_PATH`) merged under the
    /// process environment. Unset or invalid values fall back to defaults.
    pub fn load() -> Self {
        let settings_path =
            std::env::var("SETTINGS_PATH").unwrap_or_else(|_| "settings.txt".to_string());
        Self::load_from_path(Path::new(&settings_path))
    }

    /// Load from a specific settings file. A missing or unreadable file is
    /// not an error; the environment and defaults still apply.
    pub fn load_from_path(path: &Path) -> Self {
        let file_settings = read_settings_file(path);
        let get = |key: &str| -> Option<String> {
            std::env::var(key)
                .ok()
                .or_else(|| file_settings.get(key).cloned())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let defaults = Self::default();
        Self {
            bit_threshold: parse_or(get("BIT_THRESHOLD"), defaults.bit_threshold),
            indicator: get("INDICATOR").unwrap_or(defaults.indicator),
            base_char_cap: parse_or(get("MAX_CHARS"), defaults.base_char_cap),
            extra_chars_per_bit: parse_or(get("EXTRA_CHARS_PER_BIT"), defaults.extra_chars_per_bit),
            gain_offset_db: parse_or(get("AUDIO_INCREASE"), defaults.gain_offset_db),
            playback_hard_cap: Duration::from_secs(parse_or(
                get("PLAYBACK_HARD_CAP_SECS"),
                defaults.playback_hard_cap.as_secs(),
            )),
            free_pass_users: get("FREE_PASS_USERS")
                .map(|s| {
                    s.split(',')
                        .map(|u| u.trim().to_lowercase())
                        .filter(|u| !u.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.free_pass_users),
            audio_dir: get("AUDIO_DIR").map(PathBuf::from).unwrap_or(defaults.audio_dir),
            audit_log_path: get("AUDIT_LOG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.audit_log_path),
            blacklist_path: get("BLACKLIST_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.blacklist_path),
        }
    }

    /// Whether the sender (lowercased) may cheer for any bit amount and
    /// bypass the character quota.
    pub fn is_free_pass(&self, sender: &str) -> bool {
        self.free_pass_users.iter().any(|u| u == sender)
    }
}

fn read_settings_file(path: &Path) -> HashMap<String, String> {
    let mut settings = HashMap::new();
    let Ok(content) = std::fs::read_to_string(path) else {
        return settings;
    };
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((option, value)) = line.split_once('=') {
            settings.insert(option.trim().to_string(), value.trim().to_string());
        }
    }
    settings
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_sane() {
        let config = CheerConfig::default();
        assert_eq!(config.bit_threshold, 100);
        assert_eq!(config.indicator, "11io");
        assert_eq!(config.playback_hard_cap, Duration::from_secs(60));
        assert!(config.is_free_pass("bemoor"));
        assert!(!config.is_free_pass("alice"));
    }

    #[test]
    fn settings_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "BIT_THRESHOLD=250").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "INDICATOR=22io").unwrap();
        writeln!(file, "FREE_PASS_USERS=alice, Bob").unwrap();

        let config = CheerConfig::load_from_path(file.path());
        assert_eq!(config.bit_threshold, 250);
        assert_eq!(config.indicator, "22io");
        assert!(config.is_free_pass("alice"));
        assert!(config.is_free_pass("bob"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = CheerConfig::load_from_path(Path::new("definitely/not/here.txt"));
        assert_eq!(config.base_char_cap, 200);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "BIT_THRESHOLD=lots").unwrap();
        let config = CheerConfig::load_from_path(file.path());
        assert_eq!(config.bit_threshold, 100);
    }
}
