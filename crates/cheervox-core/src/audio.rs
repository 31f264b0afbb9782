//! Audio segment handling: decode, gain, silence, concatenation, WAV export.
//!
//! Provider audio arrives as MP3 bytes; everything downstream works on a
//! 16-bit PCM [`AudioSegment`] and is persisted as WAV. The assembler stitches
//! one segment per surviving prompt into the combined clip for playback.

use crate::config::CheerConfig;
use crate::error::{CheerError, CheerResult};
use crate::types::SynthesisResult;
use rodio::Source;
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Voice known to be recorded quieter than the rest; boosted at assembly.
pub const QUIET_VOICE_ALIAS: &str = "dwight";
const QUIET_VOICE_BOOST_DB: f32 = 8.0;
/// Perceptual buffer between consecutive voices.
const INTER_PROMPT_SILENCE: Duration = Duration::from_millis(600);

/// Interleaved 16-bit PCM with its sample layout.
#[derive(Debug, Clone)]
pub struct AudioSegment {
    samples: Vec<i16>,
    sample_rate: u32,
    channels: u16,
}

impl AudioSegment {
    /// Decode compressed audio bytes (MP3/WAV) into PCM.
    pub fn from_bytes(bytes: Vec<u8>) -> CheerResult<Self> {
        let decoder = rodio::Decoder::new(Cursor::new(bytes))
            .map_err(|e| CheerError::Decode(e.to_string()))?;
        let sample_rate = decoder.sample_rate();
        let channels = decoder.channels();
        let samples: Vec<i16> = decoder.collect();
        if samples.is_empty() {
            return Err(CheerError::Decode("decoded to zero samples".to_string()));
        }
        Ok(Self {
            samples,
            sample_rate,
            channels,
        })
    }

    /// Load a previously exported WAV.
    pub fn from_wav_file(path: &Path) -> CheerResult<Self> {
        let reader = hound::WavReader::open(path)?;
        let spec = reader.spec();
        let samples = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<i16>, _>>()?;
        Ok(Self {
            samples,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
        })
    }

    /// A span of silence matching this segment's layout.
    pub fn silence_like(&self, duration: Duration) -> Self {
        let frames = (self.sample_rate as u128 * duration.as_millis() / 1000) as usize;
        Self {
            samples: vec![0; frames * self.channels as usize],
            sample_rate: self.sample_rate,
            channels: self.channels,
        }
    }

    /// Shift loudness by `db` decibels (negative attenuates).
    pub fn gain_db(&mut self, db: f32) {
        if db == 0.0 {
            return;
        }
        let factor = 10f32.powf(db / 20.0);
        for sample in &mut self.samples {
            *sample = (*sample as f32 * factor)
                .clamp(i16::MIN as f32, i16::MAX as f32) as i16;
        }
    }

    /// Append another segment. Layout mismatches are appended as-is with a
    /// warning; the provider emits one format so this should not happen.
    pub fn append(&mut self, other: &AudioSegment) {
        if other.sample_rate != self.sample_rate || other.channels != self.channels {
            warn!(
                "appending segment with mismatched layout ({} Hz x{} vs {} Hz x{})",
                other.sample_rate, other.channels, self.sample_rate, self.channels
            );
        }
        self.samples.extend_from_slice(&other.samples);
    }

    pub fn duration(&self) -> Duration {
        let frames = self.samples.len() as u64 / self.channels.max(1) as u64;
        Duration::from_secs_f64(frames as f64 / self.sample_rate as f64)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Write the segment as 16-bit PCM WAV.
    pub fn export_wav(&self, path: &Path) -> CheerResult<()> {
        let spec = hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec)?;
        for &sample in &self.samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        Ok(())
    }
}

/// Rewrite a WAV at a scaled frame rate, in place. A multiplier below 1.0
/// slows playback and deepens the voice; 1.0 is a no-op.
pub fn adjust_wav_speed(path: &Path, multiplier: f32) -> CheerResult<()> {
    if multiplier == 1.0 {
        return Ok(());
    }
    let reader = hound::WavReader::open(path)?;
    let mut spec = reader.spec();
    let samples = reader
        .into_samples::<i16>()
        .collect::<Result<Vec<i16>, _>>()?;
    spec.sample_rate = (spec.sample_rate as f32 * multiplier) as u32;
    let mut writer = hound::WavWriter::create(path, spec)?;
    for sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Concatenate per-prompt audio into one clip, in prompt order.
///
/// Segments after the first get the configured gain offset; any quiet-voice
/// segment gets a fixed extra boost. A short silence separates adjacent
/// segments. An empty result list yields `None`: the task is abandoned
/// without playback, which is an expected outcome rather than an error.
pub fn assemble(
    results: &[SynthesisResult],
    config: &CheerConfig,
) -> CheerResult<Option<AudioSegment>> {
    let mut combined: Option<AudioSegment> = None;

    for (idx, result) in results.iter().enumerate() {
        let mut segment = AudioSegment::from_wav_file(&result.audio_path)?;
        let mut gain = if idx > 0 { config.gain_offset_db } else { 0.0 };
        if result.prompt.voice_alias == QUIET_VOICE_ALIAS {
            gain += QUIET_VOICE_BOOST_DB;
        }
        segment.gain_db(gain);

        match combined.as_mut() {
            None => combined = Some(segment),
            Some(clip) => {
                let silence = clip.silence_like(INTER_PROMPT_SILENCE);
                clip.append(&silence);
                clip.append(&segment);
            }
        }
    }

    Ok(combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Prompt, SynthesisResult};
    use chrono::Utc;

    fn segment(samples: Vec<i16>) -> AudioSegment {
        AudioSegment {
            samples,
            sample_rate: 1000,
            channels: 1,
        }
    }

    fn write_wav(path: &Path, samples: &[i16]) {
        segment(samples.to_vec()).export_wav(path).unwrap();
    }

    fn result(path: &Path, alias: &str) -> SynthesisResult {
        SynthesisResult {
            prompt: Prompt::new(alias, "text"),
            audio_path: path.to_path_buf(),
            synthesized_at: Utc::now(),
        }
    }

    #[test]
    fn gain_scales_samples() {
        let mut seg = segment(vec![1000, -1000]);
        seg.gain_db(6.0);
        // +6 dB is very close to doubling
        assert!((seg.samples[0] - 1995).abs() <= 5);
        assert!((seg.samples[1] + 1995).abs() <= 5);
    }

    #[test]
    fn gain_clamps_instead_of_wrapping() {
        let mut seg = segment(vec![i16::MAX, i16::MIN]);
        seg.gain_db(20.0);
        assert_eq!(seg.samples[0], i16::MAX);
        assert_eq!(seg.samples[1], i16::MIN);
    }

    #[test]
    fn silence_matches_layout_and_duration() {
        let seg = segment(vec![0; 10]);
        let silence = seg.silence_like(Duration::from_millis(600));
        assert_eq!(silence.samples.len(), 600); // 1000 Hz mono
        assert!(silence.samples.iter().all(|&s| s == 0));
    }

    #[test]
    fn wav_round_trip_preserves_samples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seg.wav");
        let seg = segment(vec![1, -2, 3, -4]);
        seg.export_wav(&path).unwrap();
        let loaded = AudioSegment::from_wav_file(&path).unwrap();
        assert_eq!(loaded.samples, vec![1, -2, 3, -4]);
        assert_eq!(loaded.sample_rate, 1000);
    }

    #[test]
    fn speed_adjust_rewrites_frame_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voice.wav");
        write_wav(&path, &[5; 100]);

        adjust_wav_speed(&path, 0.95).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 950);
        assert_eq!(reader.duration(), 100); // samples untouched
    }

    #[test]
    fn assemble_inserts_silence_between_segments() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.wav");
        let b = dir.path().join("b.wav");
        write_wav(&a, &[100; 50]);
        write_wav(&b, &[100; 50]);

        let config = CheerConfig::default();
        let results = [result(&a, "morgan_freeman"), result(&b, "gandalf")];
        let clip = assemble(&results, &config).unwrap().expect("clip");
        // 50 + 600 (silence at 1000 Hz) + 50
        assert_eq!(clip.samples.len(), 700);
        assert!(clip.samples[100..600].iter().all(|&s| s == 0));
    }

    #[test]
    fn assemble_boosts_the_quiet_voice() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.wav");
        write_wav(&a, &[1000; 10]);

        let config = CheerConfig::default();
        let clip = assemble(&[result(&a, QUIET_VOICE_ALIAS)], &config)
            .unwrap()
            .expect("clip");
        // +8 dB ≈ x2.51
        assert!(clip.samples[0] > 2400 && clip.samples[0] < 2600);
    }

    #[test]
    fn assemble_applies_offset_after_the_first_segment() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.wav");
        let b = dir.path().join("b.wav");
        write_wav(&a, &[1000; 10]);
        write_wav(&b, &[1000; 10]);

        let mut config = CheerConfig::default();
        config.gain_offset_db = 6.0;
        let results = [result(&a, "gandalf"), result(&b, "gandalf")];
        let clip = assemble(&results, &config).unwrap().expect("clip");
        assert_eq!(clip.samples[0], 1000); // first segment untouched
        let second = clip.samples[10 + 600];
        assert!(second > 1900 && second < 2100);
    }

    #[test]
    fn assemble_of_nothing_is_none() {
        let config = CheerConfig::default();
        assert!(assemble(&[], &config).unwrap().is_none());
    }
}
