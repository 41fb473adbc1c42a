// Voice client - HTTP speech synthesis and transcription

use super::{VoiceConfig, VoiceError};
use reqwest::multipart;
use reqwest::Client;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Maximum characters sent to the synthesis backend
const MAX_SPEECH_CHARS: usize = 4000;

/// Audio files smaller than this are treated as silence
const MIN_AUDIO_BYTES: u64 = 5000;

/// Short transcriptions made only of these words are discarded as phantom
/// phrases from background noise.
const PHANTOM_PHRASES: &[&str] = &[
    "thank you", "thank", "thanks", "you", "bye", "goodbye", "mm-hmm", "uh-huh", "um", "uh", "oh", "ah",
    "okay", "ok", "yes", "no", "hello", "hi", "the", "a", "an", "and", "or", "but", "so", "well",
];

/// Voice client for synthesis and transcription
pub struct Voice {
    config: VoiceConfig,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
}

impl Voice {
    /// Create a new Voice instance
    pub fn new(config: VoiceConfig) -> Result<Self, VoiceError> {
        debug!(
            endpoint = %config.endpoint,
            tts_model = %config.tts_model,
            stt_model = %config.stt_model,
            "initializing voice client"
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Synthesize speech for the text and play it. Long texts are truncated.
    pub async fn speak(&self, text: &str) -> Result<(), VoiceError> {
        let text: String = if text.chars().count() > MAX_SPEECH_CHARS {
            let mut truncated: String = text.chars().take(MAX_SPEECH_CHARS).collect();
            truncated.push_str("...");
            truncated
        } else {
            text.to_string()
        };

        let url = format!(
            "{}/v1/audio/speech",
            self.config.endpoint.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", &self.config.api_key))
            .json(&serde_json::json!({
                "model": self.config.tts_model,
                "voice": self.config.tts_voice,
                "input": text,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VoiceError::SynthesisFailed(body));
        }

        let audio = response.bytes().await?;
        let path = std::env::temp_dir().join(format!("commandly-speech-{}.mp3", std::process::id()));
        tokio::fs::write(&path, &audio).await?;

        info!(bytes = audio.len(), path = %path.display(), "speech synthesized");

        let result = self.play(&path).await;

        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!(error = %e, "failed to remove speech file");
        }

        result
    }

    async fn play(&self, path: &Path) -> Result<(), VoiceError> {
        let mut parts = self.config.player.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| VoiceError::PlayerFailed("empty player command".to_string()))?;

        let status = Command::new(program)
            .args(parts)
            .arg(path)
            .status()
            .await
            .map_err(|e| VoiceError::PlayerFailed(e.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            Err(VoiceError::PlayerFailed(format!(
                "player exited with {}",
                status.code().unwrap_or(-1)
            )))
        }
    }

    /// Transcribe an audio file. Returns an empty string for silence,
    /// too-short utterances, and phantom phrases.
    pub async fn transcribe(&self, path: &Path) -> Result<String, VoiceError> {
        let metadata = tokio::fs::metadata(path).await?;
        if metadata.len() < MIN_AUDIO_BYTES {
            debug!(bytes = metadata.len(), "audio file too small, treating as silence");
            return Ok(String::new());
        }

        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio.wav".to_string());

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("audio/wav")?;

        let form = multipart::Form::new()
            .text("model", self.config.stt_model.clone())
            .text("language", self.config.language.clone())
            .part("file", part);

        let url = format!(
            "{}/v1/audio/transcriptions",
            self.config.endpoint.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", &self.config.api_key))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VoiceError::TranscriptionFailed(body));
        }

        let transcription: TranscriptionResponse = response.json().await?;
        let text = filter_transcript(&transcription.text);

        if text.is_empty() {
            debug!(raw = %transcription.text, "transcription filtered out");
        } else {
            info!(text = %text, "transcribed");
        }

        Ok(text)
    }
}

/// Discard transcriptions that are too short or made only of phantom
/// phrases picked up from background noise.
fn filter_transcript(raw: &str) -> String {
    let text = raw.trim();

    if text.len() < 5 {
        return String::new();
    }

    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();

    if words.len() <= 3
        && words
            .iter()
            .all(|w| PHANTOM_PHRASES.contains(&w.trim_matches(|c: char| !c.is_alphanumeric())))
    {
        return String::new();
    }

    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_drops_short_text() {
        assert_eq!(filter_transcript("hi"), "");
        assert_eq!(filter_transcript("  ok  "), "");
    }

    #[test]
    fn test_filter_drops_phantom_phrases() {
        assert_eq!(filter_transcript("thank you."), "");
        assert_eq!(filter_transcript("okay yes"), "");
    }

    #[test]
    fn test_filter_keeps_real_commands() {
        assert_eq!(
            filter_transcript("open the calculator"),
            "open the calculator"
        );
    }
}
