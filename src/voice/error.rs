// Error types for Voice module

use thiserror::Error;

/// Voice errors. All best-effort: callers log and continue.
#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("Configuration missing: {0}")]
    ConfigMissing(String),

    #[error("Speech synthesis failed: {0}")]
    SynthesisFailed(String),

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("Player failed: {0}")]
    PlayerFailed(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
