// Voice module - best-effort speech synthesis and transcription

pub mod client;
pub mod error;

pub use client::Voice;
pub use error::VoiceError;

/// Voice configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Audio backend URL
    pub endpoint: String,
    /// API key for authentication
    pub api_key: String,
    /// Speech synthesis model
    pub tts_model: String,
    /// Synthesis voice name
    pub tts_voice: String,
    /// Transcription model
    pub stt_model: String,
    /// Transcription language hint
    pub language: String,
    /// Player command for synthesized audio
    pub player: String,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

impl VoiceConfig {
    pub fn from_env() -> Result<Self, VoiceError> {
        dotenvy::dotenv().ok();

        let api_key = std::env::var("INFERENCE_API_KEY")
            .map_err(|_| VoiceError::ConfigMissing("INFERENCE_API_KEY".into()))?;

        let endpoint = std::env::var("VOICE_ENDPOINT")
            .or_else(|_| std::env::var("INFERENCE_ENDPOINT"))
            .unwrap_or_else(|_| "https://api.openai.com".to_string());

        let tts_model = std::env::var("VOICE_TTS_MODEL").unwrap_or_else(|_| "tts-1".to_string());
        let tts_voice = std::env::var("VOICE_TTS_VOICE").unwrap_or_else(|_| "nova".to_string());
        let stt_model =
            std::env::var("VOICE_STT_MODEL").unwrap_or_else(|_| "whisper-1".to_string());
        let language = std::env::var("VOICE_LANGUAGE").unwrap_or_else(|_| "en".to_string());
        let player = std::env::var("VOICE_PLAYER").unwrap_or_else(|_| "mpv --really-quiet".to_string());

        let request_timeout_secs = std::env::var("VOICE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        Ok(Self {
            endpoint,
            api_key,
            tts_model,
            tts_voice,
            stt_model,
            language,
            player,
            request_timeout_secs,
        })
    }
}
