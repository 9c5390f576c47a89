//! Transcription adapter.
//!
//! Wraps one outbound speech-to-text call with language mapping, Hinglish
//! post-processing and a deterministic fallback. The adapter never fails:
//! every provider error collapses into a synthetic fallback transcript
//! tagged `provider = "fallback"`.

use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

pub mod fallback;
pub mod providers;
pub mod transliterate;

pub use providers::{ProviderTranscript, ScribeProvider, SpeechToText};

/// Language hint for a transcription request.
///
/// `Hinglish` (code-mixed Hindi/English) has no native provider model; it
/// maps to the provider's Hindi model and the Devanagari output is
/// transliterated back to Latin script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Hinglish,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::English => "english",
            Self::Hinglish => "hinglish",
        }
    }

    /// Language code sent to the provider. Not a passthrough: Hinglish
    /// selects the Hindi model.
    pub fn provider_code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Hinglish => "hi",
        }
    }

    /// Tolerant parse; unrecognized hints degrade to Hinglish, the mode
    /// the capture extension records in.
    pub fn parse_lossy(s: &str) -> Self {
        match s {
            "en" | "english" => Self::English,
            _ => Self::Hinglish,
        }
    }
}

/// Result of one adapter call. Always well-formed, even on provider
/// failure.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptOutcome {
    pub text: String,
    pub confidence: f64,
    pub processing_time_ms: u64,
    pub provider: String,
}

impl TranscriptOutcome {
    pub fn is_fallback(&self) -> bool {
        self.provider == fallback::PROVIDER
    }
}

/// Transcription adapter: provider call + post-processing + fallback.
pub struct Transcriber {
    provider: Box<dyn SpeechToText>,
    fallback_confidence: f64,
}

impl Transcriber {
    pub fn new(provider: Box<dyn SpeechToText>, fallback_confidence: f64) -> Self {
        Self {
            provider,
            fallback_confidence,
        }
    }

    /// Transcribe decoded audio bytes. Callers must reject empty payloads
    /// before reaching the adapter; that is a client error, not a
    /// provider failure.
    pub async fn transcribe(&self, audio: &[u8], language: Language) -> TranscriptOutcome {
        let started = Instant::now();

        match self.provider.transcribe(audio, language.provider_code()).await {
            Ok(raw) => {
                let text = match language {
                    Language::Hinglish => transliterate::to_latin(raw.text.trim()),
                    Language::English => raw.text.trim().to_string(),
                };

                info!(
                    "Transcribed {} bytes with {}: {} chars",
                    audio.len(),
                    self.provider.name(),
                    text.len()
                );

                TranscriptOutcome {
                    text,
                    confidence: raw.confidence.unwrap_or(0.9),
                    processing_time_ms: started.elapsed().as_millis() as u64,
                    provider: self.provider.name().to_string(),
                }
            }
            Err(e) => {
                warn!(
                    "Transcription provider {} failed, using fallback: {:#}",
                    self.provider.name(),
                    e
                );

                TranscriptOutcome {
                    text: fallback::pick(language),
                    confidence: self.fallback_confidence,
                    processing_time_ms: started.elapsed().as_millis() as u64,
                    provider: fallback::PROVIDER.to_string(),
                }
            }
        }
    }
}
