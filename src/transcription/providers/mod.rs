//! Speech-to-text provider integrations.

use anyhow::Result;
use async_trait::async_trait;

mod scribe_api;

pub use scribe_api::ScribeProvider;

/// Raw transcript as returned by a provider, before post-processing.
#[derive(Debug, Clone)]
pub struct ProviderTranscript {
    pub text: String,
    pub confidence: Option<f64>,
}

/// A single outbound speech-to-text call. Implementations report transport
/// and provider errors as `Err`; the adapter above converts those into the
/// fallback path.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Provider tag recorded on transcripts.
    fn name(&self) -> &'static str;

    async fn transcribe(&self, audio: &[u8], language_code: &str) -> Result<ProviderTranscript>;
}
