use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use super::{ProviderTranscript, SpeechToText};

#[derive(Debug, Deserialize)]
struct ScribeResponse {
    text: String,
    #[serde(default)]
    language_probability: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    detail: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// ElevenLabs-style scribe speech-to-text API.
pub struct ScribeProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl ScribeProvider {
    pub fn new(
        api_key: Option<String>,
        endpoint: Option<String>,
        model: Option<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::new();
        let endpoint = endpoint
            .unwrap_or_else(|| "https://api.elevenlabs.io/v1/speech-to-text".to_string());
        let model = model.unwrap_or_else(|| "scribe_v1".to_string());

        let api_key = match api_key {
            Some(key) if !key.is_empty() => key,
            _ => {
                warn!("No transcription API key configured; provider calls will fail over to the fallback transcript");
                String::new()
            }
        };

        info!("Initialized scribe provider with endpoint: {}", endpoint);

        Ok(Self {
            client,
            endpoint,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl SpeechToText for ScribeProvider {
    fn name(&self) -> &'static str {
        "scribe"
    }

    async fn transcribe(&self, audio: &[u8], language_code: &str) -> Result<ProviderTranscript> {
        info!(
            "Transcribing {} bytes via scribe API (language: {})",
            audio.len(),
            language_code
        );

        let part = reqwest::multipart::Part::bytes(audio.to_vec())
            .file_name("recording.wav")
            .mime_str("audio/wav")
            .context("Failed to build audio part")?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model_id", self.model.clone())
            .text("language_code", language_code.to_string());

        let response = self
            .client
            .post(&self.endpoint)
            .header("xi-api-key", &self.api_key)
            .multipart(form)
            .send()
            .await
            .context("Failed to send request to scribe API")?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            error!(
                "Scribe API request failed with status {}: {}",
                status, response_text
            );

            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&response_text) {
                return Err(anyhow::anyhow!(
                    "Scribe API error: {} (status: {:?})",
                    error_response.detail.message,
                    error_response.detail.status
                ));
            }

            return Err(anyhow::anyhow!(
                "Scribe API request failed with status {}: {}",
                status,
                response_text
            ));
        }

        let parsed: ScribeResponse =
            serde_json::from_str(&response_text).context("Failed to parse scribe response")?;

        let text = parsed.text.trim().to_string();
        info!("Transcription complete: {} chars", text.len());
        debug!("Raw transcription: {}", text);

        Ok(ProviderTranscript {
            text,
            confidence: parsed.language_probability,
        })
    }
}
