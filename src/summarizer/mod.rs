//! Summarization adapter.
//!
//! Sends the transcript to a chat-completions language model with a prompt
//! demanding a strict six-field JSON object, then defensively coerces the
//! response. Any transport failure or unparseable reply falls back to the
//! keyword heuristic in [`heuristic`] — like the transcription adapter,
//! this one never fails.

use anyhow::{Context, Result};
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, warn};

pub mod heuristic;

/// Provider tag recorded when the heuristic fallback produced the summary.
pub const HEURISTIC_PROVIDER: &str = "heuristic";

const DEFAULT_SUMMARY: &str = "No summary available";

const SYSTEM_PROMPT: &str = "You are an expert meeting analyst. Generate concise, actionable \
     meeting summaries in the exact JSON format requested. Be precise and professional.";

/// Structured summary of one meeting.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MeetingSummary {
    pub summary: String,
    pub key_points: Vec<String>,
    pub action_items: Vec<String>,
    pub decisions: Vec<String>,
    pub next_steps: Vec<String>,
    pub participants: Vec<String>,
}

/// Result of one adapter call, including which path produced it.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryOutcome {
    pub summary: MeetingSummary,
    pub provider: String,
    pub processing_time_ms: u64,
}

/// One outbound chat-completions call.
#[async_trait]
pub trait ChatModel: Send + Sync {
    fn name(&self) -> &'static str;

    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// DeepSeek-compatible chat-completions client.
pub struct DeepSeekClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl DeepSeekClient {
    pub fn new(
        api_key: Option<String>,
        endpoint: Option<String>,
        model: Option<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::new();
        let endpoint =
            endpoint.unwrap_or_else(|| "https://api.deepseek.com/chat/completions".to_string());
        let model = model.unwrap_or_else(|| "deepseek-chat".to_string());

        let api_key = match api_key {
            Some(key) if !key.is_empty() => key,
            _ => {
                warn!("No summarizer API key configured; summaries will use the heuristic fallback");
                String::new()
            }
        };

        info!("Initialized summarizer with endpoint: {}", endpoint);

        Ok(Self {
            client,
            endpoint,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl ChatModel for DeepSeekClient {
    fn name(&self) -> &'static str {
        "deepseek"
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            // Low temperature: we want the same transcript to keep
            // producing the same summary shape.
            temperature: 0.1,
            max_tokens: 2000,
            stream: false,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to send request to summarizer API")?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            anyhow::bail!(
                "Summarizer API request failed with status {}: {}",
                status,
                response_text
            );
        }

        let parsed: ChatResponse =
            serde_json::from_str(&response_text).context("Failed to parse summarizer response")?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .context("Summarizer response contained no choices")
    }
}

/// Summarization adapter: model call + strict parsing + heuristic fallback.
pub struct Summarizer {
    model: Box<dyn ChatModel>,
    fence_regex: Regex,
}

impl Summarizer {
    pub fn new(model: Box<dyn ChatModel>) -> Result<Self> {
        // Models often wrap the JSON in markdown fences despite being told
        // not to.
        let fence_regex = Regex::new(r"```(?:json)?\n?")?;

        Ok(Self { model, fence_regex })
    }

    pub async fn summarize(
        &self,
        transcript: &str,
        title: &str,
        participants: &[String],
    ) -> SummaryOutcome {
        let started = Instant::now();
        let prompt = build_prompt(transcript, title, participants);

        let attempt = match self.model.complete(SYSTEM_PROMPT, &prompt).await {
            Ok(content) => self.parse_response(&content),
            Err(e) => Err(e),
        };

        match attempt {
            Ok(summary) => {
                info!(
                    "Summarized \"{}\" with {} in {}ms",
                    title,
                    self.model.name(),
                    started.elapsed().as_millis()
                );

                SummaryOutcome {
                    summary,
                    provider: self.model.name().to_string(),
                    processing_time_ms: started.elapsed().as_millis() as u64,
                }
            }
            Err(e) => {
                warn!(
                    "Summarizer {} failed, using heuristic extraction: {:#}",
                    self.model.name(),
                    e
                );

                SummaryOutcome {
                    summary: heuristic::extract(transcript, title, participants),
                    provider: HEURISTIC_PROVIDER.to_string(),
                    processing_time_ms: started.elapsed().as_millis() as u64,
                }
            }
        }
    }

    /// Strip fences, parse, and coerce into the fixed shape. List fields
    /// that are not arrays become empty; a missing summary gets a fixed
    /// default.
    fn parse_response(&self, content: &str) -> Result<MeetingSummary> {
        let cleaned = self.fence_regex.replace_all(content, "");
        let value: Value = serde_json::from_str(cleaned.trim())
            .context("Summarizer reply was not valid JSON")?;

        debug!("Parsed summarizer reply: {}", value);

        Ok(MeetingSummary {
            summary: value
                .get("summary")
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_SUMMARY)
                .to_string(),
            key_points: coerce_list(value.get("keyPoints")),
            action_items: coerce_list(value.get("actionItems")),
            decisions: coerce_list(value.get("decisions")),
            next_steps: coerce_list(value.get("nextSteps")),
            participants: coerce_list(value.get("participants")),
        })
    }
}

fn coerce_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn build_prompt(transcript: &str, title: &str, participants: &[String]) -> String {
    let participant_list = if participants.is_empty() {
        "Not specified".to_string()
    } else {
        participants.join(", ")
    };

    format!(
        r#"Analyze this meeting transcript and generate a comprehensive summary in JSON format.

MEETING DETAILS:
- Title: {title}
- Participants: {participant_list}

TRANSCRIPT:
{transcript}

Generate a JSON response with this exact structure:
{{
  "summary": "A concise 2-3 sentence summary of the meeting",
  "keyPoints": ["Point 1", "Point 2", "Point 3"],
  "actionItems": ["Action 1", "Action 2"],
  "decisions": ["Decision 1", "Decision 2"],
  "nextSteps": ["Step 1", "Step 2"],
  "participants": ["Name 1", "Name 2"]
}}

REQUIREMENTS:
- Summary: 2-3 sentences maximum, capture the main purpose and outcomes
- Key Points: 3-5 most important discussion points
- Action Items: Specific tasks assigned with who/what/when if mentioned
- Decisions: Clear decisions made during the meeting
- Next Steps: Follow-up actions or future meetings planned
- Participants: Extract participant names from the transcript

Return ONLY the JSON object, no additional text."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedModel {
        reply: &'static str,
    }

    #[async_trait]
    impl ChatModel for FixedModel {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
            Ok(self.reply.to_string())
        }
    }

    struct FailingModel;

    #[async_trait]
    impl ChatModel for FailingModel {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
            anyhow::bail!("upstream 503")
        }
    }

    fn summarizer(model: Box<dyn ChatModel>) -> Summarizer {
        Summarizer::new(model).unwrap()
    }

    #[tokio::test]
    async fn test_clean_json_reply() {
        let s = summarizer(Box::new(FixedModel {
            reply: r#"{"summary":"We planned.","keyPoints":["a","b"],"actionItems":["x"],"decisions":[],"nextSteps":["y"],"participants":["Sam"]}"#,
        }));

        let outcome = s.summarize("transcript", "Planning", &[]).await;
        assert_eq!(outcome.provider, "fixed");
        assert_eq!(outcome.summary.summary, "We planned.");
        assert_eq!(outcome.summary.key_points, vec!["a", "b"]);
        assert_eq!(outcome.summary.next_steps, vec!["y"]);
    }

    #[tokio::test]
    async fn test_fenced_reply_is_stripped() {
        let s = summarizer(Box::new(FixedModel {
            reply: "```json\n{\"summary\":\"Fenced.\",\"keyPoints\":[\"a\"],\"actionItems\":[],\"decisions\":[],\"nextSteps\":[],\"participants\":[]}\n```",
        }));

        let outcome = s.summarize("transcript", "T", &[]).await;
        assert_eq!(outcome.summary.summary, "Fenced.");
        assert_eq!(outcome.summary.key_points, vec!["a"]);
    }

    #[tokio::test]
    async fn test_malformed_fields_coerced() {
        // keyPoints is a string, actionItems missing, summary absent
        let s = summarizer(Box::new(FixedModel {
            reply: r#"{"keyPoints":"not a list","decisions":[1,2],"nextSteps":[],"participants":[]}"#,
        }));

        let outcome = s.summarize("transcript", "T", &[]).await;
        assert_eq!(outcome.provider, "fixed");
        assert_eq!(outcome.summary.summary, DEFAULT_SUMMARY);
        assert!(outcome.summary.key_points.is_empty());
        assert!(outcome.summary.action_items.is_empty());
        // Non-string array entries are dropped, not stringified
        assert!(outcome.summary.decisions.is_empty());
    }

    #[tokio::test]
    async fn test_non_json_reply_falls_back_to_heuristic() {
        let s = summarizer(Box::new(FixedModel {
            reply: "Sorry, I cannot help with that.",
        }));

        let outcome = s
            .summarize("We agreed to ship the beta next week.", "Release", &[])
            .await;
        assert_eq!(outcome.provider, HEURISTIC_PROVIDER);
        assert!(!outcome.summary.key_points.is_empty());
    }

    #[tokio::test]
    async fn test_model_error_never_raises() {
        let s = summarizer(Box::new(FailingModel));

        let outcome = s.summarize("", "Empty", &[]).await;
        assert_eq!(outcome.provider, HEURISTIC_PROVIDER);
        assert!(!outcome.summary.summary.is_empty());
        assert!(!outcome.summary.key_points.is_empty());
    }

    #[test]
    fn test_prompt_includes_metadata() {
        let prompt = build_prompt("words", "Sprint Planning", &["Sam".to_string()]);
        assert!(prompt.contains("Sprint Planning"));
        assert!(prompt.contains("Sam"));
        assert!(prompt.contains("words"));
    }
}
