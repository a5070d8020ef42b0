use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::{config::GeminiConfig, error::RoastError};

/// Substituted whenever generation fails or its answer cannot be read.
pub const FALLBACK_ROAST: &str =
    "Bhai, tere taste itna bekar hai ki AI bhi speechless ho gaya! 😂";

/// A text-generation backend. Returns the raw, loosely typed answer.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Value, RoastError>;
}

/// Outcome of reading plain text out of a generation answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Recognized(String),
    Unrecognized(Value),
}

type ShapeMatcher = fn(&Value) -> Option<&str>;

fn direct_text(v: &Value) -> Option<&str> {
    v.get("text")?.as_str()
}

fn response_text(v: &Value) -> Option<&str> {
    let text = v.get("response")?.get("text")?;
    text.as_str().or_else(|| text.get("text")?.as_str())
}

fn candidate_text(v: &Value) -> Option<&str> {
    v.get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
}

/// Tried in order; the first non-blank match wins.
pub const SHAPES: [(&str, ShapeMatcher); 3] = [
    ("text", direct_text),
    ("response.text", response_text),
    ("candidates[0].content.parts[0].text", candidate_text),
];

pub fn extract_text(raw: Value) -> Extraction {
    for (shape, matcher) in SHAPES {
        if let Some(text) = matcher(&raw).filter(|t| !t.trim().is_empty()) {
            debug!(shape, "Recognized generation response");
            return Extraction::Recognized(text.to_string());
        }
    }
    Extraction::Unrecognized(raw)
}

/// Asks `generator` for a roast; never fails.
///
/// Returns the text and whether [`FALLBACK_ROAST`] had to be substituted.
pub async fn generate_roast(generator: &dyn TextGenerator, prompt: &str) -> (String, bool) {
    let degraded = match generator.generate(prompt).await {
        Ok(raw) => match extract_text(raw) {
            Extraction::Recognized(text) => return (text, false),
            Extraction::Unrecognized(raw) => RoastError::GenerationDegraded(format!(
                "unrecognized response shape: {}",
                truncate(&raw.to_string(), 200)
            )),
        },
        Err(e) => e,
    };

    warn!("{}", degraded);
    (FALLBACK_ROAST.to_string(), true)
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Google Gemini `generateContent` client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(client: Client, config: &GeminiConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<Value, RoastError> {
        let url = format!("{}/models/{}:generateContent", self.api_url, self.model);
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }]
        });

        let res = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| RoastError::GenerationDegraded(e.to_string()))?;

        res.json::<Value>()
            .await
            .map_err(|e| RoastError::GenerationDegraded(e.to_string()))
    }
}
