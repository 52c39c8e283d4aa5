//! Gemini `generateContent` provider.
//!
//! Sends one prompt per site with `responseMimeType = application/json` and
//! a response schema matching [`parse_assessment`]'s wire shape, then
//! validates the returned text.
//!
//! Requires `GEMINI_API_KEY` (or `API_KEY`) in the environment.
//!
//! Retry strategy:
//! - HTTP 429 and 5xx → retry with exponential backoff (1s, 2s, 4s, …, capped at 32s)
//! - other 4xx → fail immediately
//! - network errors → retry
//!
//! A malformed model response is not retried; the caller re-submits.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use rankmaster_core::models::Assessment;
use rankmaster_core::{AnalysisProvider, SiteKey};

use super::parse_assessment;
use crate::config::ProviderConfig;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    max_retries: u32,
}

impl GeminiProvider {
    /// # Errors
    ///
    /// Fails if neither `GEMINI_API_KEY` nor `API_KEY` is set, or the HTTP
    /// client cannot be built.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .map_err(|_| anyhow::anyhow!("GEMINI_API_KEY environment variable not set"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            max_retries: config.max_retries,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl AnalysisProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn fetch(&self, key: &SiteKey) -> Result<Assessment> {
        let body = request_body(key);
        let url = self.endpoint();
        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tracing::debug!(attempt, ?delay, "retrying Gemini request");
                tokio::time::sleep(delay).await;
            }

            let resp = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&body)
                .send()
                .await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let json: Value = response
                            .json()
                            .await
                            .context("Failed to parse Gemini API response")?;
                        let text = response_text(&json)?;
                        return parse_assessment(text);
                    }

                    let body_text = response.text().await.unwrap_or_default();
                    if status.as_u16() == 429 || status.is_server_error() {
                        tracing::warn!(%status, attempt, "Gemini API transient error");
                        last_err = Some(anyhow::anyhow!(
                            "Gemini API error {}: {}",
                            status,
                            body_text
                        ));
                        continue;
                    }

                    bail!("Gemini API error {}: {}", status, body_text);
                }
                Err(e) => {
                    tracing::warn!(error = %e, attempt, "Gemini request failed");
                    last_err = Some(e.into());
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("Analysis failed after retries")))
    }
}

fn prompt(key: &SiteKey) -> String {
    format!(
        "Analyze the digital presence of \"{}\" for SEO (Search Engine Optimization), \
         AEO (Answer Engine Optimization), and Google Ranking.\n\
         AEO specifically focuses on how well the site answers direct questions and its \
         visibility in AI-driven answer engines like Google Search Generative Experience, \
         Perplexity, and ChatGPT.\n\
         Provide scores from 0-100.\n\
         Output the analysis in structured JSON.",
        key
    )
}

fn section_schema() -> Value {
    let list = json!({ "type": "ARRAY", "items": { "type": "STRING" } });
    json!({
        "type": "OBJECT",
        "properties": {
            "score": { "type": "NUMBER" },
            "advantages": list.clone(),
            "disadvantages": list.clone(),
            "recommendations": list,
        },
        "required": ["score", "advantages", "disadvantages", "recommendations"]
    })
}

fn request_body(key: &SiteKey) -> Value {
    json!({
        "contents": [{
            "parts": [{ "text": prompt(key) }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "siteName": { "type": "STRING" },
                    "url": { "type": "STRING" },
                    "overallScore": { "type": "NUMBER" },
                    "summary": { "type": "STRING" },
                    "seo": section_schema(),
                    "aeo": section_schema(),
                    "googleRanking": section_schema(),
                },
                "required": ["siteName", "url", "overallScore", "summary", "seo", "aeo", "googleRanking"]
            }
        }
    })
}

/// Extract the generated text from a `generateContent` response.
fn response_text(json: &Value) -> Result<&str> {
    if let Some(reason) = json
        .pointer("/promptFeedback/blockReason")
        .and_then(|r| r.as_str())
    {
        bail!("Gemini blocked the prompt: {}", reason);
    }
    json.pointer("/candidates/0/content/parts/0/text")
        .and_then(|t| t.as_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid Gemini response: missing candidate text"))
}
