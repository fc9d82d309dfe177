//! Hosted summarization through the Hugging Face Inference API

use super::traits::{LengthBounds, Summarizer};
use crate::config::SummarizerSettings;
use crate::network::{accept_json, HttpClient, HttpRequest};
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Summaries(Vec<SummaryText>),
    Error { error: String },
}

#[derive(Debug, Deserialize)]
struct SummaryText {
    summary_text: String,
}

/// Summarization model served by the Inference API
pub struct HuggingFace {
    client: HttpClient,
    url: String,
    token: Option<String>,
    timeout: Duration,
}

impl HuggingFace {
    pub fn new(client: HttpClient, settings: &SummarizerSettings) -> Self {
        Self {
            client,
            url: format!(
                "{}/{}",
                settings.endpoint.trim_end_matches('/'),
                settings.model.trim_start_matches('/')
            ),
            token: settings.api_token.clone(),
            timeout: Duration::from_secs_f64(settings.timeout),
        }
    }

    fn request(&self, text: &str, bounds: LengthBounds) -> HttpRequest {
        let mut request = HttpRequest::post(&self.url)
            .header("Accept", accept_json())
            .timeout(self.timeout)
            .json(json!({
                "inputs": text,
                "parameters": {
                    "min_length": bounds.min_length,
                    "max_length": bounds.max_length,
                    "do_sample": false,
                },
                "options": { "wait_for_model": true },
            }));
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        request
    }
}

#[async_trait]
impl Summarizer for HuggingFace {
    fn name(&self) -> &str {
        "huggingface"
    }

    async fn summarize(&self, text: &str, bounds: LengthBounds) -> Result<String> {
        let response = self.client.execute(self.request(text, bounds)).await?;

        let parsed: InferenceResponse = response
            .json()
            .map_err(|e| anyhow!("unexpected inference response (status {}): {}", response.status, e))?;

        match parsed {
            InferenceResponse::Error { error } => {
                bail!("inference API error (status {}): {}", response.status, error)
            }
            InferenceResponse::Summaries(_) if !response.is_success() => {
                bail!("inference API returned status {}", response.status)
            }
            InferenceResponse::Summaries(summaries) => summaries
                .into_iter()
                .next()
                .map(|s| s.summary_text.trim().to_string())
                .ok_or_else(|| anyhow!("inference API returned no summary")),
        }
    }
}
