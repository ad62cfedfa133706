//! Hosted Gemini client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::advisory::{
    extract_advice_text, AdvisoryGenerator, AlertSnapshot, GeneratorError, GeneratorResult,
};
use crate::prompts::build_advisory_prompt;

/// Default API base for the hosted model.
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model name.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";

/// Connection settings for [`GeminiGenerator`].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    /// Per-request transport timeout.
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Full URL of the `generateContent` call.
    pub fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Advisory generator backed by the Gemini `generateContent` API.
pub struct GeminiGenerator {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiGenerator {
    pub fn new(config: GeminiConfig) -> GeneratorResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(GeneratorError::NotConfigured("empty API key".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GeneratorError::Http(e.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

#[async_trait]
impl AdvisoryGenerator for GeminiGenerator {
    async fn generate(&self, snapshot: &AlertSnapshot) -> GeneratorResult<String> {
        let prompt = build_advisory_prompt(snapshot);
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: &prompt }],
            }],
        };

        debug!(model = %self.config.model, patient_id = %snapshot.patient_id, "requesting advisory");

        let response = self
            .client
            .post(self.config.url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeneratorError::Timeout(self.config.timeout.as_millis() as u64)
                } else {
                    GeneratorError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeneratorError::Quota);
        }
        let body = response
            .text()
            .await
            .map_err(|e| GeneratorError::Http(e.to_string()))?;
        if !status.is_success() {
            return Err(GeneratorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        extract_advice_text(&body)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
