//! Advisory generator contract, response parsing, and a mock generator.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Advisory text substituted whenever the generator cannot produce usable output.
pub const FALLBACK_ADVICE: &str = "AI advice unavailable (Gemini error)";

/// Generator errors.
///
/// All of these are recoverable from the caller's point of view: the
/// submission pipeline swaps in [`FALLBACK_ADVICE`] and carries on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeneratorError {
    #[error("HTTP transport error: {0}")]
    Http(String),

    #[error("Generator returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Generator quota exhausted")]
    Quota,

    #[error("Malformed generator response: {0}")]
    MalformedResponse(String),

    #[error("Generator returned no advisory text")]
    Empty,

    #[error("Generator timed out after {0} ms")]
    Timeout(u64),

    #[error("Generator not configured: {0}")]
    NotConfigured(String),
}

pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// The alert fields sent to the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertSnapshot {
    pub patient_id: String,
    pub alert_type: String,
    pub heart_rate: Option<i64>,
    pub blood_pressure: Option<String>,
    pub mood_score: Option<i64>,
}

/// Something that can turn an alert snapshot into caregiver guidance.
#[async_trait]
pub trait AdvisoryGenerator: Send + Sync {
    /// Produce advisory text for one alert.
    async fn generate(&self, snapshot: &AlertSnapshot) -> GeneratorResult<String>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}

/// Pull the advisory text out of a `generateContent` response body.
///
/// Text parts of the first candidate are concatenated and trimmed. Leading
/// or trailing noise around the JSON object is tolerated.
pub fn extract_advice_text(body: &str) -> GeneratorResult<String> {
    let start = body
        .find('{')
        .ok_or_else(|| GeneratorError::MalformedResponse("No JSON object found in response".into()))?;
    let end = body
        .rfind('}')
        .ok_or_else(|| GeneratorError::MalformedResponse("No closing brace found in response".into()))?;
    if end < start {
        return Err(GeneratorError::MalformedResponse("Unbalanced JSON object".into()));
    }

    let value: serde_json::Value = serde_json::from_str(&body[start..=end])
        .map_err(|e| GeneratorError::MalformedResponse(e.to_string()))?;

    let parts = value
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .ok_or_else(|| GeneratorError::MalformedResponse("Missing candidates[0].content.parts".into()))?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .collect::<Vec<_>>()
        .join("");

    let text = text.trim();
    if text.is_empty() {
        return Err(GeneratorError::Empty);
    }
    Ok(text.to_string())
}

/// What a [`MockGenerator`] does when called.
#[derive(Debug, Clone)]
enum MockBehavior {
    Reply(String),
    Fail(GeneratorError),
}

/// Deterministic generator for tests and offline runs.
#[derive(Debug)]
pub struct MockGenerator {
    behavior: MockBehavior,
    calls: AtomicUsize,
}

impl MockGenerator {
    /// Always reply with the given advice.
    pub fn replying(advice: impl Into<String>) -> Self {
        Self {
            behavior: MockBehavior::Reply(advice.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fail with the given error.
    pub fn failing(error: GeneratorError) -> Self {
        Self {
            behavior: MockBehavior::Fail(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `generate` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AdvisoryGenerator for MockGenerator {
    async fn generate(&self, snapshot: &AlertSnapshot) -> GeneratorResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            MockBehavior::Reply(advice) => Ok(advice.replace("{patient_id}", &snapshot.patient_id)),
            MockBehavior::Fail(error) => Err(error.clone()),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> AlertSnapshot {
        AlertSnapshot {
            patient_id: "p-1".into(),
            alert_type: "emergency".into(),
            heart_rate: None,
            blood_pressure: None,
            mood_score: None,
        }
    }

    #[test]
    fn test_extract_advice_text() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"  Check on the patient now.\n"}],"role":"model"}}]}"#;
        assert_eq!(extract_advice_text(body).unwrap(), "Check on the patient now.");
    }

    #[test]
    fn test_extract_joins_parts() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"Call 911. "},{"text":"Stay with them."}]}}]}"#;
        assert_eq!(extract_advice_text(body).unwrap(), "Call 911. Stay with them.");
    }

    #[test]
    fn test_extract_with_prefix() {
        let body = "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"ok\"}]}}]}\n";
        assert_eq!(extract_advice_text(body).unwrap(), "ok");
    }

    #[test]
    fn test_extract_empty_text() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"   "}]}}]}"#;
        assert_eq!(extract_advice_text(body), Err(GeneratorError::Empty));
    }

    #[test]
    fn test_extract_missing_candidates() {
        let body = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        assert!(matches!(
            extract_advice_text(body),
            Err(GeneratorError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_extract_not_json() {
        assert!(matches!(
            extract_advice_text("quota exceeded"),
            Err(GeneratorError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_mock_generator_replies() {
        let generator = MockGenerator::replying("Visit {patient_id} now");
        let advice = generator.generate(&snapshot()).await.unwrap();
        assert_eq!(advice, "Visit p-1 now");
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_generator_fails() {
        let generator = MockGenerator::failing(GeneratorError::Quota);
        assert_eq!(generator.generate(&snapshot()).await, Err(GeneratorError::Quota));
        assert_eq!(generator.calls(), 1);
    }
}
