//! Alert submission pipeline.
//!
//! ```text
//! Received → Persisted → (Scored) → AdvisoryRequested → AdvisoryReceived | AdvisoryDegraded → Finalized
//! ```
//!
//! Only the two writes of the alert itself can fail a submission. Scoring and
//! advisory generation degrade to "no insight" and the fallback advice.

use std::sync::Arc;
use std::time::Duration;

use care_alerts_llm::{AdvisoryGenerator, AlertSnapshot, GeneratorError, FALLBACK_ADVICE};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::db::{recency_window, AlertStore, StoreError};
use crate::models::{AlertRecord, AlertSummary, InsightRecord, NewAlert, ValidationError};
use crate::triage::{TriageAssessment, TriageEngine};

/// Default bound on a single advisory call.
pub const DEFAULT_ADVISORY_TIMEOUT: Duration = Duration::from_secs(10);

/// Which optional steps run, and their limits.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub scoring_enabled: bool,
    pub advisory_enabled: bool,
    pub advisory_timeout: Duration,
    pub recency_window: chrono::Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            scoring_enabled: true,
            advisory_enabled: true,
            advisory_timeout: DEFAULT_ADVISORY_TIMEOUT,
            recency_window: recency_window(),
        }
    }
}

/// Steps a submission passed through, in order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SubmissionStage {
    Received,
    Persisted,
    Scored,
    ScoringFailed,
    ScoringSkipped,
    AdvisoryRequested,
    AdvisoryReceived,
    AdvisoryDegraded,
    AdvisorySkipped,
    Finalized,
}

/// Submission failures. Anything else degrades instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Invalid alert: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// What a completed submission produced.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    /// The alert as finally stored
    pub alert: AlertRecord,
    pub assessment: Option<TriageAssessment>,
    pub insight: Option<InsightRecord>,
    pub ai_advice: Option<String>,
    /// True when `ai_advice` is the fallback text
    pub advisory_degraded: bool,
    pub stages: Vec<SubmissionStage>,
}

impl SubmissionOutcome {
    pub fn alert_id(&self) -> &str {
        &self.alert.alert_id
    }

    pub fn emotional_context(&self) -> Option<&str> {
        self.insight.as_ref().map(|i| i.emotional_context.as_str())
    }

    pub fn reached(&self, stage: SubmissionStage) -> bool {
        self.stages.contains(&stage)
    }
}

/// The alert fields handed to the advisory generator.
pub fn alert_snapshot(alert: &AlertRecord) -> AlertSnapshot {
    AlertSnapshot {
        patient_id: alert.patient_id.clone(),
        alert_type: alert.alert_type.as_str().to_string(),
        heart_rate: alert.vitals.heart_rate,
        blood_pressure: alert.vitals.blood_pressure.clone(),
        mood_score: alert.vitals.mood_score,
    }
}

/// Sequences persistence, scoring, and advisory generation for one alert.
///
/// Holds no per-request state; share one instance across requests.
#[derive(Clone)]
pub struct AdvisoryOrchestrator {
    store: Arc<dyn AlertStore>,
    generator: Option<Arc<dyn AdvisoryGenerator>>,
    engine: TriageEngine,
    config: PipelineConfig,
}

impl AdvisoryOrchestrator {
    pub fn new(
        store: Arc<dyn AlertStore>,
        generator: Option<Arc<dyn AdvisoryGenerator>>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            generator,
            engine: TriageEngine::new(),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run one submission to completion.
    #[tracing::instrument(
        skip(self, submission),
        fields(patient_id = %submission.patient_id, alert_type = %submission.alert_type)
    )]
    pub async fn submit(&self, submission: NewAlert) -> PipelineResult<SubmissionOutcome> {
        submission.validate()?;

        let mut stages = vec![SubmissionStage::Received];
        let mut alert = AlertRecord::from_submission(submission, Utc::now());

        let record = alert.clone();
        self.with_store(move |store| store.insert_alert(&record)).await?;
        stages.push(SubmissionStage::Persisted);
        info!(alert_id = %alert.alert_id, "alert persisted");

        let (assessment, insight) = if self.config.scoring_enabled {
            match self.score(&alert).await {
                Ok((assessment, insight)) => {
                    stages.push(SubmissionStage::Scored);
                    (Some(assessment), Some(insight))
                }
                Err(e) => {
                    warn!(alert_id = %alert.alert_id, error = %e, "scoring failed, continuing without insight");
                    stages.push(SubmissionStage::ScoringFailed);
                    (None, None)
                }
            }
        } else {
            stages.push(SubmissionStage::ScoringSkipped);
            (None, None)
        };

        let mut advisory_degraded = false;
        if self.config.advisory_enabled {
            stages.push(SubmissionStage::AdvisoryRequested);
            let advice = match self.request_advice(&alert).await {
                Ok(advice) => {
                    stages.push(SubmissionStage::AdvisoryReceived);
                    advice
                }
                Err(e) => {
                    warn!(
                        alert_id = %alert.alert_id,
                        error = %e,
                        "advisory generator did not return advice, using fallback"
                    );
                    stages.push(SubmissionStage::AdvisoryDegraded);
                    advisory_degraded = true;
                    FALLBACK_ADVICE.to_string()
                }
            };
            let (alert_id, text) = (alert.alert_id.clone(), advice.clone());
            self.with_store(move |store| store.attach_advice(&alert_id, &text)).await?;
            alert.ai_advice = Some(advice);
        } else {
            stages.push(SubmissionStage::AdvisorySkipped);
        }

        stages.push(SubmissionStage::Finalized);

        let outcome = SubmissionOutcome {
            ai_advice: alert.ai_advice.clone(),
            alert,
            assessment,
            insight,
            advisory_degraded,
            stages,
        };
        notify_caregivers(&outcome);
        Ok(outcome)
    }

    /// Score an alert against the store's recency window and record the insight.
    async fn score(
        &self,
        alert: &AlertRecord,
    ) -> Result<(TriageAssessment, InsightRecord), StoreError> {
        let now = Utc::now();
        let since = now - self.config.recency_window;
        let patient_id = alert.patient_id.clone();
        let recent = self
            .with_store(move |store| store.count_alerts_between(&patient_id, since, now))
            .await?;

        let assessment = self.rescore(alert, recent);
        let insight = InsightRecord::for_alert(alert, assessment.urgency, assessment.level, recent, now);
        let record = insight.clone();
        self.with_store(move |store| store.insert_insight(&record)).await?;

        info!(
            alert_id = %alert.alert_id,
            urgency = assessment.urgency,
            recent_alerts = recent,
            context = assessment.emotional_context(),
            "alert scored"
        );
        Ok((assessment, insight))
    }

    /// Score a stored alert with a known recent-alert count. Pure.
    pub fn rescore(&self, alert: &AlertRecord, recent_alert_count: usize) -> TriageAssessment {
        self.engine
            .assess(alert.alert_type, &alert.vitals, recent_alert_count)
    }

    /// Recent alerts with their urgency context, newest first.
    pub async fn list_alerts(
        &self,
        patient_id: Option<String>,
        limit: usize,
    ) -> Result<Vec<AlertSummary>, StoreError> {
        self.with_store(move |store| store.list_alert_summaries(patient_id.as_deref(), limit))
            .await
    }

    /// Run a store call on the blocking pool so a slow disk or a held lock
    /// never stalls the async workers.
    async fn with_store<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&dyn AlertStore) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(|e| StoreError::Unavailable(format!("store task failed: {}", e)))?
    }

    async fn request_advice(&self, alert: &AlertRecord) -> Result<String, GeneratorError> {
        let generator = self
            .generator
            .as_ref()
            .ok_or_else(|| GeneratorError::NotConfigured("no advisory generator".into()))?;

        let snapshot = alert_snapshot(alert);
        let advice = tokio::time::timeout(self.config.advisory_timeout, generator.generate(&snapshot))
            .await
            .map_err(|_| GeneratorError::Timeout(self.config.advisory_timeout.as_millis() as u64))??;

        let advice = advice.trim();
        if advice.is_empty() {
            return Err(GeneratorError::Empty);
        }
        Ok(advice.to_string())
    }
}

/// Placeholder for caregiver notification delivery.
fn notify_caregivers(outcome: &SubmissionOutcome) {
    info!(
        target: "care_alerts::notify",
        alert_id = %outcome.alert.alert_id,
        patient_id = %outcome.alert.patient_id,
        alert_type = %outcome.alert.alert_type,
        urgency = outcome.assessment.map(|a| a.urgency),
        context = outcome.emotional_context(),
        advice = outcome.ai_advice.as_deref(),
        "new alert"
    );
}
