//! Alert urgency triage.
//!
//! Pipeline: Alert type + Vitals + Recent alert count → Score → Context label

mod classifier;
mod scorer;

pub use classifier::*;
pub use scorer::*;

use serde::{Deserialize, Serialize};

use crate::models::{AlertType, UrgencyLevel, Vitals};

/// The full result of triaging one alert.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TriageAssessment {
    pub breakdown: UrgencyBreakdown,
    pub urgency: i64,
    pub level: UrgencyLevel,
}

impl TriageAssessment {
    pub fn emotional_context(&self) -> &'static str {
        self.level.label()
    }
}

/// Scorer and classifier together. Pure: the same inputs always give the
/// same assessment.
#[derive(Debug, Clone, Copy, Default)]
pub struct TriageEngine {
    scorer: UrgencyScorer,
    classifier: ContextClassifier,
}

impl TriageEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assess(
        &self,
        alert_type: AlertType,
        vitals: &Vitals,
        recent_alert_count: usize,
    ) -> TriageAssessment {
        let breakdown = self.scorer.breakdown(alert_type, vitals, recent_alert_count);
        let urgency = breakdown.total();
        TriageAssessment {
            breakdown,
            urgency,
            level: self.classifier.classify(urgency),
        }
    }

    pub fn scorer(&self) -> &UrgencyScorer {
        &self.scorer
    }

    pub fn classifier(&self) -> &ContextClassifier {
        &self.classifier
    }
}
