//! Urgency insight models.

use std::fmt;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use super::alert::{AlertRecord, AlertType};
use super::vitals::Vitals;

/// Severity tier derived from an urgency score, lowest first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UrgencyLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl UrgencyLevel {
    /// Caregiver-facing context label.
    pub fn label(&self) -> &'static str {
        match self {
            UrgencyLevel::Critical => "Critical: Immediate attention required",
            UrgencyLevel::High => "High: Urgent response needed",
            UrgencyLevel::Moderate => "Moderate: Check promptly",
            UrgencyLevel::Low => "Low: Routine follow-up",
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The scored view of one alert. Written once, never updated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsightRecord {
    pub insight_id: String,
    /// Alert this insight was derived from
    pub alert_id: String,
    pub patient_id: String,
    pub alert_type: AlertType,
    pub emotional_urgency: i64,
    pub emotional_context: String,
    /// Vitals as they were when scored
    pub vitals: Vitals,
    /// Alerts seen in the recency window, including this one
    pub recent_alert_count: usize,
    pub timestamp: DateTime<Utc>,
}

impl InsightRecord {
    pub fn for_alert(
        alert: &AlertRecord,
        emotional_urgency: i64,
        level: UrgencyLevel,
        recent_alert_count: usize,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            insight_id: uuid::Uuid::new_v4().to_string(),
            alert_id: alert.alert_id.clone(),
            patient_id: alert.patient_id.clone(),
            alert_type: alert.alert_type,
            emotional_urgency,
            emotional_context: level.label().to_string(),
            vitals: alert.vitals.clone(),
            recent_alert_count,
            timestamp: now.trunc_subsecs(6),
        }
    }
}

/// A stored alert with the urgency context recorded for it, if any.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertSummary {
    #[serde(flatten)]
    pub alert: AlertRecord,
    pub emotional_context: Option<String>,
    pub emotional_urgency: Option<i64>,
}
