//! Alert models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::vitals::Vitals;

/// The kind of help a patient is asking for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Medication,
    Assistance,
    Pain,
    Emergency,
}

impl AlertType {
    /// Every alert type.
    pub const ALL: [AlertType; 4] = [
        AlertType::Medication,
        AlertType::Assistance,
        AlertType::Pain,
        AlertType::Emergency,
    ];

    /// Wire and storage name.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::Medication => "medication",
            AlertType::Assistance => "assistance",
            AlertType::Pain => "pain",
            AlertType::Emergency => "emergency",
        }
    }

    /// Base urgency weight (higher = more urgent).
    pub fn base_weight(&self) -> i64 {
        match self {
            AlertType::Emergency => 10,
            AlertType::Pain => 8,
            AlertType::Assistance => 5,
            AlertType::Medication => 3,
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlertType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownAlertType(s.to_string()))
    }
}

/// Rejected submissions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("patient_id must not be empty")]
    EmptyPatientId,

    #[error("unknown alert type: {0}")]
    UnknownAlertType(String),
}

/// An alert as submitted, before the engine stamps it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewAlert {
    pub patient_id: String,
    pub alert_type: AlertType,
    pub vitals: Vitals,
}

impl NewAlert {
    pub fn new(patient_id: impl Into<String>, alert_type: AlertType) -> Self {
        Self {
            patient_id: patient_id.into(),
            alert_type,
            vitals: Vitals::default(),
        }
    }

    pub fn with_vitals(mut self, vitals: Vitals) -> Self {
        self.vitals = vitals;
        self
    }

    /// Check required fields. Vitals are never rejected here.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.patient_id.trim().is_empty() {
            return Err(ValidationError::EmptyPatientId);
        }
        Ok(())
    }
}

/// A stored alert.
///
/// Everything except `resolved` and `ai_advice` is fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertRecord {
    /// Unique alert ID
    pub alert_id: String,
    /// Opaque patient key
    pub patient_id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    #[serde(flatten)]
    pub vitals: Vitals,
    /// Server-assigned creation time
    pub timestamp: DateTime<Utc>,
    pub resolved: bool,
    pub ai_advice: Option<String>,
}

impl AlertRecord {
    /// Stamp a submission with an ID and the server clock.
    ///
    /// The timestamp is truncated to the precision it is stored with.
    pub fn from_submission(alert: NewAlert, now: DateTime<Utc>) -> Self {
        Self {
            alert_id: uuid::Uuid::new_v4().to_string(),
            patient_id: alert.patient_id,
            alert_type: alert.alert_type,
            vitals: alert.vitals,
            timestamp: now.trunc_subsecs(6),
            resolved: false,
            ai_advice: None,
        }
    }
}

/// Storage format for timestamps.
///
/// Fixed precision and a `Z` suffix keep lexical order equal to
/// chronological order, which the recency query relies on.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Inverse of [`format_timestamp`]; accepts any RFC 3339 string.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|ts| ts.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_type_round_trip_names() {
        for alert_type in AlertType::ALL {
            assert_eq!(alert_type.as_str().parse::<AlertType>(), Ok(alert_type));
        }
        assert_eq!(
            "fall".parse::<AlertType>(),
            Err(ValidationError::UnknownAlertType("fall".into()))
        );
    }

    #[test]
    fn test_alert_type_serde() {
        assert_eq!(serde_json::to_string(&AlertType::Emergency).unwrap(), "\"emergency\"");
        let parsed: AlertType = serde_json::from_str("\"medication\"").unwrap();
        assert_eq!(parsed, AlertType::Medication);
    }

    #[test]
    fn test_base_weights() {
        assert_eq!(AlertType::Emergency.base_weight(), 10);
        assert_eq!(AlertType::Pain.base_weight(), 8);
        assert_eq!(AlertType::Assistance.base_weight(), 5);
        assert_eq!(AlertType::Medication.base_weight(), 3);
    }

    #[test]
    fn test_validate() {
        assert!(NewAlert::new("p-1", AlertType::Pain).validate().is_ok());
        assert_eq!(
            NewAlert::new("   ", AlertType::Pain).validate(),
            Err(ValidationError::EmptyPatientId)
        );
    }

    #[test]
    fn test_from_submission() {
        let now = parse_timestamp("2026-03-01T08:15:00.123456789Z").unwrap();
        let record = AlertRecord::from_submission(NewAlert::new("p-1", AlertType::Pain), now);
        assert_eq!(record.alert_id.len(), 36);
        assert_eq!(format_timestamp(&record.timestamp), "2026-03-01T08:15:00.123456Z");
        assert!(!record.resolved);
        assert!(record.ai_advice.is_none());
    }

    #[test]
    fn test_record_json_shape() {
        let record = AlertRecord::from_submission(
            NewAlert::new("p-1", AlertType::Pain).with_vitals(Vitals {
                heart_rate: Some(90),
                ..Default::default()
            }),
            Utc::now(),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "pain");
        assert_eq!(json["heart_rate"], 90);
        assert!(json["mood_score"].is_null());
        assert_eq!(json["resolved"], false);
    }

    #[test]
    fn test_timestamp_format_sorts() {
        let early = parse_timestamp("2026-01-01T09:00:00Z").unwrap();
        let late = parse_timestamp("2026-01-01T10:00:00.5Z").unwrap();
        assert!(format_timestamp(&early) < format_timestamp(&late));
        assert_eq!(format_timestamp(&early), "2026-01-01T09:00:00.000000Z");
        assert_eq!(parse_timestamp(&format_timestamp(&late)).unwrap(), late);
    }
}
