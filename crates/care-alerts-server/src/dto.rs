//! Request and response bodies for the alerts API.

use care_alerts_core::{AlertType, NewAlert, SubmissionOutcome, Vitals};
use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST /alerts/`.
///
/// Vitals accept a number, a numeric string, or an empty string (treated as
/// absent), since form clients send blank inputs as `""`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAlertRequest {
    pub patient_id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    #[serde(default, deserialize_with = "lenient_int")]
    pub heart_rate: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub blood_pressure: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub mood_score: Option<i64>,
}

impl From<CreateAlertRequest> for NewAlert {
    fn from(request: CreateAlertRequest) -> Self {
        NewAlert::new(request.patient_id, request.alert_type).with_vitals(Vitals {
            heart_rate: request.heart_rate,
            blood_pressure: request.blood_pressure,
            mood_score: request.mood_score,
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrString {
    Int(i64),
    Str(String),
}

fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<IntOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IntOrString::Int(n)) => Ok(Some(n)),
        Some(IntOrString::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(IntOrString::Str(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("expected an integer, got {:?}", s))),
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.trim().is_empty()))
}

/// Body returned for a processed alert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateAlertResponse {
    pub success: bool,
    pub alert_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_advice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotional_context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotional_urgency: Option<i64>,
}

impl From<SubmissionOutcome> for CreateAlertResponse {
    fn from(outcome: SubmissionOutcome) -> Self {
        Self {
            success: true,
            alert_id: outcome.alert.alert_id,
            insight_id: outcome.insight.as_ref().map(|i| i.insight_id.clone()),
            emotional_context: outcome.insight.as_ref().map(|i| i.emotional_context.clone()),
            emotional_urgency: outcome.insight.as_ref().map(|i| i.emotional_urgency),
            ai_advice: outcome.ai_advice,
        }
    }
}

/// Default page size for `GET /alerts/`.
pub const DEFAULT_LIST_LIMIT: usize = 50;
/// Upper bound on the page size.
pub const MAX_LIST_LIMIT: usize = 500;

/// Query string of `GET /alerts/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListAlertsQuery {
    pub patient_id: Option<String>,
    pub limit: Option<usize>,
}

impl ListAlertsQuery {
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_with_vitals() {
        let request: CreateAlertRequest = serde_json::from_str(
            r#"{"patient_id":"p-1","type":"emergency","heart_rate":150,"blood_pressure":"190/125","mood_score":2}"#,
        )
        .unwrap();
        let alert: NewAlert = request.into();
        assert_eq!(alert.alert_type, AlertType::Emergency);
        assert_eq!(alert.vitals.heart_rate, Some(150));
        assert_eq!(alert.vitals.blood_pressure.as_deref(), Some("190/125"));
        assert_eq!(alert.vitals.mood_score, Some(2));
    }

    #[test]
    fn test_request_without_vitals() {
        let request: CreateAlertRequest =
            serde_json::from_str(r#"{"patient_id":"p-1","type":"medication"}"#).unwrap();
        assert!(request.heart_rate.is_none());
        assert!(request.blood_pressure.is_none());
        assert!(request.mood_score.is_none());
    }

    #[test]
    fn test_request_blank_form_fields() {
        let request: CreateAlertRequest = serde_json::from_str(
            r#"{"patient_id":"p-1","type":"pain","heart_rate":"","blood_pressure":"","mood_score":"4"}"#,
        )
        .unwrap();
        assert!(request.heart_rate.is_none());
        assert!(request.blood_pressure.is_none());
        assert_eq!(request.mood_score, Some(4));
    }

    #[test]
    fn test_request_rejects_bad_values() {
        assert!(serde_json::from_str::<CreateAlertRequest>(
            r#"{"patient_id":"p-1","type":"fall"}"#
        )
        .is_err());
        assert!(serde_json::from_str::<CreateAlertRequest>(
            r#"{"patient_id":"p-1","type":"pain","heart_rate":"fast"}"#
        )
        .is_err());
        assert!(serde_json::from_str::<CreateAlertRequest>(r#"{"type":"pain"}"#).is_err());
    }

    #[test]
    fn test_response_omits_absent_fields() {
        let response = CreateAlertResponse {
            success: true,
            alert_id: "a-1".into(),
            insight_id: None,
            ai_advice: Some("Stay calm".into()),
            emotional_context: None,
            emotional_urgency: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["ai_advice"], "Stay calm");
        assert!(json.get("emotional_context").is_none());
        assert!(json.get("insight_id").is_none());
    }

    #[test]
    fn test_list_limit() {
        assert_eq!(ListAlertsQuery::default().effective_limit(), DEFAULT_LIST_LIMIT);
        let query = ListAlertsQuery {
            limit: Some(10_000),
            ..Default::default()
        };
        assert_eq!(query.effective_limit(), MAX_LIST_LIMIT);
        let query = ListAlertsQuery {
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(query.effective_limit(), 1);
    }
}
