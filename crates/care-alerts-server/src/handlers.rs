//! Axum request handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use care_alerts_core::{AlertSummary, NewAlert};

use crate::dto::{CreateAlertRequest, CreateAlertResponse, HealthResponse, ListAlertsQuery};
use crate::error::ApiResult;
use crate::state::AppState;

/// `POST /alerts/`: persist, score and advise on a new alert.
///
/// Scoring and advisory problems never fail the request; the response just
/// omits the insight fields or carries the fallback advice. Only validation
/// and persistence failures are returned as errors.
#[tracing::instrument(skip_all)]
pub async fn create_alert(
    State(state): State<AppState>,
    payload: Result<Json<CreateAlertRequest>, JsonRejection>,
) -> ApiResult<Json<CreateAlertResponse>> {
    let Json(request) = payload?;
    let submission: NewAlert = request.into();

    let outcome = state.orchestrator().submit(submission).await?;

    tracing::info!(
        alert_id = %outcome.alert.alert_id,
        urgency = outcome.assessment.map(|a| a.urgency),
        degraded = outcome.advisory_degraded,
        "alert processed"
    );
    Ok(Json(outcome.into()))
}

/// `GET /alerts/`: recent alerts with their urgency context, newest first.
#[tracing::instrument(skip_all)]
pub async fn list_alerts(
    State(state): State<AppState>,
    query: Result<Query<ListAlertsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<AlertSummary>>> {
    let Query(query) = query?;
    let limit = query.effective_limit();
    let patient_id = query
        .patient_id
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());

    let alerts = state.orchestrator().list_alerts(patient_id, limit).await?;
    Ok(Json(alerts))
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
