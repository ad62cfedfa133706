//! Care-Alerts Core Library
//!
//! Urgency triage for caregiver-facing alerts raised by elderly patients.
//!
//! # Architecture
//!
//! ```text
//! POST /alerts/ → NewAlert ──validate──▶ AlertRecord (server timestamp, resolved=false)
//!                                             │
//!                                   [PERSIST: alerts table]
//!                                             │
//!                       ┌─────────────────────┴─────────────────────┐
//!                       │ scoring (optional)                        │ advisory (optional)
//!                       ▼                                           ▼
//!          recent alerts in last hour                     AdvisoryGenerator (timeout)
//!                       │                                           │
//!        UrgencyScorer → ContextClassifier                 advice | fallback text
//!                       │                                           │
//!          [APPEND: emotion_insights]                   [UPDATE: alerts.ai_advice]
//!                       └─────────────────────┬─────────────────────┘
//!                                             ▼
//!                              caregiver notification (log)
//! ```
//!
//! # Core Principle
//!
//! **The alert is written before anything else runs.** Scoring and advisory
//! generation may fail without losing it, and neither fails the request.
//!
//! # Modules
//!
//! - [`models`]: Domain types (AlertRecord, Vitals, InsightRecord, UrgencyLevel)
//! - [`triage`]: Urgency scorer and context classifier (pure)
//! - [`db`]: SQLite storage and the [`AlertStore`] seam
//! - [`pipeline`]: Submission orchestration

pub mod db;
pub mod models;
pub mod pipeline;
pub mod triage;

// Re-export commonly used types
pub use db::{AlertStore, Database, DbError, SqliteStore, StoreError};
pub use models::{
    AlertRecord, AlertSummary, AlertType, BloodPressure, InsightRecord, NewAlert, UrgencyLevel,
    ValidationError, Vitals,
};
pub use pipeline::{
    AdvisoryOrchestrator, PipelineConfig, PipelineError, SubmissionOutcome, SubmissionStage,
};
pub use triage::{ContextClassifier, TriageAssessment, TriageEngine, UrgencyBreakdown, UrgencyScorer};
