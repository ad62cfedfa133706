//! The durable-store seam used by the submission pipeline.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::{Database, DbError};
use crate::models::{AlertRecord, AlertSummary, InsightRecord};

/// Store failures as seen by the pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<DbError> for StoreError {
    fn from(e: DbError) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        StoreError::Unavailable(format!("Lock poisoned: {}", e))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable storage for alerts and insights.
///
/// Calls are synchronous and may block on disk; async callers run them on
/// the blocking pool. Implementations must be safe to share across threads.
/// No isolation is promised between a write and a later recency count.
pub trait AlertStore: Send + Sync {
    /// Persist a new alert and return its ID.
    fn insert_alert(&self, alert: &AlertRecord) -> StoreResult<String>;

    /// Attach advisory text to an existing alert.
    fn attach_advice(&self, alert_id: &str, advice: &str) -> StoreResult<()>;

    /// Count a patient's alerts with `since <= timestamp <= until`.
    fn count_alerts_between(
        &self,
        patient_id: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> StoreResult<usize>;

    /// Append an insight and return its ID.
    fn insert_insight(&self, insight: &InsightRecord) -> StoreResult<String>;

    /// Most recent alerts, optionally for one patient, newest first.
    fn list_alerts(&self, patient_id: Option<&str>, limit: usize) -> StoreResult<Vec<AlertRecord>>;

    /// Like [`list_alerts`](Self::list_alerts), with each alert's urgency context.
    fn list_alert_summaries(
        &self,
        patient_id: Option<&str>,
        limit: usize,
    ) -> StoreResult<Vec<AlertSummary>>;
}

/// SQLite-backed [`AlertStore`].
#[derive(Clone)]
pub struct SqliteStore {
    db: Arc<Mutex<Database>>,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    /// Open or create the database file.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Ok(Self::new(Database::open(path)?))
    }

    /// Create an in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    /// Lock the underlying database for direct access.
    pub fn lock(&self) -> StoreResult<MutexGuard<'_, Database>> {
        Ok(self.db.lock()?)
    }
}

impl AlertStore for SqliteStore {
    fn insert_alert(&self, alert: &AlertRecord) -> StoreResult<String> {
        let db = self.lock()?;
        db.insert_alert(alert)?;
        Ok(alert.alert_id.clone())
    }

    fn attach_advice(&self, alert_id: &str, advice: &str) -> StoreResult<()> {
        let db = self.lock()?;
        db.attach_advice(alert_id, advice)?;
        Ok(())
    }

    fn count_alerts_between(
        &self,
        patient_id: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> StoreResult<usize> {
        let db = self.lock()?;
        Ok(db.count_alerts_since(patient_id, since, until)?)
    }

    fn insert_insight(&self, insight: &InsightRecord) -> StoreResult<String> {
        let db = self.lock()?;
        Ok(db.insert_insight(insight)?)
    }

    fn list_alerts(&self, patient_id: Option<&str>, limit: usize) -> StoreResult<Vec<AlertRecord>> {
        let db = self.lock()?;
        let alerts = match patient_id {
            Some(patient_id) => db.list_alerts_for_patient(patient_id, limit)?,
            None => db.list_alerts(limit)?,
        };
        Ok(alerts)
    }

    fn list_alert_summaries(
        &self,
        patient_id: Option<&str>,
        limit: usize,
    ) -> StoreResult<Vec<AlertSummary>> {
        let db = self.lock()?;
        Ok(db.list_alert_summaries(patient_id, limit)?)
    }
}
