//! Alert database operations.

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{
    format_timestamp, parse_timestamp, AlertRecord, AlertSummary, AlertType, Vitals,
};

/// Trailing window used to count repeated alerts.
pub const RECENCY_WINDOW_MINUTES: i64 = 60;

/// The recency window as a duration.
pub fn recency_window() -> Duration {
    Duration::minutes(RECENCY_WINDOW_MINUTES)
}

const ALERT_COLUMNS: &str = "alert_id, patient_id, alert_type, heart_rate, blood_pressure, \
                             mood_score, timestamp, resolved, ai_advice";

/// Alert columns plus the latest insight's context and score.
const SUMMARY_COLUMNS: &str = "a.alert_id, a.patient_id, a.alert_type, a.heart_rate, \
     a.blood_pressure, a.mood_score, a.timestamp, a.resolved, a.ai_advice, \
     (SELECT i.emotional_context FROM emotion_insights i WHERE i.alert_id = a.alert_id \
      ORDER BY i.timestamp DESC LIMIT 1), \
     (SELECT i.emotional_urgency FROM emotion_insights i WHERE i.alert_id = a.alert_id \
      ORDER BY i.timestamp DESC LIMIT 1)";

impl Database {
    /// Insert a new alert.
    pub fn insert_alert(&self, alert: &AlertRecord) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO alerts (
                alert_id, patient_id, alert_type, heart_rate, blood_pressure,
                mood_score, timestamp, resolved, ai_advice
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                alert.alert_id,
                alert.patient_id,
                alert.alert_type.as_str(),
                alert.vitals.heart_rate,
                alert.vitals.blood_pressure,
                alert.vitals.mood_score,
                format_timestamp(&alert.timestamp),
                alert.resolved,
                alert.ai_advice,
            ],
        )?;
        Ok(())
    }

    /// Get an alert by ID.
    pub fn get_alert(&self, alert_id: &str) -> DbResult<Option<AlertRecord>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM alerts WHERE alert_id = ?", ALERT_COLUMNS),
                [alert_id],
                AlertRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Attach generated advice to a stored alert.
    pub fn attach_advice(&self, alert_id: &str, advice: &str) -> DbResult<()> {
        let rows_affected = self.conn.execute(
            "UPDATE alerts SET ai_advice = ?2 WHERE alert_id = ?1",
            params![alert_id, advice],
        )?;
        if rows_affected == 0 {
            return Err(DbError::NotFound(format!("alert {}", alert_id)));
        }
        Ok(())
    }

    /// Mark an alert resolved or reopen it.
    pub fn set_resolved(&self, alert_id: &str, resolved: bool) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE alerts SET resolved = ?2 WHERE alert_id = ?1",
            params![alert_id, resolved],
        )?;
        Ok(rows_affected > 0)
    }

    /// Count a patient's alerts with `since <= timestamp <= until`.
    pub fn count_alerts_since(
        &self,
        patient_id: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> DbResult<usize> {
        let count: i64 = self.conn.query_row(
            r#"
            SELECT COUNT(*) FROM alerts
            WHERE patient_id = ?1 AND timestamp >= ?2 AND timestamp <= ?3
            "#,
            params![patient_id, format_timestamp(&since), format_timestamp(&until)],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Count a patient's alerts in the trailing recency window ending at `now`.
    pub fn count_recent_alerts(&self, patient_id: &str, now: DateTime<Utc>) -> DbResult<usize> {
        self.count_alerts_since(patient_id, now - recency_window(), now)
    }

    /// List alerts, newest first.
    pub fn list_alerts(&self, limit: usize) -> DbResult<Vec<AlertRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM alerts ORDER BY timestamp DESC LIMIT ?",
            ALERT_COLUMNS
        ))?;
        let rows = stmt.query_map([limit as i64], AlertRow::from_row)?;

        let mut alerts = Vec::new();
        for row in rows {
            alerts.push(row?.try_into()?);
        }
        Ok(alerts)
    }

    /// List one patient's alerts, newest first.
    pub fn list_alerts_for_patient(
        &self,
        patient_id: &str,
        limit: usize,
    ) -> DbResult<Vec<AlertRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM alerts WHERE patient_id = ? ORDER BY timestamp DESC LIMIT ?",
            ALERT_COLUMNS
        ))?;
        let rows = stmt.query_map(params![patient_id, limit as i64], AlertRow::from_row)?;

        let mut alerts = Vec::new();
        for row in rows {
            alerts.push(row?.try_into()?);
        }
        Ok(alerts)
    }

    /// List alerts with their recorded urgency context, newest first.
    ///
    /// Alerts that were never scored carry `None` for both insight fields.
    pub fn list_alert_summaries(
        &self,
        patient_id: Option<&str>,
        limit: usize,
    ) -> DbResult<Vec<AlertSummary>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM alerts a WHERE (?1 IS NULL OR a.patient_id = ?1) \
             ORDER BY a.timestamp DESC LIMIT ?2",
            SUMMARY_COLUMNS
        ))?;
        let rows = stmt.query_map(params![patient_id, limit as i64], |row| {
            Ok((
                AlertRow::from_row(row)?,
                row.get::<_, Option<String>>(9)?,
                row.get::<_, Option<i64>>(10)?,
            ))
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            let (alert, emotional_context, emotional_urgency) = row?;
            summaries.push(AlertSummary {
                alert: alert.try_into()?,
                emotional_context,
                emotional_urgency,
            });
        }
        Ok(summaries)
    }
}

/// Raw alert row before type conversion.
struct AlertRow {
    alert_id: String,
    patient_id: String,
    alert_type: String,
    heart_rate: Option<i64>,
    blood_pressure: Option<String>,
    mood_score: Option<i64>,
    timestamp: String,
    resolved: bool,
    ai_advice: Option<String>,
}

impl AlertRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            alert_id: row.get(0)?,
            patient_id: row.get(1)?,
            alert_type: row.get(2)?,
            heart_rate: row.get(3)?,
            blood_pressure: row.get(4)?,
            mood_score: row.get(5)?,
            timestamp: row.get(6)?,
            resolved: row.get(7)?,
            ai_advice: row.get(8)?,
        })
    }
}

impl TryFrom<AlertRow> for AlertRecord {
    type Error = DbError;

    fn try_from(row: AlertRow) -> Result<Self, Self::Error> {
        let alert_type: AlertType = row
            .alert_type
            .parse()
            .map_err(|_| DbError::Corrupt(format!("alert type {:?}", row.alert_type)))?;
        let timestamp = parse_timestamp(&row.timestamp)
            .map_err(|e| DbError::Corrupt(format!("timestamp {:?}: {}", row.timestamp, e)))?;

        Ok(AlertRecord {
            alert_id: row.alert_id,
            patient_id: row.patient_id,
            alert_type,
            vitals: Vitals {
                heart_rate: row.heart_rate,
                blood_pressure: row.blood_pressure,
                mood_score: row.mood_score,
            },
            timestamp,
            resolved: row.resolved,
            ai_advice: row.ai_advice,
        })
    }
}
