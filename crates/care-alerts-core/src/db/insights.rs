//! Emotion insight database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{format_timestamp, parse_timestamp, AlertType, InsightRecord, Vitals};

const INSIGHT_COLUMNS: &str = "insight_id, alert_id, patient_id, alert_type, emotional_urgency, \
                               emotional_context, vitals, recent_alert_count, timestamp";

impl Database {
    /// Append an insight and return its ID.
    pub fn insert_insight(&self, insight: &InsightRecord) -> DbResult<String> {
        let vitals_json = serde_json::to_string(&insight.vitals)?;

        self.conn.execute(
            r#"
            INSERT INTO emotion_insights (
                insight_id, alert_id, patient_id, alert_type, emotional_urgency,
                emotional_context, vitals, recent_alert_count, timestamp
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                insight.insight_id,
                insight.alert_id,
                insight.patient_id,
                insight.alert_type.as_str(),
                insight.emotional_urgency,
                insight.emotional_context,
                vitals_json,
                insight.recent_alert_count as i64,
                format_timestamp(&insight.timestamp),
            ],
        )?;
        Ok(insight.insight_id.clone())
    }

    /// Get an insight by ID.
    pub fn get_insight(&self, insight_id: &str) -> DbResult<Option<InsightRecord>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM emotion_insights WHERE insight_id = ?", INSIGHT_COLUMNS),
                [insight_id],
                InsightRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Get the insight derived from an alert, if one was recorded.
    pub fn get_insight_for_alert(&self, alert_id: &str) -> DbResult<Option<InsightRecord>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM emotion_insights WHERE alert_id = ?", INSIGHT_COLUMNS),
                [alert_id],
                InsightRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List a patient's insights, newest first.
    pub fn list_insights_for_patient(
        &self,
        patient_id: &str,
        limit: usize,
    ) -> DbResult<Vec<InsightRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM emotion_insights WHERE patient_id = ? ORDER BY timestamp DESC LIMIT ?",
            INSIGHT_COLUMNS
        ))?;
        let rows = stmt.query_map(params![patient_id, limit as i64], InsightRow::from_row)?;

        let mut insights = Vec::new();
        for row in rows {
            insights.push(row?.try_into()?);
        }
        Ok(insights)
    }
}

struct InsightRow {
    insight_id: String,
    alert_id: String,
    patient_id: String,
    alert_type: String,
    emotional_urgency: i64,
    emotional_context: String,
    vitals: String,
    recent_alert_count: i64,
    timestamp: String,
}

impl InsightRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            insight_id: row.get(0)?,
            alert_id: row.get(1)?,
            patient_id: row.get(2)?,
            alert_type: row.get(3)?,
            emotional_urgency: row.get(4)?,
            emotional_context: row.get(5)?,
            vitals: row.get(6)?,
            recent_alert_count: row.get(7)?,
            timestamp: row.get(8)?,
        })
    }
}

impl TryFrom<InsightRow> for InsightRecord {
    type Error = DbError;

    fn try_from(row: InsightRow) -> Result<Self, Self::Error> {
        let alert_type: AlertType = row
            .alert_type
            .parse()
            .map_err(|_| DbError::Corrupt(format!("alert type {:?}", row.alert_type)))?;
        let vitals: Vitals = serde_json::from_str(&row.vitals)?;
        let timestamp = parse_timestamp(&row.timestamp)
            .map_err(|e| DbError::Corrupt(format!("timestamp {:?}: {}", row.timestamp, e)))?;

        Ok(InsightRecord {
            insight_id: row.insight_id,
            alert_id: row.alert_id,
            patient_id: row.patient_id,
            alert_type,
            emotional_urgency: row.emotional_urgency,
            emotional_context: row.emotional_context,
            vitals,
            recent_alert_count: row.recent_alert_count.max(0) as usize,
            timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlertRecord, NewAlert, UrgencyLevel};
    use chrono::Utc;

    fn setup() -> (Database, AlertRecord) {
        let db = Database::open_in_memory().unwrap();
        let alert = AlertRecord::from_submission(
            NewAlert::new("p-1", AlertType::Pain).with_vitals(Vitals {
                heart_rate: Some(105),
                blood_pressure: Some("150/95".into()),
                mood_score: Some(4),
            }),
            Utc::now(),
        );
        db.insert_alert(&alert).unwrap();
        (db, alert)
    }

    #[test]
    fn test_insert_and_get() {
        let (db, alert) = setup();
        let insight = InsightRecord::for_alert(&alert, 11, UrgencyLevel::High, 1, Utc::now());

        let id = db.insert_insight(&insight).unwrap();
        assert_eq!(id, insight.insight_id);

        let retrieved = db.get_insight(&id).unwrap().unwrap();
        assert_eq!(retrieved, insight);

        let by_alert = db.get_insight_for_alert(&alert.alert_id).unwrap().unwrap();
        assert_eq!(by_alert.insight_id, id);
    }

    #[test]
    fn test_insights_are_immutable() {
        let (db, alert) = setup();
        let insight = InsightRecord::for_alert(&alert, 11, UrgencyLevel::High, 1, Utc::now());
        db.insert_insight(&insight).unwrap();

        let update = db.conn().execute(
            "UPDATE emotion_insights SET emotional_urgency = 0 WHERE insight_id = ?",
            [&insight.insight_id],
        );
        assert!(update.is_err());

        let delete = db.conn().execute(
            "DELETE FROM emotion_insights WHERE insight_id = ?",
            [&insight.insight_id],
        );
        assert!(delete.is_err());
    }

    #[test]
    fn test_insight_requires_alert() {
        let db = Database::open_in_memory().unwrap();
        let orphan = AlertRecord::from_submission(NewAlert::new("p-1", AlertType::Pain), Utc::now());
        let insight = InsightRecord::for_alert(&orphan, 8, UrgencyLevel::Moderate, 1, Utc::now());
        assert!(db.insert_insight(&insight).is_err());
    }

    #[test]
    fn test_list_for_patient() {
        let (db, alert) = setup();
        db.insert_insight(&InsightRecord::for_alert(&alert, 9, UrgencyLevel::Moderate, 1, Utc::now()))
            .unwrap();

        assert_eq!(db.list_insights_for_patient("p-1", 10).unwrap().len(), 1);
        assert!(db.list_insights_for_patient("p-2", 10).unwrap().is_empty());
    }
}
