//! SQLite schema definition.

/// Complete database schema for care-alerts.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Alerts (append-only except resolved / ai_advice)
-- ============================================================================

CREATE TABLE IF NOT EXISTS alerts (
    alert_id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL,
    alert_type TEXT NOT NULL CHECK (alert_type IN ('medication', 'assistance', 'pain', 'emergency')),
    heart_rate INTEGER,
    blood_pressure TEXT,                         -- raw "systolic/diastolic", may be malformed
    mood_score INTEGER,
    timestamp TEXT NOT NULL,                     -- RFC 3339, fixed precision, UTC 'Z'
    resolved INTEGER NOT NULL DEFAULT 0,
    ai_advice TEXT
);

-- Recency window lookups
CREATE INDEX IF NOT EXISTS idx_alerts_patient_time ON alerts(patient_id, timestamp);
CREATE INDEX IF NOT EXISTS idx_alerts_time ON alerts(timestamp);

-- ============================================================================
-- Emotion Insights (immutable after creation)
-- ============================================================================

CREATE TABLE IF NOT EXISTS emotion_insights (
    insight_id TEXT PRIMARY KEY,
    alert_id TEXT NOT NULL REFERENCES alerts(alert_id),
    patient_id TEXT NOT NULL,
    alert_type TEXT NOT NULL,
    emotional_urgency INTEGER NOT NULL,
    emotional_context TEXT NOT NULL,
    vitals TEXT NOT NULL DEFAULT '{}',           -- JSON snapshot of Vitals
    recent_alert_count INTEGER NOT NULL,
    timestamp TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_insights_patient ON emotion_insights(patient_id, timestamp);
CREATE INDEX IF NOT EXISTS idx_insights_alert ON emotion_insights(alert_id);

-- Insights are never updated or deleted
CREATE TRIGGER IF NOT EXISTS emotion_insights_no_update BEFORE UPDATE ON emotion_insights
BEGIN
    SELECT RAISE(ABORT, 'Insights are immutable');
END;

CREATE TRIGGER IF NOT EXISTS emotion_insights_no_delete BEFORE DELETE ON emotion_insights
BEGIN
    SELECT RAISE(ABORT, 'Insights are immutable');
END;
"#;
