//! Urgency scoring.
//!
//! Score = base weight of the alert type
//!       + vitals escalation (heart rate, mood, blood pressure; additive)
//!       + recency escalation (2 per recent alert, only when more than one)
//!
//! Within each vital sign the bands are exclusive: the severe band is
//! checked first and a value that hits it never also earns the mild band.
//! There is no upper clamp.

use serde::{Deserialize, Serialize};

use crate::models::{AlertType, BloodPressure, Vitals};

/// Escalation for a severe reading.
pub const SEVERE_ESCALATION: i64 = 3;
/// Escalation for a mildly abnormal reading.
pub const MILD_ESCALATION: i64 = 1;

/// Heart rate above this (bpm) is severe.
pub const HEART_RATE_SEVERE_HIGH: i64 = 120;
/// Heart rate below this (bpm) is severe.
pub const HEART_RATE_SEVERE_LOW: i64 = 50;
/// Heart rate above this (bpm) is mildly abnormal.
pub const HEART_RATE_MILD_HIGH: i64 = 100;
/// Heart rate below this (bpm) is mildly abnormal.
pub const HEART_RATE_MILD_LOW: i64 = 60;

/// Mood below this is severe distress.
pub const MOOD_SEVERE_BELOW: i64 = 3;
/// Mood below this is mild distress.
pub const MOOD_MILD_BELOW: i64 = 6;

pub const SYSTOLIC_SEVERE_ABOVE: i64 = 180;
pub const DIASTOLIC_SEVERE_ABOVE: i64 = 120;
pub const SYSTOLIC_MILD_ABOVE: i64 = 140;
pub const DIASTOLIC_MILD_ABOVE: i64 = 90;

/// Points added per recent alert once the count exceeds one.
pub const RECENCY_POINTS_PER_ALERT: i64 = 2;

/// Per-component contributions to an urgency score.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UrgencyBreakdown {
    pub base: i64,
    pub heart_rate: i64,
    pub mood: i64,
    pub blood_pressure: i64,
    pub recency: i64,
}

impl UrgencyBreakdown {
    /// Sum of the vital-sign contributions.
    pub fn vitals(&self) -> i64 {
        self.heart_rate + self.mood + self.blood_pressure
    }

    pub fn total(&self) -> i64 {
        self.base + self.vitals() + self.recency
    }
}

pub fn heart_rate_escalation(heart_rate: Option<i64>) -> i64 {
    match heart_rate {
        Some(hr) if hr > HEART_RATE_SEVERE_HIGH || hr < HEART_RATE_SEVERE_LOW => SEVERE_ESCALATION,
        Some(hr) if hr > HEART_RATE_MILD_HIGH || hr < HEART_RATE_MILD_LOW => MILD_ESCALATION,
        _ => 0,
    }
}

pub fn mood_escalation(mood_score: Option<i64>) -> i64 {
    match mood_score {
        Some(mood) if mood < MOOD_SEVERE_BELOW => SEVERE_ESCALATION,
        Some(mood) if mood < MOOD_MILD_BELOW => MILD_ESCALATION,
        _ => 0,
    }
}

/// Escalation for a raw blood pressure string. Malformed input scores zero.
pub fn blood_pressure_escalation(blood_pressure: Option<&str>) -> i64 {
    let Some(raw) = blood_pressure else {
        return 0;
    };
    match BloodPressure::parse(raw) {
        Ok(bp) => parsed_blood_pressure_escalation(&bp),
        Err(_) => 0,
    }
}

pub fn parsed_blood_pressure_escalation(bp: &BloodPressure) -> i64 {
    if bp.systolic > SYSTOLIC_SEVERE_ABOVE || bp.diastolic > DIASTOLIC_SEVERE_ABOVE {
        SEVERE_ESCALATION
    } else if bp.systolic > SYSTOLIC_MILD_ABOVE || bp.diastolic > DIASTOLIC_MILD_ABOVE {
        MILD_ESCALATION
    } else {
        0
    }
}

/// Repeated alerts escalate; a single one does not.
pub fn recency_escalation(recent_alert_count: usize) -> i64 {
    if recent_alert_count > 1 {
        RECENCY_POINTS_PER_ALERT.saturating_mul(recent_alert_count as i64)
    } else {
        0
    }
}

/// Stateless urgency scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrgencyScorer;

impl UrgencyScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score an alert, keeping each contribution.
    pub fn breakdown(
        &self,
        alert_type: AlertType,
        vitals: &Vitals,
        recent_alert_count: usize,
    ) -> UrgencyBreakdown {
        UrgencyBreakdown {
            base: alert_type.base_weight(),
            heart_rate: heart_rate_escalation(vitals.heart_rate),
            mood: mood_escalation(vitals.mood_score),
            blood_pressure: blood_pressure_escalation(vitals.blood_pressure.as_deref()),
            recency: recency_escalation(recent_alert_count),
        }
    }

    pub fn score(&self, alert_type: AlertType, vitals: &Vitals, recent_alert_count: usize) -> i64 {
        self.breakdown(alert_type, vitals, recent_alert_count).total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_weight_only() {
        let scorer = UrgencyScorer::new();
        for alert_type in AlertType::ALL {
            assert_eq!(
                scorer.score(alert_type, &Vitals::default(), 0),
                alert_type.base_weight()
            );
        }
    }

    #[test]
    fn test_heart_rate_bands() {
        assert_eq!(heart_rate_escalation(None), 0);
        assert_eq!(heart_rate_escalation(Some(130)), 3);
        assert_eq!(heart_rate_escalation(Some(121)), 3);
        assert_eq!(heart_rate_escalation(Some(120)), 1);
        assert_eq!(heart_rate_escalation(Some(101)), 1);
        assert_eq!(heart_rate_escalation(Some(100)), 0);
        assert_eq!(heart_rate_escalation(Some(75)), 0);
        assert_eq!(heart_rate_escalation(Some(60)), 0);
        assert_eq!(heart_rate_escalation(Some(59)), 1);
        assert_eq!(heart_rate_escalation(Some(50)), 1);
        assert_eq!(heart_rate_escalation(Some(49)), 3);
    }

    #[test]
    fn test_mood_bands() {
        assert_eq!(mood_escalation(None), 0);
        assert_eq!(mood_escalation(Some(0)), 3);
        assert_eq!(mood_escalation(Some(2)), 3);
        assert_eq!(mood_escalation(Some(3)), 1);
        assert_eq!(mood_escalation(Some(5)), 1);
        assert_eq!(mood_escalation(Some(6)), 0);
        assert_eq!(mood_escalation(Some(10)), 0);
    }

    #[test]
    fn test_blood_pressure_bands() {
        assert_eq!(blood_pressure_escalation(Some("190/80")), 3);
        assert_eq!(blood_pressure_escalation(Some("130/125")), 3);
        assert_eq!(blood_pressure_escalation(Some("150/95")), 1);
        assert_eq!(blood_pressure_escalation(Some("141/70")), 1);
        assert_eq!(blood_pressure_escalation(Some("120/91")), 1);
        assert_eq!(blood_pressure_escalation(Some("180/120")), 1);
        assert_eq!(blood_pressure_escalation(Some("140/90")), 0);
        assert_eq!(blood_pressure_escalation(None), 0);
    }

    #[test]
    fn test_malformed_blood_pressure_is_ignored() {
        assert_eq!(blood_pressure_escalation(Some("high")), 0);
        assert_eq!(blood_pressure_escalation(Some("190-125")), 0);
        assert_eq!(blood_pressure_escalation(Some("")), 0);
    }

    #[test]
    fn test_recency() {
        assert_eq!(recency_escalation(0), 0);
        assert_eq!(recency_escalation(1), 0);
        assert_eq!(recency_escalation(2), 4);
        assert_eq!(recency_escalation(3), 6);
    }

    #[test]
    fn test_zero_vitals_are_readings() {
        // A recorded 0 is a reading, not a missing value.
        assert_eq!(heart_rate_escalation(Some(0)), SEVERE_ESCALATION);
        assert_eq!(mood_escalation(Some(0)), SEVERE_ESCALATION);
        assert_eq!(heart_rate_escalation(None), 0);
        assert_eq!(mood_escalation(None), 0);
    }

    #[test]
    fn test_signals_are_additive() {
        let vitals = Vitals {
            heart_rate: Some(150),
            blood_pressure: Some("190/125".into()),
            mood_score: Some(2),
        };
        let breakdown = UrgencyScorer::new().breakdown(AlertType::Emergency, &vitals, 2);
        assert_eq!(breakdown.base, 10);
        assert_eq!(breakdown.vitals(), 9);
        assert_eq!(breakdown.recency, 4);
        assert_eq!(breakdown.total(), 23);
    }
}
