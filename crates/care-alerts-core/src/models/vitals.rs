//! Vital-sign readings attached to an alert.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Optional vitals reported with an alert.
///
/// Each field is independently optional; an absent field contributes
/// nothing to the urgency score.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vitals {
    /// Beats per minute
    pub heart_rate: Option<i64>,
    /// `"<systolic>/<diastolic>"`, kept verbatim even when malformed
    pub blood_pressure: Option<String>,
    /// Lower means more distress
    pub mood_score: Option<i64>,
}

impl Vitals {
    /// True when no vital sign was reported.
    pub fn is_empty(&self) -> bool {
        self.heart_rate.is_none() && self.blood_pressure.is_none() && self.mood_score.is_none()
    }

    /// Parse the blood pressure field, if any.
    ///
    /// `None` when absent, `Some(Err(_))` when present but malformed.
    pub fn parsed_blood_pressure(&self) -> Option<Result<BloodPressure, VitalsParseError>> {
        self.blood_pressure.as_deref().map(BloodPressure::parse)
    }
}

/// Why a vitals string could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VitalsParseError {
    #[error("Expected \"systolic/diastolic\", got {0:?}")]
    Shape(String),

    #[error("Not an integer: {0:?}")]
    NotInteger(String),
}

/// A parsed blood pressure reading in mmHg.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BloodPressure {
    pub systolic: i64,
    pub diastolic: i64,
}

impl BloodPressure {
    /// Parse `"<systolic>/<diastolic>"`.
    pub fn parse(raw: &str) -> Result<Self, VitalsParseError> {
        let mut parts = raw.split('/');
        let (Some(systolic), Some(diastolic), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(VitalsParseError::Shape(raw.to_string()));
        };

        Ok(Self {
            systolic: parse_int(systolic)?,
            diastolic: parse_int(diastolic)?,
        })
    }
}

fn parse_int(part: &str) -> Result<i64, VitalsParseError> {
    part.trim()
        .parse::<i64>()
        .map_err(|_| VitalsParseError::NotInteger(part.to_string()))
}
