//! Caregiver advisory prompts.

use crate::advisory::AlertSnapshot;

/// Persona and instructions sent ahead of every alert snapshot.
pub const SYSTEM_PROMPT: &str = "You are a healthcare assistant AI. Given the following patient alert data, provide a short, clear, and actionable advice for caregivers. Be specific and concise.";

/// Render an optional field the way the model sees it.
fn field<T: std::fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "None".to_string(),
    }
}

/// Build the advisory prompt for a single alert.
///
/// Every field is listed on its own line. Absent vitals are rendered as
/// `None` so the model can tell "not measured" apart from a zero reading.
pub fn build_advisory_prompt(snapshot: &AlertSnapshot) -> String {
    format!(
        "{}\nPatient ID: {}\nAlert Type: {}\nHeart Rate: {}\nBlood Pressure: {}\nMood Score: {}",
        SYSTEM_PROMPT,
        snapshot.patient_id,
        snapshot.alert_type,
        field(&snapshot.heart_rate),
        field(&snapshot.blood_pressure),
        field(&snapshot.mood_score),
    )
}
