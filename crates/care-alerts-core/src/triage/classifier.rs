//! Score-to-context classification.

use crate::models::UrgencyLevel;

/// Lowest score classified as critical.
pub const CRITICAL_THRESHOLD: i64 = 15;
/// Lowest score classified as high.
pub const HIGH_THRESHOLD: i64 = 10;
/// Lowest score classified as moderate.
pub const MODERATE_THRESHOLD: i64 = 5;

/// Maps an urgency score onto one of four ordered tiers.
///
/// Thresholds are inclusive at their lower bound and checked highest first.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextClassifier;

impl ContextClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, score: i64) -> UrgencyLevel {
        if score >= CRITICAL_THRESHOLD {
            UrgencyLevel::Critical
        } else if score >= HIGH_THRESHOLD {
            UrgencyLevel::High
        } else if score >= MODERATE_THRESHOLD {
            UrgencyLevel::Moderate
        } else {
            UrgencyLevel::Low
        }
    }

    /// The caregiver-facing label for a score.
    pub fn emotional_context(&self, score: i64) -> &'static str {
        self.classify(score).label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        let classifier = ContextClassifier::new();
        assert_eq!(classifier.emotional_context(4), "Low: Routine follow-up");
        assert_eq!(classifier.emotional_context(5), "Moderate: Check promptly");
        assert_eq!(classifier.emotional_context(9), "Moderate: Check promptly");
        assert_eq!(classifier.emotional_context(10), "High: Urgent response needed");
        assert_eq!(classifier.emotional_context(14), "High: Urgent response needed");
        assert_eq!(classifier.emotional_context(15), "Critical: Immediate attention required");
    }

    #[test]
    fn test_extremes() {
        let classifier = ContextClassifier::new();
        assert_eq!(classifier.classify(i64::MIN), UrgencyLevel::Low);
        assert_eq!(classifier.classify(0), UrgencyLevel::Low);
        assert_eq!(classifier.classify(1_000), UrgencyLevel::Critical);
    }
}
