//! Prediction result types.
//!
//! Represents the output of the (stub) fracture scorer for one image.

use serde::{Deserialize, Serialize};

/// Scores strictly above this value are labelled as a fracture.
pub const FRACTURE_THRESHOLD: f64 = 0.5;

/// Binary fracture classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FractureLabel {
    FractureDetected,
    NoFracture,
}

impl FractureLabel {
    /// Label for a confidence score.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score > FRACTURE_THRESHOLD {
            Self::FractureDetected
        } else {
            Self::NoFracture
        }
    }
}

impl std::fmt::Display for FractureLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FractureDetected => write!(f, "Fracture Detected"),
            Self::NoFracture => write!(f, "No Fracture"),
        }
    }
}

/// Stub prediction for one uploaded image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// 1-based position of the image in its upload batch
    pub image_index: usize,

    /// Confidence score (0.0 to 1.0)
    pub confidence_score: f64,

    /// Thresholded label
    pub label: FractureLabel,
}

impl PredictionResult {
    /// Create a prediction, clamping the score into [0, 1].
    ///
    /// NaN scores are treated as 0.
    #[must_use]
    pub fn new(image_index: usize, score: f64) -> Self {
        let confidence_score = if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) };
        Self {
            image_index,
            confidence_score,
            label: FractureLabel::from_score(confidence_score),
        }
    }

    /// Confidence in the reported label, as a fraction.
    ///
    /// `score` for a detected fracture, `1 - score` otherwise.
    #[must_use]
    pub fn label_confidence(&self) -> f64 {
        match self.label {
            FractureLabel::FractureDetected => self.confidence_score,
            FractureLabel::NoFracture => 1.0 - self.confidence_score,
        }
    }

    /// Label confidence formatted as a percentage, e.g. `73.4%`.
    #[must_use]
    pub fn delta(&self) -> String {
        format!("{:.1}%", self.label_confidence() * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_strict() {
        assert_eq!(FractureLabel::from_score(0.5), FractureLabel::NoFracture);
        assert_eq!(FractureLabel::from_score(0.500_001), FractureLabel::FractureDetected);
        assert_eq!(FractureLabel::from_score(0.0), FractureLabel::NoFracture);
        assert_eq!(FractureLabel::from_score(1.0), FractureLabel::FractureDetected);
    }

    #[test]
    fn test_scores_are_clamped() {
        assert_eq!(PredictionResult::new(1, 1.7).confidence_score, 1.0);
        assert_eq!(PredictionResult::new(1, -0.2).confidence_score, 0.0);
        assert_eq!(PredictionResult::new(1, f64::NAN).confidence_score, 0.0);
    }

    #[test]
    fn test_delta() {
        assert_eq!(PredictionResult::new(1, 0.8).delta(), "80.0%");
        assert_eq!(PredictionResult::new(2, 0.25).delta(), "75.0%");
    }

    #[test]
    fn test_label_display() {
        assert_eq!(FractureLabel::FractureDetected.to_string(), "Fracture Detected");
        assert_eq!(FractureLabel::NoFracture.to_string(), "No Fracture");
    }
}
