//! Prediction returned when a model cannot produce a result.

use tracing::warn;

use crate::models::{
    CardsPrediction, Confidence, ExpectedGoals, MatchPrediction, OutcomeProbabilities,
    PredictionMetadata,
};

/// Fixed 40/25/35 split with default cards, marked as fallback.
pub fn fallback_prediction(reason: impl Into<String>) -> MatchPrediction {
    let reason = reason.into();
    warn!("Fallback prediction used: {}", reason);

    let mut prediction = MatchPrediction::basic(
        OutcomeProbabilities::new(0.40, 0.25, 0.35),
        ExpectedGoals::new(1.5, 1.3),
        PredictionMetadata {
            confidence: Confidence::Low,
            model: "fallback".to_string(),
            home_games_analyzed: 0,
            away_games_analyzed: 0,
            fallback: true,
            data_quality: None,
            notes: vec![reason],
        },
    );
    prediction.cards = CardsPrediction::default();
    prediction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_values() {
        let p = fallback_prediction("no data");
        assert!(p.is_fallback());
        assert!(p.probabilities.is_valid());
        assert_eq!(p.probabilities.predicted(), (crate::models::Outcome::Home, 40));
        assert!((p.expected_goals.total - 2.8).abs() < 1e-9);
        assert_eq!(p.cards.total, 3.5);
        assert_eq!(p.metadata.confidence, Confidence::Low);
        assert_eq!(p.metadata.notes, vec!["no data".to_string()]);
    }
}
