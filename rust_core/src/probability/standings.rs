//! Table-position heuristic.
//!
//! Used for the quick fixtures overview where only standings are loaded.

use super::cards::predict_match_cards;
use super::team_stats::LeagueAverages;
use super::{DataNeeds, MatchInput, PredictionModel};
use crate::error::PredictionError;
use crate::models::{
    Confidence, ExpectedGoals, MatchPrediction, OutcomeProbabilities, PredictionMetadata,
};

const BASE_PCT: i64 = 35;
const HOME_ADVANTAGE_PCT: i64 = 10;
const MIN_PCT: i64 = 15;
const MAX_PCT: i64 = 75;

/// Probabilities and a side bet from league positions (1 = top).
///
/// `delta = away_pos - home_pos`, so a positive delta means the home side
/// sits higher in the table.
pub fn standings_heuristic(
    home_pos: Option<u32>,
    away_pos: Option<u32>,
) -> (OutcomeProbabilities, String) {
    let (Some(home_pos), Some(away_pos)) = (home_pos, away_pos) else {
        return (
            OutcomeProbabilities::new(0.35, 0.30, 0.35),
            "Over 2.5 Goals".to_string(),
        );
    };

    let delta = away_pos as i64 - home_pos as i64;
    let home = (BASE_PCT + HOME_ADVANTAGE_PCT + delta * 2).clamp(MIN_PCT, MAX_PCT);
    let away = (BASE_PCT - HOME_ADVANTAGE_PCT - delta * 2).clamp(MIN_PCT, MAX_PCT);
    let draw = 100 - home - away;

    let bet = if delta.abs() > 10 {
        if home_pos < away_pos {
            "Over 2.5 Goals"
        } else {
            "Under 2.5 Goals"
        }
    } else if delta.abs() < 3 {
        "Both Teams to Score"
    } else if home_pos.min(away_pos) < 6 {
        "+1.5 Goals"
    } else {
        "Under 3.5 Goals"
    };

    let probabilities = OutcomeProbabilities::new(
        home as f64 / 100.0,
        draw as f64 / 100.0,
        away as f64 / 100.0,
    );
    (probabilities, bet.to_string())
}

#[derive(Debug, Clone, Default)]
pub struct StandingsModel;

impl StandingsModel {
    pub fn new() -> Self {
        Self
    }
}

impl PredictionModel for StandingsModel {
    fn name(&self) -> &'static str {
        "standings"
    }

    fn needs(&self) -> DataNeeds {
        DataNeeds {
            standings: true,
            ..Default::default()
        }
    }

    fn predict(&self, input: &MatchInput) -> Result<MatchPrediction, PredictionError> {
        input.validate()?;

        let rank = |team_id| {
            input
                .table
                .as_ref()
                .and_then(|t| t.by_team_id(team_id))
                .map(|s| s.rank)
        };
        let home_pos = rank(input.home_team_id);
        let away_pos = rank(input.away_team_id);
        let (probabilities, bet) = standings_heuristic(home_pos, away_pos);

        let averages = LeagueAverages::default();
        let xg = ExpectedGoals::new(averages.home_goals, averages.away_goals);

        let mut notes = Vec::new();
        if home_pos.is_none() || away_pos.is_none() {
            notes.push("table position unknown".to_string());
        }

        let mut prediction = MatchPrediction::basic(
            probabilities,
            xg,
            PredictionMetadata {
                confidence: Confidence::Low,
                model: self.name().to_string(),
                home_games_analyzed: 0,
                away_games_analyzed: 0,
                fallback: false,
                data_quality: None,
                notes,
            },
        );
        prediction.cards = predict_match_cards(&xg);
        prediction.suggested_bet = Some(bet);
        Ok(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LeagueTable, Standing, TeamRef};

    #[test]
    fn test_heuristic_even_teams() {
        let (p, bet) = standings_heuristic(Some(8), Some(9));
        assert_eq!(p.rounded_percentages(), (47, 30, 23));
        assert_eq!(bet, "Both Teams to Score");
    }

    #[test]
    fn test_heuristic_clamps() {
        let (p, bet) = standings_heuristic(Some(1), Some(20));
        assert_eq!(p.rounded_percentages(), (75, 10, 15));
        assert_eq!(bet, "Over 2.5 Goals");

        let (p, bet) = standings_heuristic(Some(20), Some(2));
        assert_eq!(p.rounded_percentages(), (15, 24, 61));
        assert_eq!(bet, "Under 2.5 Goals");
    }

    #[test]
    fn test_heuristic_mid_gap_bets() {
        assert_eq!(standings_heuristic(Some(3), Some(9)).1, "+1.5 Goals");
        assert_eq!(standings_heuristic(Some(8), Some(14)).1, "Under 3.5 Goals");
    }

    #[test]
    fn test_heuristic_unknown_position() {
        let (p, bet) = standings_heuristic(None, Some(4));
        assert_eq!(p.rounded_percentages(), (35, 30, 35));
        assert_eq!(bet, "Over 2.5 Goals");
    }

    #[test]
    fn test_model_uses_table() {
        let row = |rank, id| Standing {
            rank,
            team: TeamRef::new(id, format!("Team {}", id)),
            points: 0,
            goal_difference: 0,
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
            form: None,
        };
        let mut input = MatchInput::new(1, 2, 39, 2024);
        input.table = Some(LeagueTable {
            league_id: 39,
            season: 2024,
            rows: vec![row(2, 1), row(3, 2)],
        });

        let pred = StandingsModel::new().predict(&input).unwrap();
        assert!(pred.probabilities.is_valid());
        assert_eq!(pred.suggested_bet.as_deref(), Some("Both Teams to Score"));
        assert_eq!(pred.alternative_bet(), "Both Teams to Score");
        assert!(pred.metadata.notes.is_empty());
    }
}
