//! Quick model on season averages only.
//!
//! Attack is goals per game, defence is `2 - conceded per game`. Only the
//! statistics endpoint is needed, which keeps batch runs to two requests per
//! fixture.

use super::cards::predict_match_cards;
use super::markets::{alternative_markets, identify_value_bets};
use super::poisson::ScoreMatrix;
use super::{DataNeeds, MatchInput, PredictionModel};
use crate::error::PredictionError;
use crate::models::{
    Confidence, ExpectedGoals, MatchPrediction, PredictionMetadata, TeamSeasonStats,
};

pub const DEFAULT_HOME_ADVANTAGE: f64 = 1.2;
const MAX_GOALS: u32 = 5;
const MIN_XG: f64 = 0.3;
const MAX_XG: f64 = 4.0;

#[derive(Debug, Clone)]
pub struct SimplePoissonModel {
    home_advantage: f64,
}

impl SimplePoissonModel {
    pub fn new() -> Self {
        Self::with_home_advantage(DEFAULT_HOME_ADVANTAGE)
    }

    pub fn with_home_advantage(home_advantage: f64) -> Self {
        Self { home_advantage }
    }

    pub fn expected_goals(&self, home: &TeamSeasonStats, away: &TeamSeasonStats) -> ExpectedGoals {
        let h = home.metrics_or_default();
        let a = away.metrics_or_default();
        let home_defense = 2.0 - h.goals_against_per_game;
        let away_defense = 2.0 - a.goals_against_per_game;

        let home_xg = (h.goals_per_game * away_defense * self.home_advantage).clamp(MIN_XG, MAX_XG);
        let away_xg = (a.goals_per_game * home_defense).clamp(MIN_XG, MAX_XG);
        ExpectedGoals::new(home_xg, away_xg)
    }
}

impl Default for SimplePoissonModel {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionModel for SimplePoissonModel {
    fn name(&self) -> &'static str {
        "simple"
    }

    fn needs(&self) -> DataNeeds {
        DataNeeds {
            season_stats: true,
            ..Default::default()
        }
    }

    fn predict(&self, input: &MatchInput) -> Result<MatchPrediction, PredictionError> {
        input.validate()?;

        let xg = self.expected_goals(&input.home_stats, &input.away_stats);
        let probabilities = ScoreMatrix::new(xg.home, xg.away, MAX_GOALS)
            .outcome_split()
            .normalized();

        let home_games = input.home_stats.games_played();
        let away_games = input.away_stats.games_played();
        let confidence = Confidence::from_sample(home_games.min(away_games) as usize, 10, 5);

        let mut prediction = MatchPrediction::basic(
            probabilities,
            xg,
            PredictionMetadata {
                confidence,
                model: self.name().to_string(),
                home_games_analyzed: home_games,
                away_games_analyzed: away_games,
                fallback: false,
                data_quality: None,
                notes: Vec::new(),
            },
        );
        prediction.cards = predict_match_cards(&xg);
        prediction.markets = Some(alternative_markets(&xg));
        prediction.value_bets = identify_value_bets(&probabilities, &xg);
        Ok(prediction)
    }
}
