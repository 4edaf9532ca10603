//! Prediction Model Abstractions
//!
//! Defines the PredictionModel trait that lets the predictor swap between
//! the full Poisson model, the quick season-average model and the
//! table-position heuristic. The building blocks (Poisson grids, form,
//! strength, head-to-head, cards, side markets) are pure functions.

use crate::error::PredictionError;
use crate::models::{
    CompletedMatch, LeagueTable, MatchHistory, MatchPrediction, TeamSeasonStats,
};

pub mod cards;
pub mod fallback;
pub mod form;
pub mod full;
pub mod h2h;
pub mod markets;
pub mod poisson;
pub mod simple;
pub mod standings;
pub mod strength;
pub mod team_stats;

pub use cards::{analyze_cards, predict_match_cards, CardAnalysis, CardTrend};
pub use fallback::fallback_prediction;
pub use form::{calculate_form_factor, FormAnalysis, Trend};
pub use full::PoissonModel;
pub use h2h::{analyze_head_to_head, HeadToHead};
pub use simple::SimplePoissonModel;
pub use standings::{standings_heuristic, StandingsModel};
pub use strength::{calculate_strength_index, StrengthIndex};
pub use team_stats::{calculate_team_stats, TeamPerformance};

/// Which inputs a model wants the predictor to fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataNeeds {
    pub season_stats: bool,
    pub match_history: bool,
    pub head_to_head: bool,
    pub standings: bool,
}

/// Everything gathered for one fixture. Fields a model did not ask for are
/// left empty.
#[derive(Debug, Clone)]
pub struct MatchInput {
    pub home_team_id: u32,
    pub away_team_id: u32,
    pub league_id: u32,
    pub home_stats: TeamSeasonStats,
    pub away_stats: TeamSeasonStats,
    pub home_history: MatchHistory,
    pub away_history: MatchHistory,
    /// Past meetings; `None` when the lookup failed.
    pub head_to_head: Option<Vec<CompletedMatch>>,
    pub table: Option<LeagueTable>,
}

impl MatchInput {
    /// Input with default stats and empty histories.
    pub fn new(home_team_id: u32, away_team_id: u32, league_id: u32, season: i32) -> Self {
        let empty = |team_id| MatchHistory {
            team_id,
            league_id,
            ..Default::default()
        };
        Self {
            home_team_id,
            away_team_id,
            league_id,
            home_stats: TeamSeasonStats::unavailable(home_team_id, league_id, season),
            away_stats: TeamSeasonStats::unavailable(away_team_id, league_id, season),
            home_history: empty(home_team_id),
            away_history: empty(away_team_id),
            head_to_head: None,
            table: None,
        }
    }

    pub fn validate(&self) -> Result<(), PredictionError> {
        if self.home_team_id == 0 {
            return Err(PredictionError::InvalidTeam(self.home_team_id));
        }
        if self.away_team_id == 0 || self.away_team_id == self.home_team_id {
            return Err(PredictionError::InvalidTeam(self.away_team_id));
        }
        Ok(())
    }
}

/// Universal prediction model trait
///
/// Implementations turn a [`MatchInput`] into outcome probabilities. Models
/// are synchronous; the predictor does all I/O up front according to
/// [`needs`](PredictionModel::needs).
pub trait PredictionModel: Send + Sync {
    /// Model name for logging and the `--model` flag
    fn name(&self) -> &'static str;

    fn needs(&self) -> DataNeeds;

    fn predict(&self, input: &MatchInput) -> Result<MatchPrediction, PredictionError>;
}

/// Prediction model registry
pub struct PredictionModelRegistry {
    models: Vec<Box<dyn PredictionModel>>,
}

impl PredictionModelRegistry {
    /// Registry with the built-in models
    pub fn new() -> Self {
        let models: Vec<Box<dyn PredictionModel>> = vec![
            Box::new(PoissonModel::new()),
            Box::new(SimplePoissonModel::new()),
            Box::new(StandingsModel::new()),
        ];
        Self { models }
    }

    pub fn get(&self, name: &str) -> Option<&dyn PredictionModel> {
        self.models
            .iter()
            .find(|m| m.name().eq_ignore_ascii_case(name))
            .map(|m| m.as_ref())
    }

    /// Removes and returns the named model.
    pub fn into_model(mut self, name: &str) -> Option<Box<dyn PredictionModel>> {
        let idx = self
            .models
            .iter()
            .position(|m| m.name().eq_ignore_ascii_case(name))?;
        Some(self.models.swap_remove(idx))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.models.iter().map(|m| m.name()).collect()
    }

    /// Add a custom model; it replaces any model with the same name
    pub fn register_model(&mut self, model: Box<dyn PredictionModel>) {
        self.models.retain(|m| m.name() != model.name());
        self.models.push(model);
    }
}

impl Default for PredictionModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mu = mean(values);
    let var = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_creation() {
        let registry = PredictionModelRegistry::new();
        assert_eq!(registry.names(), vec!["poisson", "simple", "standings"]);
        assert!(registry.get("SIMPLE").is_some());
        assert!(registry.get("elo").is_none());
    }

    #[test]
    fn test_into_model() {
        let model = PredictionModelRegistry::new().into_model("Standings").unwrap();
        assert_eq!(model.name(), "standings");
        assert!(PredictionModelRegistry::new().into_model("elo").is_none());
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = PredictionModelRegistry::new();
        registry.register_model(Box::new(SimplePoissonModel::with_home_advantage(1.1)));
        assert_eq!(registry.names().len(), 3);
        assert_eq!(registry.names().last(), Some(&"simple"));
    }

    #[test]
    fn test_input_validation() {
        assert!(MatchInput::new(1, 2, 39, 2024).validate().is_ok());
        assert_eq!(
            MatchInput::new(0, 2, 39, 2024).validate(),
            Err(PredictionError::InvalidTeam(0))
        );
        assert!(MatchInput::new(5, 5, 39, 2024).validate().is_err());
    }

    #[test]
    fn test_std_dev() {
        assert_eq!(std_dev(&[]), 0.0);
        assert!((std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]) - 2.0).abs() < 1e-12);
    }
}
