//! Poisson distribution helpers and scoreline matrices.

use crate::models::{OutcomeProbabilities, ScoreLine};

/// P(X = k) for X ~ Poisson(lambda).
///
/// A non-positive rate puts all mass on zero.
pub fn pmf(k: u32, lambda: f64) -> f64 {
    if lambda <= 0.0 {
        return if k == 0 { 1.0 } else { 0.0 };
    }
    // log-space keeps large k stable
    let ln_fact: f64 = (2..=k).map(|i| (i as f64).ln()).sum();
    (k as f64 * lambda.ln() - lambda - ln_fact).exp()
}

/// P(X <= k) for X ~ Poisson(lambda).
pub fn cdf(k: u32, lambda: f64) -> f64 {
    if lambda <= 0.0 {
        return 1.0;
    }
    let mut term = (-lambda).exp();
    let mut total = term;
    for i in 1..=k {
        term *= lambda / i as f64;
        total += term;
    }
    total.min(1.0)
}

/// Independent-Poisson joint distribution of home and away goals.
#[derive(Debug, Clone)]
pub struct ScoreMatrix {
    max_goals: u32,
    cells: Vec<f64>,
}

impl ScoreMatrix {
    /// Grid of 0..=max_goals for both sides.
    pub fn new(home_xg: f64, away_xg: f64, max_goals: u32) -> Self {
        let n = max_goals as usize + 1;
        let home: Vec<f64> = (0..=max_goals).map(|k| pmf(k, home_xg)).collect();
        let away: Vec<f64> = (0..=max_goals).map(|k| pmf(k, away_xg)).collect();
        let mut cells = Vec::with_capacity(n * n);
        for h in &home {
            for a in &away {
                cells.push(h * a);
            }
        }
        Self { max_goals, cells }
    }

    pub fn max_goals(&self) -> u32 {
        self.max_goals
    }

    pub fn get(&self, home_goals: u32, away_goals: u32) -> f64 {
        if home_goals > self.max_goals || away_goals > self.max_goals {
            return 0.0;
        }
        let n = self.max_goals as usize + 1;
        self.cells[home_goals as usize * n + away_goals as usize]
    }

    /// Raw home / draw / away mass covered by the grid (not normalised).
    ///
    /// Home wins are the cells below the diagonal, draws the diagonal and
    /// away wins the cells above it.
    pub fn outcome_split(&self) -> OutcomeProbabilities {
        let (mut home, mut draw, mut away) = (0.0, 0.0, 0.0);
        for h in 0..=self.max_goals {
            for a in 0..=self.max_goals {
                let p = self.get(h, a);
                match h.cmp(&a) {
                    std::cmp::Ordering::Greater => home += p,
                    std::cmp::Ordering::Equal => draw += p,
                    std::cmp::Ordering::Less => away += p,
                }
            }
        }
        OutcomeProbabilities::new(home, draw, away)
    }

    /// The `n` most likely scorelines, highest first.
    pub fn top_scores(&self, n: usize) -> Vec<ScoreLine> {
        let mut lines: Vec<ScoreLine> = (0..=self.max_goals)
            .flat_map(|h| (0..=self.max_goals).map(move |a| (h, a)))
            .map(|(h, a)| ScoreLine {
                home_goals: h,
                away_goals: a,
                probability: self.get(h, a),
            })
            .collect();
        lines.sort_by(|x, y| y.probability.total_cmp(&x.probability));
        lines.truncate(n);
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pmf_known_values() {
        // e^-1.5
        assert!((pmf(0, 1.5) - 0.223_130_160).abs() < 1e-8);
        // 1.5^2 e^-1.5 / 2
        assert!((pmf(2, 1.5) - 0.251_021_430).abs() < 1e-8);
        assert_eq!(pmf(0, 0.0), 1.0);
        assert_eq!(pmf(3, 0.0), 0.0);
    }

    #[test]
    fn test_cdf_matches_pmf_sum() {
        let lambda = 3.5;
        let summed: f64 = (0..=4).map(|k| pmf(k, lambda)).sum();
        assert!((cdf(4, lambda) - summed).abs() < 1e-12);
        assert!(cdf(60, lambda) > 0.999_999);
    }

    #[test]
    fn test_matrix_mass_and_split() {
        let m = ScoreMatrix::new(1.4, 1.1, 10);
        let split = m.outcome_split();
        assert!((split.sum() - 1.0).abs() < 1e-4);
        assert!(split.home_win > split.away_win);
    }

    #[test]
    fn test_symmetric_rates_split_evenly() {
        let split = ScoreMatrix::new(1.3, 1.3, 10).outcome_split();
        assert!((split.home_win - split.away_win).abs() < 1e-12);
    }

    #[test]
    fn test_top_scores_sorted() {
        let top = ScoreMatrix::new(1.5, 0.8, 4).top_scores(5);
        assert_eq!(top.len(), 5);
        assert!(top.windows(2).all(|w| w[0].probability >= w[1].probability));
        assert_eq!((top[0].home_goals, top[0].away_goals), (1, 0));
    }

    #[test]
    fn test_out_of_grid_is_zero() {
        let m = ScoreMatrix::new(1.0, 1.0, 4);
        assert_eq!(m.get(5, 0), 0.0);
    }
}
