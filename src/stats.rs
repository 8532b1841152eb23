//! Aggregated statistics over many evaluated pursuits

use serde::{Deserialize, Serialize};

/// Result of evaluating a single pursuit scenario
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub caught: bool,
    /// Time to catch; 0 when the prey escaped
    pub duration: f64,
    /// Starting distance between hunter and prey, if both were placed
    pub distance: Option<f64>,
}

/// Aggregated statistics from multiple scenario outcomes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatchStats {
    pub runs: usize,
    pub catches: usize,
    pub catch_rate: f64,
    pub avg_duration: f64,  // over catches only
    pub min_duration: f64,
    pub max_duration: f64,
    pub avg_distance: f64,
}

impl CatchStats {
    /// Create aggregated stats from a list of outcomes
    pub fn from_outcomes(outcomes: &[ScenarioOutcome]) -> Self {
        if outcomes.is_empty() {
            return Self::default();
        }

        let durations: Vec<f64> = outcomes.iter().filter(|o| o.caught).map(|o| o.duration).collect();
        let distances: Vec<f64> = outcomes.iter().filter_map(|o| o.distance).collect();

        let (avg_duration, min_duration, max_duration) = if durations.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            (
                durations.iter().sum::<f64>() / durations.len() as f64,
                durations.iter().copied().fold(f64::INFINITY, f64::min),
                durations.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            )
        };

        let avg_distance = if distances.is_empty() {
            0.0
        } else {
            distances.iter().sum::<f64>() / distances.len() as f64
        };

        Self {
            runs: outcomes.len(),
            catches: durations.len(),
            catch_rate: durations.len() as f64 / outcomes.len() as f64,
            avg_duration,
            min_duration,
            max_duration,
            avg_distance,
        }
    }
}
