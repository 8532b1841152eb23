//! Catch-feasibility simulation
//!
//! Decides in closed form whether a hunter closing on a prey in open
//! pursuit reaches it inside a fixed time budget.

use crate::position::{EuclideanPositioner, Position, Positioner};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Speed and position of one side of a pursuit
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Subject {
    pub speed: f64,
    pub position: Option<Position>,
}

impl Subject {
    pub fn new(speed: f64, position: Option<Position>) -> Self {
        Self { speed, position }
    }
}

/// Outcome of one simulated pursuit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pursuit {
    /// The hunter closes the gap after `time` units
    Caught { time: f64 },
    Escaped,
}

impl Pursuit {
    pub fn is_caught(&self) -> bool {
        matches!(self, Pursuit::Caught { .. })
    }

    pub fn time(&self) -> Option<f64> {
        match self {
            Pursuit::Caught { time } => Some(*time),
            Pursuit::Escaped => None,
        }
    }
}

/// Decides whether a hunter can catch a prey.
///
/// Implementations hold no mutable state and may be shared between hunters.
pub trait CatchSimulator: Send + Sync {
    fn simulate(&self, hunter: &Subject, prey: &Subject) -> Pursuit;

    fn can_catch(&self, hunter: &Subject, prey: &Subject) -> bool {
        self.simulate(hunter, prey).is_caught()
    }
}

/// Settings fixed for the lifetime of a simulator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    pub max_time_to_catch: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self { max_time_to_catch: 100.0 }
    }
}

/// Open-pursuit simulator: the gap closes at `hunter.speed - prey.speed`.
///
/// A subject without a position can never be caught or catch anything.
pub struct DefaultCatchSimulator {
    max_time_to_catch: f64,
    positioner: Arc<dyn Positioner>,
}

impl DefaultCatchSimulator {
    pub fn new(config: SimulatorConfig, positioner: Arc<dyn Positioner>) -> Self {
        Self {
            max_time_to_catch: config.max_time_to_catch,
            positioner,
        }
    }

    /// Simulator measuring straight-line distances
    pub fn euclidean(config: SimulatorConfig) -> Self {
        Self::new(config, Arc::new(EuclideanPositioner))
    }

    pub fn max_time_to_catch(&self) -> f64 {
        self.max_time_to_catch
    }

    /// The positioner this simulator measures gaps with
    pub fn positioner(&self) -> &dyn Positioner {
        self.positioner.as_ref()
    }
}

impl CatchSimulator for DefaultCatchSimulator {
    fn simulate(&self, hunter: &Subject, prey: &Subject) -> Pursuit {
        let (Some(from), Some(to)) = (hunter.position, prey.position) else {
            warn!("pursuit simulated with a missing position, treating as escaped");
            return Pursuit::Escaped;
        };

        let distance = self.positioner.linear_distance(&from, &to);

        if hunter.speed <= prey.speed {
            debug!(hunter_speed = hunter.speed, prey_speed = prey.speed, "hunter is not faster than prey");
            return Pursuit::Escaped;
        }

        let relative_speed = hunter.speed - prey.speed;
        let time_to_catch = distance / relative_speed;

        debug!(distance, relative_speed, time_to_catch, max_time = self.max_time_to_catch, "pursuit simulated");

        if time_to_catch <= self.max_time_to_catch {
            Pursuit::Caught { time: time_to_catch }
        } else {
            Pursuit::Escaped
        }
    }
}
