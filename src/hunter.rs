//! Hunter: configures a pursuer and runs hunt attempts against a prey

use crate::error::{HuntError, Role};
use crate::position::Position;
use crate::prey::Prey;
use crate::simulator::{CatchSimulator, Pursuit, Subject};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Result of a successful hunt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HuntReport {
    /// Simulated time the hunter needed to reach the prey
    pub duration: f64,
}

/// Something that can be configured and sent after a prey.
///
/// Each hunt is independent and leaves the hunter unchanged. Instances are
/// not synchronised; callers sharing one between threads must serialise
/// `configure` against `hunt` themselves.
pub trait Hunter: Send {
    fn configure(&mut self, speed: f64, position: Option<Position>);

    fn hunt(&self, prey: &dyn Prey) -> Result<HuntReport, HuntError>;
}

/// Hunter delegating the catch decision to a shared simulator.
///
/// A hunt with either position unconfigured is rejected with
/// [`HuntError::Unconfigured`] before the simulator is consulted.
pub struct Pursuer {
    speed: f64,
    position: Option<Position>,
    simulator: Arc<dyn CatchSimulator>,
}

impl Pursuer {
    pub fn new(speed: f64, position: Option<Position>, simulator: Arc<dyn CatchSimulator>) -> Self {
        Self { speed, position, simulator }
    }

    /// Unconfigured pursuer using the given simulator
    pub fn with_simulator(simulator: Arc<dyn CatchSimulator>) -> Self {
        Self::new(0.0, None, simulator)
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    fn subject(&self) -> Subject {
        Subject::new(self.speed, self.position)
    }
}

impl Hunter for Pursuer {
    fn configure(&mut self, speed: f64, position: Option<Position>) {
        self.speed = speed;
        self.position = position;
    }

    fn hunt(&self, prey: &dyn Prey) -> Result<HuntReport, HuntError> {
        let hunter = self.subject();
        let prey = prey.subject();

        if hunter.position.is_none() {
            return Err(HuntError::Unconfigured(Role::Hunter));
        }
        if prey.position.is_none() {
            return Err(HuntError::Unconfigured(Role::Prey));
        }

        match self.simulator.simulate(&hunter, &prey) {
            Pursuit::Caught { time } => {
                debug!(duration = time, "prey caught");
                Ok(HuntReport { duration: time })
            }
            Pursuit::Escaped => {
                debug!("prey escaped");
                Err(HuntError::CannotCatch)
            }
        }
    }
}
