//! Prey: the subject being hunted

use crate::position::Position;
use crate::simulator::Subject;

/// Something a hunter can chase.
///
/// Instances are not synchronised; callers sharing one between threads
/// must serialise `configure` against reads themselves.
pub trait Prey: Send {
    fn configure(&mut self, speed: f64, position: Option<Position>);

    fn speed(&self) -> f64;

    fn position(&self) -> Option<Position>;

    /// The prey's side of a pursuit
    fn subject(&self) -> Subject {
        Subject::new(self.speed(), self.position())
    }
}

/// Prey with a configurable speed and position
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Quarry {
    speed: f64,
    position: Option<Position>,
}

impl Quarry {
    pub fn new(speed: f64, position: Option<Position>) -> Self {
        Self { speed, position }
    }
}

impl Prey for Quarry {
    fn configure(&mut self, speed: f64, position: Option<Position>) {
        self.speed = speed;
        self.position = position;
    }

    fn speed(&self) -> f64 {
        self.speed
    }

    fn position(&self) -> Option<Position> {
        self.position
    }
}
