//! Pursuit Sim - catch-feasibility simulation for a hunter chasing a prey
//!
//! A hunter is configured with a speed and position, then sent after a prey.
//! The catch simulator decides in closed form whether the hunter closes the
//! gap within a fixed time budget.

pub mod config;
pub mod error;
pub mod position;
pub mod simulator;
pub mod prey;
pub mod hunter;
pub mod stats;
pub mod scenario;
pub mod server;
pub mod logging;

pub use config::*;
pub use error::*;
pub use position::*;
pub use simulator::*;
pub use prey::*;
pub use hunter::*;
pub use stats::*;
pub use scenario::*;
