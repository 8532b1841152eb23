//! Offline evaluation of pursuit scenarios
//!
//! Scenarios are wired through the same hunter, prey and simulator types the
//! service uses. Batches can run sequentially or on a rayon pool, and a
//! Monte Carlo sweep estimates how often a hunter catches a randomly placed
//! prey.

use crate::config::{load_file, validate_budget, SubjectSpec};
use crate::error::{ConfigError, HuntError, SweepError};
use crate::hunter::{Hunter, Pursuer};
use crate::position::{EuclideanPositioner, Position, Positioner};
use crate::prey::Quarry;
use crate::simulator::{CatchSimulator, DefaultCatchSimulator, SimulatorConfig};
use crate::stats::{CatchStats, ScenarioOutcome};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// One hunter/prey pairing with its time budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    pub hunter: SubjectSpec,
    pub prey: SubjectSpec,
    pub max_time_to_catch: f64,
}

/// A file full of scenarios
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSet {
    pub scenarios: Vec<Scenario>,
}

impl ScenarioSet {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let set: ScenarioSet = load_file(path)?;
        set.validate()?;
        Ok(set)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, s) in self.scenarios.iter().enumerate() {
            let label = s.name.clone().unwrap_or_else(|| format!("#{}", i));
            validate_budget(s.max_time_to_catch)
                .and_then(|_| s.hunter.validate())
                .and_then(|_| s.prey.validate())
                .map_err(|e| ConfigError::Invalid(format!("scenario {}: {}", label, e)))?;
        }
        Ok(())
    }
}

/// Run one hunt, measuring the starting gap with the simulator's own positioner
fn run_hunt(
    simulator: Arc<dyn CatchSimulator>,
    positioner: &dyn Positioner,
    hunter: &SubjectSpec,
    prey: &SubjectSpec,
) -> Result<ScenarioOutcome, HuntError> {
    let pursuer = Pursuer::new(hunter.speed, hunter.position, simulator);
    let quarry = Quarry::new(prey.speed, prey.position);

    let distance = match (hunter.position, prey.position) {
        (Some(from), Some(to)) => Some(positioner.linear_distance(&from, &to)),
        _ => None,
    };

    match pursuer.hunt(&quarry) {
        Ok(report) => Ok(ScenarioOutcome { caught: true, duration: report.duration, distance }),
        Err(HuntError::CannotCatch) => Ok(ScenarioOutcome { caught: false, duration: 0.0, distance }),
        Err(e) => Err(e),
    }
}

/// Evaluate one scenario with straight-line distances.
///
/// An escape is a normal outcome; only an unplaced hunter or prey is an error.
pub fn evaluate(scenario: &Scenario) -> Result<ScenarioOutcome, HuntError> {
    evaluate_with_positioner(scenario, Arc::new(EuclideanPositioner))
}

/// Evaluate one scenario, measuring distances with `positioner`
pub fn evaluate_with_positioner(
    scenario: &Scenario,
    positioner: Arc<dyn Positioner>,
) -> Result<ScenarioOutcome, HuntError> {
    let simulator = Arc::new(DefaultCatchSimulator::new(
        SimulatorConfig { max_time_to_catch: scenario.max_time_to_catch },
        positioner,
    ));
    let outcome = run_hunt(simulator.clone(), simulator.positioner(), &scenario.hunter, &scenario.prey)?;
    debug!(name = ?scenario.name, caught = outcome.caught, duration = outcome.duration, "scenario evaluated");
    Ok(outcome)
}

/// Evaluate a batch of scenarios, preserving input order
pub fn evaluate_all(scenarios: &[Scenario], parallel: bool) -> Result<Vec<ScenarioOutcome>, HuntError> {
    if parallel {
        scenarios.par_iter().map(evaluate).collect()
    } else {
        scenarios.iter().map(evaluate).collect()
    }
}

/// Parameters for a Monte Carlo sweep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    pub hunter_speed: f64,
    pub prey_speed: f64,
    /// Half-width of the cube around the origin the prey is placed in
    pub radius: f64,
    pub samples: usize,
    pub max_time_to_catch: f64,
    /// Base seed; each sample derives its own generator from it
    pub seed: u64,
}

impl SweepConfig {
    /// Reject parameters the sampler cannot draw from.
    ///
    /// The full width `2 * radius` must stay finite for the uniform range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("hunter_speed", self.hunter_speed), ("prey_speed", self.prey_speed)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, value
                )));
            }
        }
        if !self.radius.is_finite() || self.radius < 0.0 || !(2.0 * self.radius).is_finite() {
            return Err(ConfigError::Invalid(format!(
                "radius must be non-negative with a finite width, got {}",
                self.radius
            )));
        }
        validate_budget(self.max_time_to_catch).map_err(ConfigError::Invalid)
    }
}

/// Uniformly random position in the cube `[-radius, radius]^3`.
///
/// Returns the origin for a radius that is not positive or whose width
/// overflows.
pub fn random_position(rng: &mut impl Rng, radius: f64) -> Position {
    if radius.is_nan() || radius <= 0.0 || !(2.0 * radius).is_finite() {
        return Position::ORIGIN;
    }
    Position::new(
        rng.gen_range(-radius..=radius),
        rng.gen_range(-radius..=radius),
        rng.gen_range(-radius..=radius),
    )
}

fn sample(
    config: &SweepConfig,
    simulator: &Arc<DefaultCatchSimulator>,
    index: usize,
) -> Result<ScenarioOutcome, HuntError> {
    let mut rng = SmallRng::seed_from_u64(config.seed.wrapping_add(index as u64));
    let hunter = SubjectSpec::new(config.hunter_speed, Some(Position::ORIGIN));
    let prey = SubjectSpec::new(config.prey_speed, Some(random_position(&mut rng, config.radius)));

    run_hunt(simulator.clone(), simulator.positioner(), &hunter, &prey)
}

fn sweep_simulator(config: &SweepConfig) -> Arc<DefaultCatchSimulator> {
    Arc::new(DefaultCatchSimulator::new(
        SimulatorConfig { max_time_to_catch: config.max_time_to_catch },
        Arc::new(EuclideanPositioner),
    ))
}

/// Run a sweep on the current thread
pub fn sweep(config: &SweepConfig) -> Result<Vec<ScenarioOutcome>, SweepError> {
    config.validate()?;
    let simulator = sweep_simulator(config);
    let outcomes = (0..config.samples)
        .map(|i| sample(config, &simulator, i))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(outcomes)
}

/// Run a sweep across a dedicated rayon pool.
///
/// Produces exactly the outcomes of [`sweep`] for the same config.
pub fn sweep_parallel(config: &SweepConfig) -> Result<Vec<ScenarioOutcome>, SweepError> {
    config.validate()?;
    let num_threads = num_cpus::get().max(1);
    let simulator = sweep_simulator(config);

    let run = || {
        let chunk_size = (config.samples / num_threads).max(1);
        (0..config.samples)
            .into_par_iter()
            .with_min_len(chunk_size.min(1000))
            .map(|i| sample(config, &simulator, i))
            .collect::<Result<Vec<_>, HuntError>>()
    };

    let outcomes = match ThreadPoolBuilder::new().num_threads(num_threads).build() {
        Ok(pool) => pool.install(run),
        // fall back to the global pool
        Err(_) => run(),
    }?;
    Ok(outcomes)
}

/// Run a sweep and aggregate the outcomes
pub fn sweep_and_aggregate(config: &SweepConfig, parallel: bool) -> Result<CatchStats, SweepError> {
    let outcomes = if parallel { sweep_parallel(config)? } else { sweep(config)? };
    let stats = CatchStats::from_outcomes(&outcomes);
    info!(runs = stats.runs, catches = stats.catches, catch_rate = stats.catch_rate, "sweep finished");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Role;
    use approx::assert_relative_eq;

    fn scenario(hunter_speed: f64, prey_speed: f64, prey_x: f64, max_time: f64) -> Scenario {
        Scenario {
            name: None,
            hunter: SubjectSpec::new(hunter_speed, Some(Position::ORIGIN)),
            prey: SubjectSpec::new(prey_speed, Some(Position::new(prey_x, 0.0, 0.0))),
            max_time_to_catch: max_time,
        }
    }

    #[test]
    fn test_evaluate_catch() {
        let outcome = evaluate(&scenario(10.0, 5.0, 100.0, 100.0)).unwrap();
        assert!(outcome.caught);
        assert_relative_eq!(outcome.duration, 20.0);
        assert_eq!(outcome.distance, Some(100.0));
    }

    #[test]
    fn test_evaluate_escape() {
        let outcome = evaluate(&scenario(10.0, 5.0, 100.0, 1.0)).unwrap();
        assert_eq!(outcome, ScenarioOutcome { caught: false, duration: 0.0, distance: Some(100.0) });

        let slower = evaluate(&scenario(5.0, 10.0, 100.0, 100.0)).unwrap();
        assert!(!slower.caught);
    }

    #[test]
    fn test_evaluate_unplaced_prey_is_error() {
        let mut s = scenario(10.0, 5.0, 0.0, 100.0);
        s.prey.position = None;
        assert_eq!(evaluate(&s), Err(HuntError::Unconfigured(Role::Prey)));
    }

    #[test]
    fn test_evaluate_all_keeps_order() {
        let batch: Vec<Scenario> = (0..50).map(|i| scenario(10.0, 5.0, i as f64 * 20.0, 100.0)).collect();

        let sequential = evaluate_all(&batch, false).unwrap();
        let parallel = evaluate_all(&batch, true).unwrap();

        assert_eq!(sequential, parallel);
        // 25 * 20 = 500 → 100 time units, the last catchable start
        assert_eq!(sequential.iter().filter(|o| o.caught).count(), 26);
    }

    #[test]
    fn test_scenario_set_yaml() {
        let yaml = r#"
scenarios:
  - name: close
    hunter: { speed: 10, position: { x: 0, y: 0, z: 0 } }
    prey: { speed: 5, position: { x: 100, y: 0, z: 0 } }
    max_time_to_catch: 100
"#;
        let set: ScenarioSet = serde_yaml::from_str(yaml).unwrap();
        set.validate().unwrap();
        assert_eq!(set.scenarios.len(), 1);
        assert_eq!(set.scenarios[0].name.as_deref(), Some("close"));
    }

    #[test]
    fn test_scenario_set_rejects_nan_budget() {
        let mut s = scenario(10.0, 5.0, 100.0, f64::NAN);
        s.name = Some("bad".to_string());
        let set = ScenarioSet { scenarios: vec![s] };
        let err = set.validate().unwrap_err();
        assert!(err.to_string().contains("bad"));
    }

    #[test]
    fn test_random_position_stays_in_cube() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..1000 {
            let p = random_position(&mut rng, 50.0);
            assert!(p.x.abs() <= 50.0 && p.y.abs() <= 50.0 && p.z.abs() <= 50.0);
        }
        assert_eq!(random_position(&mut rng, 0.0), Position::ORIGIN);
    }

    #[test]
    fn test_sweep_is_deterministic_and_parallel_matches() {
        let config = SweepConfig {
            hunter_speed: 10.0,
            prey_speed: 5.0,
            radius: 400.0,
            samples: 500,
            max_time_to_catch: 100.0,
            seed: 42,
        };

        let a = sweep(&config).unwrap();
        let b = sweep(&config).unwrap();
        let c = sweep_parallel(&config).unwrap();

        assert_eq!(a.len(), 500);
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_sweep_extremes() {
        let mut config = SweepConfig {
            hunter_speed: 10.0,
            prey_speed: 5.0,
            radius: 10.0,
            samples: 200,
            max_time_to_catch: 100.0,
            seed: 1,
        };
        // max distance is sqrt(3) * 10 ≈ 17.3, well inside 100 * 5
        assert_relative_eq!(sweep_and_aggregate(&config, false).unwrap().catch_rate, 1.0);

        config.prey_speed = 10.0;
        assert_eq!(sweep_and_aggregate(&config, true).unwrap().catches, 0);
    }

    fn sweep_config(radius: f64) -> SweepConfig {
        SweepConfig {
            hunter_speed: 10.0,
            prey_speed: 5.0,
            radius,
            samples: 3,
            max_time_to_catch: 100.0,
            seed: 0,
        }
    }

    #[test]
    fn test_sweep_rejects_overflowing_radius() {
        let config = sweep_config(1.0e308);

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        assert!(matches!(sweep(&config), Err(SweepError::Config(ConfigError::Invalid(_)))));
        assert!(matches!(sweep_parallel(&config), Err(SweepError::Config(_))));
        assert!(matches!(sweep_and_aggregate(&config, false), Err(SweepError::Config(_))));
    }

    #[test]
    fn test_sweep_rejects_nan_radius() {
        let config = sweep_config(f64::NAN);

        assert!(matches!(sweep(&config), Err(SweepError::Config(_))));
        assert!(matches!(sweep_parallel(&config), Err(SweepError::Config(_))));
    }

    #[test]
    fn test_sweep_rejects_bad_speeds_and_budget() {
        let mut config = sweep_config(10.0);
        config.hunter_speed = f64::INFINITY;
        assert!(config.validate().is_err());

        let mut config = sweep_config(10.0);
        config.prey_speed = -1.0;
        assert!(config.validate().is_err());

        let mut config = sweep_config(10.0);
        config.max_time_to_catch = f64::NAN;
        assert!(config.validate().is_err());

        assert!(sweep_config(0.0).validate().is_ok());
        assert!(sweep_config(1.0e307).validate().is_ok());
    }

    #[test]
    fn test_random_position_never_panics_on_degenerate_radius() {
        let mut rng = SmallRng::seed_from_u64(3);
        assert_eq!(random_position(&mut rng, f64::NAN), Position::ORIGIN);
        assert_eq!(random_position(&mut rng, 1.0e308), Position::ORIGIN);
        assert_eq!(random_position(&mut rng, -5.0), Position::ORIGIN);
    }

    /// Positioner double returning a fixed distance
    struct FixedPositioner(f64);

    impl Positioner for FixedPositioner {
        fn linear_distance(&self, _from: &Position, _to: &Position) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_reported_distance_matches_simulator_positioner() {
        let outcome = evaluate_with_positioner(&scenario(10.0, 5.0, 100.0, 100.0), Arc::new(FixedPositioner(7.0)))
            .unwrap();

        assert_eq!(outcome.distance, Some(7.0));
        assert_relative_eq!(outcome.duration, 7.0 / 5.0);
    }

    #[test]
    fn test_zero_budget_scenario_is_valid() {
        let set = ScenarioSet { scenarios: vec![scenario(10.0, 5.0, 0.0, 0.0)] };
        set.validate().unwrap();

        let outcome = evaluate(&set.scenarios[0]).unwrap();
        assert!(outcome.caught);
        assert_eq!(outcome.duration, 0.0);
    }
}
