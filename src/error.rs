//! Error types for hunting and configuration loading

use std::fmt;
use std::path::PathBuf;

/// Which side of a pursuit an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Hunter,
    Prey,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Role::Hunter => write!(f, "hunter"),
            Role::Prey => write!(f, "prey"),
        }
    }
}

/// How a caller should treat a failed hunt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The simulation ran and the prey got away
    Business,
    /// The hunt could not be simulated at all
    Internal,
}

/// Errors returned by [`crate::hunter::Hunter::hunt`]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HuntError {
    #[error("can not hunt the prey: prey escaped")]
    CannotCatch,

    #[error("can not hunt the prey: {0} position is not configured")]
    Unconfigured(Role),
}

impl HuntError {
    pub fn kind(&self) -> FailureKind {
        match self {
            HuntError::CannotCatch => FailureKind::Business,
            HuntError::Unconfigured(_) => FailureKind::Internal,
        }
    }

    pub fn is_business_failure(&self) -> bool {
        self.kind() == FailureKind::Business
    }
}

/// Errors raised while loading configuration or scenario files
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors from a Monte Carlo sweep
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Hunt(#[from] HuntError),
}
