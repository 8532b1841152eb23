//! Configuration structures for loading service YAML/JSON files

use crate::error::ConfigError;
use crate::position::Position;
use crate::simulator::SimulatorConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Speed and optional position of a hunter or prey, as written in files
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectSpec {
    pub speed: f64,
    #[serde(default)]
    pub position: Option<Position>,
}

impl SubjectSpec {
    pub fn new(speed: f64, position: Option<Position>) -> Self {
        Self { speed, position }
    }

    /// Reject speeds and coordinates that would make a pursuit meaningless
    pub fn validate(&self) -> Result<(), String> {
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(format!("speed must be a finite non-negative number, got {}", self.speed));
        }
        if let Some(p) = self.position {
            if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
                return Err(format!("position coordinates must be finite, got {:?}", p));
            }
        }
        Ok(())
    }
}

/// A time budget must be finite and non-negative; zero only admits a
/// catch at zero distance
pub fn validate_budget(max_time_to_catch: f64) -> Result<(), String> {
    if !max_time_to_catch.is_finite() || max_time_to_catch < 0.0 {
        return Err(format!(
            "max_time_to_catch must be a finite non-negative number, got {}",
            max_time_to_catch
        ));
    }
    Ok(())
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_max_time() -> f64 {
    SimulatorConfig::default().max_time_to_catch
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Address the HTTP adapter listens on
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Simulated time budget for every hunt
    #[serde(default = "default_max_time")]
    pub max_time_to_catch: f64,
    /// Default `tracing` filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Initial hunter state
    #[serde(default)]
    pub hunter: Option<SubjectSpec>,
    /// Initial prey state
    #[serde(default)]
    pub prey: Option<SubjectSpec>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_time_to_catch: default_max_time(),
            log_level: default_log_level(),
            hunter: None,
            prey: None,
        }
    }
}

impl AppConfig {
    /// Load from a YAML or JSON file (chosen by extension) and validate
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config: AppConfig = load_file(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_budget(self.max_time_to_catch).map_err(ConfigError::Invalid)?;
        for (name, spec) in [("hunter", &self.hunter), ("prey", &self.prey)] {
            if let Some(spec) = spec {
                spec.validate().map_err(|e| ConfigError::Invalid(format!("{}: {}", name, e)))?;
            }
        }
        Ok(())
    }

    pub fn simulator(&self) -> SimulatorConfig {
        SimulatorConfig { max_time_to_catch: self.max_time_to_catch }
    }
}

/// Read a file and parse it as JSON if it ends in `.json`, YAML otherwise
pub fn load_file<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let path_str = path.to_string_lossy().to_lowercase();

    if path_str.ends_with(".json") {
        Ok(serde_json::from_str(&content)?)
    } else {
        Ok(serde_yaml::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_yaml() {
        let config = AppConfig::from_yaml("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bind, "127.0.0.1:8080");
        assert_eq!(config.max_time_to_catch, 100.0);
    }

    #[test]
    fn test_yaml_with_subjects() {
        let yaml = r#"
bind: 0.0.0.0:9000
max_time_to_catch: 25
hunter:
  speed: 10
  position: { x: 0, y: 0, z: 0 }
prey:
  speed: 5
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.bind, "0.0.0.0:9000");
        assert_eq!(config.simulator().max_time_to_catch, 25.0);
        assert_eq!(config.hunter, Some(SubjectSpec::new(10.0, Some(Position::ORIGIN))));
        assert_eq!(config.prey, Some(SubjectSpec::new(5.0, None)));
    }

    #[test]
    fn test_json_upper_case_position() {
        let json = r#"{"prey": {"speed": 1.5, "position": {"X": 1, "Y": 2, "Z": 3}}}"#;
        let config = AppConfig::from_json(json).unwrap();
        assert_eq!(config.prey, Some(SubjectSpec::new(1.5, Some(Position::new(1.0, 2.0, 3.0)))));
    }

    #[test]
    fn test_rejects_bad_budget() {
        assert!(matches!(
            AppConfig::from_yaml("max_time_to_catch: -3"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AppConfig::from_yaml("max_time_to_catch: .nan"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_zero_budget_is_allowed() {
        let config = AppConfig::from_yaml("max_time_to_catch: 0").unwrap();
        assert_eq!(config.simulator().max_time_to_catch, 0.0);
        assert!(validate_budget(0.0).is_ok());
        assert!(validate_budget(f64::INFINITY).is_err());
    }

    #[test]
    fn test_rejects_negative_speed() {
        let err = AppConfig::from_yaml("hunter: { speed: -1 }").unwrap_err();
        assert!(err.to_string().contains("hunter"));
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
