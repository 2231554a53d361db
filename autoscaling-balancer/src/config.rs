//! Balancer configuration, loadable from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{BalancerError, BalancerResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalancerConfig {
    /// Average load above which one server is added after an admission.
    pub scale_threshold: f64,
    /// Servers in the pool when the balancer is created.
    pub initial_servers: usize,
    pub load: LoadConfig,
}

/// Shape of the stand-in load generator.
///
/// A weight is `u * spread + base` with `u` uniform in [0, 1), reduced by
/// one when it lands above `ceiling`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    pub base: f64,
    pub spread: f64,
    pub ceiling: f64,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            scale_threshold: 50.0,
            initial_servers: 1,
            load: LoadConfig::default(),
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            base: 1.0,
            spread: 10.0,
            ceiling: 10.0,
        }
    }
}

impl BalancerConfig {
    pub fn from_toml_str(content: &str) -> BalancerResult<Self> {
        let config: BalancerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> BalancerResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> BalancerResult<String> {
        toml::to_string_pretty(self).map_err(|e| BalancerError::InvalidConfig(e.to_string()))
    }

    pub fn validate(&self) -> BalancerResult<()> {
        if !self.scale_threshold.is_finite() || self.scale_threshold < 0.0 {
            return Err(BalancerError::InvalidConfig(format!(
                "scale_threshold must be a finite non-negative number, got {}",
                self.scale_threshold
            )));
        }
        if self.initial_servers == 0 {
            return Err(BalancerError::InvalidConfig(
                "initial_servers must be at least 1".to_string(),
            ));
        }
        self.load.validate()
    }
}

impl LoadConfig {
    pub fn validate(&self) -> BalancerResult<()> {
        let finite = self.base.is_finite() && self.spread.is_finite() && self.ceiling.is_finite();
        if !finite || self.spread <= 0.0 {
            return Err(BalancerError::InvalidConfig(format!(
                "load range must be finite with a positive spread, got base={} spread={} ceiling={}",
                self.base, self.spread, self.ceiling
            )));
        }
        Ok(())
    }
}
