//! Stand-in connection load generator

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{LoadConfig, LoadGenerator};

/// Uniform random weights in `[base, base + spread)`, folded down by one
/// when above `ceiling`.
#[derive(Debug, Clone)]
pub struct UniformLoad {
    rng: StdRng,
    config: LoadConfig,
}

impl UniformLoad {
    pub fn new(config: LoadConfig) -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            config,
        }
    }

    pub fn seeded(config: LoadConfig, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            config,
        }
    }
}

impl Default for UniformLoad {
    fn default() -> Self {
        Self::new(LoadConfig::default())
    }
}

impl LoadGenerator for UniformLoad {
    fn next_load(&mut self) -> f64 {
        let mut load = self.rng.random::<f64>() * self.config.spread + self.config.base;
        if load > self.config.ceiling {
            load -= 1.0;
        }
        load
    }
}
