use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{PlacementPolicy, Selection, Server};

/// Uniform random placement
#[derive(Debug, Clone)]
pub struct RandomPlacement {
    rng: StdRng,
}

impl RandomPlacement {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPlacement {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacementPolicy for RandomPlacement {
    fn select_server(&mut self, servers: &[Server]) -> Selection {
        if servers.is_empty() {
            return Selection::NoServers;
        }

        Selection::Selected {
            index: self.rng.random_range(0..servers.len()),
        }
    }
}
