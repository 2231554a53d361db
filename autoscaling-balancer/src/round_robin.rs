use crate::{PlacementPolicy, Selection, Server};

/// Cycles through the pool in index order.
///
/// Servers appended by the scaling check join the rotation on the next
/// lap, since the cursor wraps against the current pool length.
#[derive(Debug, Clone, Default)]
pub struct RoundRobin {
    current_index: usize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self { current_index: 0 }
    }
}

impl PlacementPolicy for RoundRobin {
    fn select_server(&mut self, servers: &[Server]) -> Selection {
        if servers.is_empty() {
            return Selection::NoServers;
        }

        let index = self.current_index % servers.len();
        self.current_index = (index + 1) % servers.len();

        Selection::Selected { index }
    }
}
