use crate::{PlacementPolicy, Selection, Server};

/// Places on the server with the lowest current load, ties to the lowest index.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeastLoaded;

impl LeastLoaded {
    pub fn new() -> Self {
        Self
    }
}

impl PlacementPolicy for LeastLoaded {
    fn select_server(&mut self, servers: &[Server]) -> Selection {
        let mut best_server = None;
        let mut min_load = f64::INFINITY;

        for (i, server) in servers.iter().enumerate() {
            let load = server.load();
            if best_server.is_none() || load < min_load {
                min_load = load;
                best_server = Some(i);
            }
        }

        match best_server {
            Some(index) => Selection::Selected { index },
            None => Selection::NoServers,
        }
    }
}
