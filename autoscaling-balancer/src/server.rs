//! Backend server: active connections and their load weights

use std::collections::HashMap;
use std::fmt;

use crate::{BalancerError, BalancerResult, ConnectionId, LoadGenerator};

/// Server
#[derive(Debug, Clone, Default)]
pub struct Server {
    pub id: usize,
    connections: HashMap<ConnectionId, f64>,
}

impl Server {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            connections: HashMap::new(),
        }
    }

    /// Admit a connection with a weight drawn from `load`.
    ///
    /// Returns the drawn weight. Fails without drawing if `id` is already
    /// open on this server.
    pub fn add_connection<L>(&mut self, id: ConnectionId, load: &mut L) -> BalancerResult<f64>
    where
        L: LoadGenerator + ?Sized,
    {
        if self.connections.contains_key(&id) {
            return Err(BalancerError::Duplicate(id));
        }
        let weight = load.next_load();
        self.connections.insert(id, weight);
        Ok(weight)
    }

    /// Admit a connection whose weight was measured elsewhere.
    pub fn add_connection_with_load(&mut self, id: ConnectionId, weight: f64) -> BalancerResult<()> {
        if self.connections.contains_key(&id) {
            return Err(BalancerError::Duplicate(id));
        }
        self.connections.insert(id, weight);
        Ok(())
    }

    /// Close a connection, returning its weight.
    pub fn close_connection(&mut self, id: &ConnectionId) -> BalancerResult<f64> {
        self.connections
            .remove(id)
            .ok_or_else(|| BalancerError::NotFound(id.clone()))
    }

    pub fn load(&self) -> f64 {
        self.connections.values().fold(0.0, |total, weight| total + weight)
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.connections.contains_key(id)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn connections(&self) -> impl Iterator<Item = (&ConnectionId, f64)> {
        self.connections.iter().map(|(id, weight)| (id, *weight))
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.load())
    }
}
