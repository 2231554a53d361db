//! Connection balancer with reactive pool growth.
//!
//! Admission picks a server through the [`PlacementPolicy`], records the
//! route, then runs the scaling check: if the average load across the pool
//! exceeds the configured threshold, one empty server is appended. Servers
//! are never removed, so a server's pool index doubles as its routing key.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, info};

use crate::{
    BalancerConfig, BalancerError, BalancerResult, ConnectionId, LoadGenerator, PlacementPolicy,
    RandomPlacement, Selection, Server, UniformLoad,
};

/// Outcome of a successful admission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Admission {
    /// Pool index of the server the connection was placed on.
    pub server: usize,
    /// Weight drawn for the connection.
    pub load: f64,
    /// Whether the scaling check appended a server.
    pub scaled: bool,
}

pub struct Balancer<P = RandomPlacement, L = UniformLoad> {
    servers: Vec<Server>,
    routes: HashMap<ConnectionId, usize>,
    policy: P,
    load: L,
    scale_threshold: f64,
}

impl Balancer {
    /// Default configuration with random placement and the stand-in load generator.
    pub fn new() -> Self {
        let config = BalancerConfig::default();
        let load = UniformLoad::new(config.load.clone());
        Self::from_parts(RandomPlacement::new(), load, &config)
    }

    pub fn from_config(config: &BalancerConfig) -> BalancerResult<Self> {
        config.validate()?;
        let load = UniformLoad::new(config.load.clone());
        Ok(Self::from_parts(RandomPlacement::new(), load, config))
    }
}

impl Default for Balancer {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, L> Balancer<P, L>
where
    P: PlacementPolicy,
    L: LoadGenerator,
{
    pub fn with_policy(policy: P, load: L, config: &BalancerConfig) -> BalancerResult<Self> {
        config.validate()?;
        Ok(Self::from_parts(policy, load, config))
    }

    fn from_parts(policy: P, load: L, config: &BalancerConfig) -> Self {
        let servers = (0..config.initial_servers.max(1)).map(Server::new).collect();

        Self {
            servers,
            routes: HashMap::new(),
            policy,
            load,
            scale_threshold: config.scale_threshold,
        }
    }

    /// Admit a connection and run the scaling check.
    pub fn add_connection(&mut self, id: impl Into<ConnectionId>) -> BalancerResult<Admission> {
        let id = id.into();
        if self.routes.contains_key(&id) {
            return Err(BalancerError::Duplicate(id));
        }

        let server = match self.policy.select_server(&self.servers) {
            Selection::Selected { index } => index,
            Selection::NoServers => return Err(BalancerError::EmptyPool),
        };
        assert!(server < self.servers.len());

        let load = self.servers[server].add_connection(id.clone(), &mut self.load)?;
        debug!(connection = %id, server, load, "admitted connection");
        self.routes.insert(id, server);

        let scaled = self.ensure_availability()?;
        Ok(Admission {
            server,
            load,
            scaled,
        })
    }

    /// Close a routed connection, returning its weight.
    pub fn close_connection(&mut self, id: impl Into<ConnectionId>) -> BalancerResult<f64> {
        let id = id.into();
        let server = match self.routes.get(&id) {
            Some(&server) => server,
            None => return Err(BalancerError::NotFound(id)),
        };

        let load = self.servers[server].close_connection(&id)?;
        self.routes.remove(&id);
        debug!(connection = %id, server, load, "closed connection");
        Ok(load)
    }

    pub fn avg_load(&self) -> BalancerResult<f64> {
        if self.servers.is_empty() {
            return Err(BalancerError::DivideByZero);
        }
        Ok(self.total_load() / self.servers.len() as f64)
    }

    /// Scaling check. Appends at most one empty server.
    pub fn ensure_availability(&mut self) -> BalancerResult<bool> {
        let avg_load = self.avg_load()?;
        if avg_load <= self.scale_threshold {
            return Ok(false);
        }

        let index = self.add_server();
        info!(
            server = index,
            servers = self.servers.len(),
            avg_load,
            threshold = self.scale_threshold,
            "scaling up"
        );
        Ok(true)
    }

    /// Append an empty server, returning its pool index.
    pub fn add_server(&mut self) -> usize {
        let index = self.servers.len();
        self.servers.push(Server::new(index));
        index
    }

    pub fn total_load(&self) -> f64 {
        self.servers.iter().map(Server::load).fold(0.0, |total, load| total + load)
    }

    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    pub fn server_count(&self) -> usize {
        self.servers.len()
    }

    pub fn connection_count(&self) -> usize {
        self.routes.len()
    }

    pub fn scale_threshold(&self) -> f64 {
        self.scale_threshold
    }

    /// Pool index of the server a connection is routed to.
    pub fn server_of(&self, id: &ConnectionId) -> Option<usize> {
        self.routes.get(id).copied()
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.routes.contains_key(id)
    }

    /// Find a connection by asking every server. Validation only; routing
    /// goes through [`Balancer::server_of`].
    pub fn locate_by_scan(&self, id: &ConnectionId) -> Option<usize> {
        self.servers
            .iter()
            .position(|server| server.contains(id))
    }

    /// Check that every route points at a server holding the connection,
    /// and that servers hold nothing beyond the routed connections.
    pub fn is_consistent(&self) -> bool {
        let held: usize = self.servers.iter().map(Server::connection_count).sum();
        if held != self.routes.len() {
            return false;
        }

        // With equal totals, no connection can sit on a second server.
        self.routes.iter().all(|(id, &server)| {
            self.servers
                .get(server)
                .is_some_and(|s| s.contains(id))
        })
    }
}

impl<P, L> fmt::Display for Balancer<P, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, server) in self.servers.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", server)?;
        }
        f.write_str("]")
    }
}

impl<P, L> fmt::Debug for Balancer<P, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Balancer")
            .field("servers", &self.servers.len())
            .field("connections", &self.routes.len())
            .field("scale_threshold", &self.scale_threshold)
            .finish()
    }
}
