//! Load Balancer core types and traits

use std::fmt;

use crate::Server;

/// Caller-supplied connection identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConnectionId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ConnectionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&ConnectionId> for ConnectionId {
    fn from(id: &ConnectionId) -> Self {
        id.clone()
    }
}

macro_rules! connection_id_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ConnectionId {
                fn from(id: $t) -> Self {
                    Self(id.to_string())
                }
            }
        )*
    };
}

connection_id_from_int!(u16, u32, u64, usize, i32, i64);

/// Placement result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Selected { index: usize },
    NoServers,
}

/// Placement policy trait
///
/// Picks the pool index a new connection is admitted to. The balancer
/// passes the whole pool on every call, so a policy must cope with the
/// pool having grown since the previous call.
pub trait PlacementPolicy {
    fn select_server(&mut self, servers: &[Server]) -> Selection;
}

/// Source of per-connection load weights
pub trait LoadGenerator {
    fn next_load(&mut self) -> f64;
}

impl<F> LoadGenerator for F
where
    F: FnMut() -> f64,
{
    fn next_load(&mut self) -> f64 {
        self()
    }
}
