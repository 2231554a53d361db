//! Balancer error types.

use thiserror::Error;

use crate::ConnectionId;

/// Errors returned by servers, balancers and configuration loading.
#[derive(Debug, Error)]
pub enum BalancerError {
    #[error("connection already tracked: {0}")]
    Duplicate(ConnectionId),

    #[error("connection not found: {0}")]
    NotFound(ConnectionId),

    #[error("average load over an empty server pool")]
    DivideByZero,

    #[error("no servers available for placement")]
    EmptyPool,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("balancer lock poisoned")]
    Poisoned,
}

pub type BalancerResult<T> = Result<T, BalancerError>;
