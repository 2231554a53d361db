//! Autoscaling Connection Balancer Library

pub mod balancer;
pub mod config;
pub mod error;
pub mod lb;
pub mod least_loaded;
pub mod load;
pub mod random;
pub mod round_robin;
pub mod server;
pub mod shared;
mod sim;

pub use balancer::*;
pub use config::*;
pub use error::*;
pub use lb::*;
pub use least_loaded::*;
pub use load::*;
pub use random::*;
pub use round_robin::*;
pub use server::*;
pub use shared::*;
