//! Process-wide balancer registry.
//!
//! This module provides:
//! - **`SharedRegistry<T>`**: a slot filled at most once, lock-free after initialization
//! - **`LoadBalancer`**: the fixed server pool and its random selection
//!
//! The process-wide balancer lives in a `static SharedRegistry<LoadBalancer>`
//! and is reached through [`get_load_balancer`].

mod load_balancer;
mod shared;

pub use load_balancer::{get_load_balancer, global_registry, LoadBalancer};
pub use shared::{RegistryState, SharedRegistry};
