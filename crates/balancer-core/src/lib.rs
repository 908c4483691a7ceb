//! Balancer Core - process-wide random load balancer.
//!
//! A single [`LoadBalancer`] is built lazily on first access and shared by
//! every caller in the process. Each call to [`LoadBalancer::server`] picks one
//! server from a fixed pool, uniformly and independently.
//!
//! # Example
//!
//! ```rust
//! use balancer_core::get_load_balancer;
//!
//! fn main() -> balancer_core::Result<()> {
//!     let b1 = get_load_balancer()?;
//!     let b2 = get_load_balancer()?;
//!     assert!(std::ptr::eq(b1, b2));
//!
//!     for _ in 0..3 {
//!         let server = b1.server();
//!         assert!(b1.servers().iter().any(|s| s == server));
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod registry;
pub mod selection;

// Re-export commonly used types
pub use config::{BalancerConfig, DemoConfig, RegistryConfig, RngSource};
pub use error::{BalancerError, Result};
pub use registry::{get_load_balancer, LoadBalancer, RegistryState, SharedRegistry};
pub use selection::{SelectionPolicy, SharedRandom, ThreadLocalRandom};
