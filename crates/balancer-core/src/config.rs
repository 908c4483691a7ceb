//! Centralized configuration for the balancer.
//!
//! Constant holders follow one struct per concern. [`BalancerConfig`] is the
//! runtime description of a balancer and is what [`crate::LoadBalancer::new`]
//! consumes.

use serde::{Deserialize, Serialize};

/// Registry-level constants.
pub struct RegistryConfig;

impl RegistryConfig {
    /// Server pool installed in the process-wide balancer.
    pub const DEFAULT_SERVERS: [&str; 5] =
        ["ServerI", "ServerII", "ServerIII", "ServerIV", "ServerV"];
}

/// Defaults for the console demo.
pub struct DemoConfig;

impl DemoConfig {
    pub const DEFAULT_REQUESTS: usize = 15;
    pub const DEFAULT_WORKERS: usize = 1;
    /// Upper bound on `--workers`; each worker is one tokio task.
    pub const MAX_WORKERS: usize = 64;
    /// How many times the demo asks for the shared instance before comparing handles.
    pub const INSTANCE_LOOKUPS: usize = 4;
}

/// Where a balancer draws its randomness from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RngSource {
    /// A generator per calling thread. Nothing is shared, nothing is locked.
    #[default]
    ThreadLocal,
    /// One generator seeded from the OS and shared behind a mutex.
    SharedOs,
    /// One generator with a fixed seed, shared behind a mutex.
    SharedSeeded(u64),
}

impl std::fmt::Display for RngSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RngSource::ThreadLocal => write!(f, "thread_local"),
            RngSource::SharedOs => write!(f, "shared_os"),
            RngSource::SharedSeeded(seed) => write!(f, "shared_seeded({})", seed),
        }
    }
}

/// Runtime description of a balancer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalancerConfig {
    /// Server identifiers, in selection-index order.
    pub servers: Vec<String>,
    /// Randomness source used for every pick.
    #[serde(default)]
    pub rng: RngSource,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            servers: RegistryConfig::DEFAULT_SERVERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            rng: RngSource::default(),
        }
    }
}

impl BalancerConfig {
    /// Create a config for the given servers with the default randomness source.
    pub fn new<I, S>(servers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            servers: servers.into_iter().map(Into::into).collect(),
            rng: RngSource::default(),
        }
    }

    /// Set the randomness source.
    pub fn with_rng(mut self, rng: RngSource) -> Self {
        self.rng = rng;
        self
    }
}
