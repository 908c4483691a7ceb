//! Random load balancer over a fixed server pool.

use super::shared::SharedRegistry;
use crate::config::BalancerConfig;
use crate::error::{BalancerError, Result};
use crate::selection::{policy_for, SelectionPolicy};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Process-wide balancer slot, filled on first access.
static GLOBAL: SharedRegistry<LoadBalancer> = SharedRegistry::new();

/// Dispatches requests to a uniformly random server from a fixed pool.
///
/// The pool is immutable after construction and read without
/// synchronization. The selection policy owns the only mutable state.
pub struct LoadBalancer {
    servers: Vec<String>,
    policy: Box<dyn SelectionPolicy>,
}

impl LoadBalancer {
    /// Create an exclusively-owned balancer from a config.
    pub fn new(config: BalancerConfig) -> Result<Self> {
        validate_servers(&config.servers)?;
        let policy = policy_for(config.rng)?;
        debug!(
            "Built load balancer with {} servers ({} rng)",
            config.servers.len(),
            config.rng
        );
        Ok(Self {
            servers: config.servers,
            policy,
        })
    }

    /// Create a balancer with a caller-supplied selection policy.
    pub fn with_policy<I, S>(servers: I, policy: Box<dyn SelectionPolicy>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let servers: Vec<String> = servers.into_iter().map(Into::into).collect();
        validate_servers(&servers)?;
        Ok(Self { servers, policy })
    }

    /// Get the process-wide balancer, building it with the default config on first use.
    ///
    /// Every caller in the process receives the same reference. If
    /// construction fails the error is returned and the next call tries again.
    pub fn global() -> Result<&'static LoadBalancer> {
        GLOBAL.get_or_try_init(|| LoadBalancer::new(BalancerConfig::default()))
    }

    /// Pick the server for the next request.
    pub fn server(&self) -> &str {
        let index = self.policy.pick(self.servers.len());
        trace!("Picked server index {} via {}", index, self.policy.name());
        &self.servers[index]
    }

    /// The server pool in selection-index order.
    pub fn servers(&self) -> &[String] {
        &self.servers
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    /// Always false: construction rejects empty pools.
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }
}

impl std::fmt::Debug for LoadBalancer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadBalancer")
            .field("servers", &self.servers)
            .field("policy", &self.policy.name())
            .finish()
    }
}

/// Get the process-wide balancer.
pub fn get_load_balancer() -> Result<&'static LoadBalancer> {
    LoadBalancer::global()
}

/// The slot backing [`get_load_balancer`], for inspecting its lifecycle.
pub fn global_registry() -> &'static SharedRegistry<LoadBalancer> {
    &GLOBAL
}

fn validate_servers(servers: &[String]) -> Result<()> {
    if servers.is_empty() {
        return Err(BalancerError::EmptyPool);
    }

    let mut seen = HashSet::with_capacity(servers.len());
    for server in servers {
        if server.trim().is_empty() {
            return Err(BalancerError::Config {
                message: "server identifiers must not be blank".to_string(),
            });
        }
        if !seen.insert(server.as_str()) {
            return Err(BalancerError::Config {
                message: format!("duplicate server identifier: {}", server),
            });
        }
    }
    Ok(())
}
