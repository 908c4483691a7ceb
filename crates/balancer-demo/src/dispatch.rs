//! Request dispatch against the process-wide balancer.

use anyhow::{ensure, Result};
use balancer_core::{get_load_balancer, LoadBalancer};
use serde::Serialize;
use std::collections::BTreeMap;
use tokio::task::JoinSet;
use tracing::debug;

/// One routed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub request: usize,
    pub server: String,
}

/// Aggregate view of a dispatch run, printed with `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchSummary {
    pub same_instance: bool,
    pub requests: usize,
    pub workers: usize,
    pub policy: String,
    /// Every pool member appears, including servers that received nothing.
    pub per_server: BTreeMap<String, usize>,
}

impl DispatchSummary {
    pub fn new(
        balancer: &LoadBalancer,
        same_instance: bool,
        workers: usize,
        assignments: &[Assignment],
    ) -> Self {
        let mut per_server: BTreeMap<String, usize> =
            balancer.servers().iter().map(|s| (s.clone(), 0)).collect();
        for assignment in assignments {
            *per_server.entry(assignment.server.clone()).or_default() += 1;
        }

        Self {
            same_instance,
            requests: assignments.len(),
            workers,
            policy: balancer.policy_name().to_string(),
            per_server,
        }
    }
}

/// Ask for the shared balancer `lookups` times and report whether every handle matched.
pub fn check_same_instance(lookups: usize) -> Result<bool> {
    let first = get_load_balancer()?;
    for _ in 1..lookups {
        if !std::ptr::eq(first, get_load_balancer()?) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Route `requests` requests over `workers` concurrent tasks.
///
/// Each task fetches the shared balancer itself. The result is ordered by
/// request number regardless of which task served it. `workers` must be at
/// least one.
pub async fn dispatch(requests: usize, workers: usize) -> Result<Vec<Assignment>> {
    ensure!(workers > 0, "dispatch needs at least one worker");
    let mut tasks = JoinSet::new();

    for worker in 0..workers {
        tasks.spawn(async move {
            let balancer = get_load_balancer()?;
            let routed: Vec<Assignment> = (worker..requests)
                .step_by(workers)
                .map(|request| Assignment {
                    request,
                    server: balancer.server().to_string(),
                })
                .collect();
            debug!("Worker {} routed {} requests", worker, routed.len());
            Ok::<_, balancer_core::BalancerError>(routed)
        });
    }

    let mut assignments = Vec::with_capacity(requests);
    while let Some(joined) = tasks.join_next().await {
        assignments.extend(joined??);
    }
    assignments.sort_by_key(|a| a.request);
    Ok(assignments)
}
