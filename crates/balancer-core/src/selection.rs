//! Selection policies: how a balancer turns randomness into a server index.

use crate::config::RngSource;
use crate::error::{BalancerError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

/// Picks an index into a server pool.
///
/// Implementations are shared across threads by a single balancer, so `pick`
/// takes `&self` and must never block on anything but a bounded critical section.
pub trait SelectionPolicy: Send + Sync {
    /// Return an index uniformly distributed over `0..len`.
    ///
    /// Callers guarantee `len > 0`.
    fn pick(&self, len: usize) -> usize;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Uniform picks from the calling thread's own generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadLocalRandom;

impl SelectionPolicy for ThreadLocalRandom {
    fn pick(&self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }

    fn name(&self) -> &'static str {
        "thread_local"
    }
}

/// Uniform picks from one generator shared by every caller.
#[derive(Debug)]
pub struct SharedRandom {
    rng: Mutex<StdRng>,
}

impl SharedRandom {
    /// Seed the shared generator from the operating system.
    pub fn try_from_os() -> Result<Self> {
        let rng = StdRng::try_from_os_rng().map_err(BalancerError::initialization)?;
        Ok(Self {
            rng: Mutex::new(rng),
        })
    }

    /// Seed the shared generator with a fixed value. Draw sequences repeat across runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl SelectionPolicy for SharedRandom {
    fn pick(&self, len: usize) -> usize {
        // A panic elsewhere cannot leave a StdRng half-updated.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random_range(0..len)
    }

    fn name(&self) -> &'static str {
        "shared"
    }
}

/// Build the policy described by `source`.
pub fn policy_for(source: RngSource) -> Result<Box<dyn SelectionPolicy>> {
    Ok(match source {
        RngSource::ThreadLocal => Box::new(ThreadLocalRandom),
        RngSource::SharedOs => Box::new(SharedRandom::try_from_os()?),
        RngSource::SharedSeeded(seed) => Box::new(SharedRandom::seeded(seed)),
    })
}
