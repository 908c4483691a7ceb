//! One-time initialization guard for process-wide values.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};
use tracing::{debug, warn};

/// Lifecycle of a [`SharedRegistry`] slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    /// Nothing has been constructed yet, or every attempt so far failed.
    Uninitialized,
    /// The value exists and will live until the registry is dropped.
    Initialized,
}

impl std::fmt::Display for RegistryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryState::Uninitialized => write!(f, "UNINITIALIZED"),
            RegistryState::Initialized => write!(f, "INITIALIZED"),
        }
    }
}

/// A slot that is filled at most once, on first successful access.
///
/// Reads after initialization are a single `OnceLock::get` and never touch the
/// construction lock. Concurrent first-time callers serialize on the lock;
/// exactly one of them runs the initializer and the rest observe its result.
/// A failing (or panicking) initializer leaves the slot empty, so the next
/// caller runs the whole construction again.
///
/// `new` is `const`, so the registry can back a `static`:
///
/// ```
/// use balancer_core::registry::SharedRegistry;
///
/// static NAMES: SharedRegistry<Vec<String>> = SharedRegistry::new();
///
/// let names = NAMES
///     .get_or_try_init(|| Ok::<_, std::convert::Infallible>(vec!["a".to_string()]))
///     .unwrap();
/// assert_eq!(names.len(), 1);
/// ```
pub struct SharedRegistry<T> {
    cell: OnceLock<T>,
    init_lock: Mutex<()>,
    /// Successful initializer runs.
    constructions: AtomicU64,
    /// Times the construction lock was taken.
    lock_acquisitions: AtomicU64,
}

impl<T> SharedRegistry<T> {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
            init_lock: Mutex::new(()),
            constructions: AtomicU64::new(0),
            lock_acquisitions: AtomicU64::new(0),
        }
    }

    /// Return the value, constructing it with `init` if the slot is empty.
    pub fn get_or_try_init<F, E>(&self, init: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: std::fmt::Display,
    {
        if let Some(value) = self.cell.get() {
            return Ok(value);
        }

        // The lock guards no data; a poisoned flag only means an earlier initializer panicked.
        let _guard = self
            .init_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.lock_acquisitions.fetch_add(1, Ordering::SeqCst);

        if let Some(value) = self.cell.get() {
            return Ok(value);
        }

        let value = match init() {
            Ok(value) => value,
            Err(e) => {
                warn!("Shared registry construction failed, slot left empty: {}", e);
                return Err(e);
            }
        };
        self.constructions.fetch_add(1, Ordering::SeqCst);
        debug!("Shared registry initialized");

        Ok(self.cell.get_or_init(|| value))
    }

    /// Return the value if it has been constructed.
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn state(&self) -> RegistryState {
        if self.cell.get().is_some() {
            RegistryState::Initialized
        } else {
            RegistryState::Uninitialized
        }
    }

    /// Number of times the initializer ran to completion. Never exceeds one.
    pub fn constructions(&self) -> u64 {
        self.constructions.load(Ordering::SeqCst)
    }

    /// Number of times the construction lock was acquired.
    pub fn lock_acquisitions(&self) -> u64 {
        self.lock_acquisitions.load(Ordering::SeqCst)
    }
}

impl<T> Default for SharedRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for SharedRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedRegistry")
            .field("value", &self.cell.get())
            .field("constructions", &self.constructions())
            .field("lock_acquisitions", &self.lock_acquisitions())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;
    use std::sync::{Arc, Barrier};

    #[test]
    fn test_starts_uninitialized() {
        let registry: SharedRegistry<u32> = SharedRegistry::new();
        assert_eq!(registry.state(), RegistryState::Uninitialized);
        assert!(registry.get().is_none());
        assert_eq!(registry.constructions(), 0);
        assert_eq!(registry.lock_acquisitions(), 0);
    }

    #[test]
    fn test_initializes_once() {
        let registry = SharedRegistry::new();
        let first = registry.get_or_try_init(|| Ok::<_, String>(7u32)).unwrap();
        let second = registry
            .get_or_try_init(|| Ok::<_, String>(99u32))
            .unwrap();

        assert_eq!(*first, 7);
        assert!(std::ptr::eq(first, second));
        assert_eq!(registry.state(), RegistryState::Initialized);
        assert_eq!(registry.constructions(), 1);
    }

    #[test]
    fn test_steady_state_skips_lock() {
        let registry = SharedRegistry::new();
        registry.get_or_try_init(|| Ok::<_, String>(1u32)).unwrap();
        let after_init = registry.lock_acquisitions();

        for _ in 0..1000 {
            registry.get_or_try_init(|| Ok::<_, String>(2u32)).unwrap();
        }

        assert_eq!(registry.lock_acquisitions(), after_init);
    }

    #[test]
    fn test_failed_init_leaves_slot_empty() {
        let registry: SharedRegistry<u32> = SharedRegistry::new();
        let err = registry
            .get_or_try_init(|| Err::<u32, _>("no entropy".to_string()))
            .unwrap_err();

        assert_eq!(err, "no entropy");
        assert_eq!(registry.state(), RegistryState::Uninitialized);
        assert_eq!(registry.constructions(), 0);

        let value = registry.get_or_try_init(|| Ok::<_, String>(5)).unwrap();
        assert_eq!(*value, 5);
        assert_eq!(registry.constructions(), 1);
    }

    #[test]
    fn test_panicking_init_does_not_wedge_slot() {
        let registry: Arc<SharedRegistry<u32>> = Arc::new(SharedRegistry::new());
        let clone = registry.clone();
        let result = std::thread::spawn(move || {
            let _ = clone.get_or_try_init(|| -> Result<u32, String> { panic!("boom") });
        })
        .join();
        assert!(result.is_err());

        assert_eq!(registry.state(), RegistryState::Uninitialized);
        let value = registry.get_or_try_init(|| Ok::<_, String>(11)).unwrap();
        assert_eq!(*value, 11);
    }

    #[test]
    fn test_concurrent_first_access_constructs_once() {
        const THREADS: usize = 100;
        let registry: Arc<SharedRegistry<Vec<u32>>> = Arc::new(SharedRegistry::new());
        let init_runs = Arc::new(AtomicU32::new(0));
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let registry = registry.clone();
                let init_runs = init_runs.clone();
                let barrier = barrier.clone();
                std::thread::spawn(move || {
                    barrier.wait();
                    let value = registry
                        .get_or_try_init(|| {
                            init_runs.fetch_add(1, Ordering::SeqCst);
                            std::thread::sleep(std::time::Duration::from_millis(5));
                            Ok::<_, String>(vec![1, 2, 3])
                        })
                        .unwrap();
                    value as *const Vec<u32> as usize
                })
            })
            .collect();

        let addresses: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(init_runs.load(Ordering::SeqCst), 1);
        assert_eq!(registry.constructions(), 1);
        assert!(addresses.iter().all(|&a| a == addresses[0]));
        assert_eq!(registry.get().unwrap(), &vec![1, 2, 3]);
    }
}
