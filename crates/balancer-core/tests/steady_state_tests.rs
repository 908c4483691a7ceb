//! Steady-state access to the process-wide balancer.
//!
//! Kept in its own test binary: no other test can be mid-construction while
//! the lock counter is sampled.

use balancer_core::get_load_balancer;
use balancer_core::registry::global_registry;

#[test]
fn test_initialized_access_never_takes_construction_lock() {
    assert_eq!(global_registry().lock_acquisitions(), 0);

    get_load_balancer().unwrap();
    assert_eq!(global_registry().lock_acquisitions(), 1);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            std::thread::spawn(|| {
                for _ in 0..10_000 {
                    get_load_balancer().unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(global_registry().lock_acquisitions(), 1);
    assert_eq!(global_registry().constructions(), 1);
}
