/*!
 * Shared Engine Tests
 * Concurrent access through the lock-protected handle
 */

use partition_sim::{AllocationEngine, Placement, SharedEngine};
use pretty_assertions::assert_eq;
use std::thread;

fn shared(blocks: usize) -> SharedEngine {
    AllocationEngine::builder()
        .with_capacities(vec![64; blocks])
        .build()
        .unwrap()
        .into()
}

#[test]
fn test_contended_allocation_never_double_books() {
    let engine = shared(16);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = engine.clone();
            thread::spawn(move || {
                (0..4)
                    .filter_map(|_| engine.allocate_with(Placement::BestFit, 32, 5).ok())
                    .count()
            })
        })
        .collect();
    let granted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

    assert_eq!(granted, 16);
    let snapshot = engine.snapshot();
    let mut occupants: Vec<_> = snapshot.blocks.iter().filter_map(|b| b.occupant).collect();
    occupants.sort_unstable();
    occupants.dedup();
    assert_eq!(occupants.len(), 16);
}

#[test]
fn test_readers_see_consistent_utilization() {
    let engine = shared(8);

    let writer = {
        let engine = engine.clone();
        thread::spawn(move || {
            for _ in 0..50 {
                if let Ok(pid) = engine.allocate(10, 5) {
                    engine.suspend(pid).unwrap();
                    engine.terminate(pid).unwrap();
                }
            }
        })
    };

    for _ in 0..200 {
        let util = engine.utilization();
        assert_eq!(util.used + util.free, util.total);
    }
    writer.join().unwrap();

    assert_eq!(engine.fragmentation(), 8 * 64);
    assert_eq!(engine.read(|eng| eng.terminated().len()), 50);
}

#[test]
fn test_write_closure_is_atomic() {
    let engine = shared(2);
    let (pid, state) = engine.write(|eng| {
        let pid = eng.allocate(10, 5).unwrap();
        eng.suspend(pid).unwrap();
        (pid, eng.process(pid).map(|p| p.state))
    });

    assert_eq!(pid, 1);
    assert_eq!(state, Some(partition_sim::ProcessState::Suspended));
    assert_eq!(engine.processes().len(), 1);
}
