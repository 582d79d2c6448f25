/*!
 * Priority Tests
 * Validation, ordering, aging and id search
 */

use partition_sim::{AllocationEngine, AllocationError};
use pretty_assertions::assert_eq;

fn engine(blocks: usize) -> AllocationEngine {
    AllocationEngine::builder()
        .with_capacities(vec![100; blocks])
        .build()
        .unwrap()
}

fn order(eng: &AllocationEngine) -> Vec<(u32, u8)> {
    eng.processes().iter().map(|p| (p.id, p.priority)).collect()
}

#[test]
fn test_priority_bounds() {
    let mut eng = engine(3);
    assert!(eng.allocate(10, 1).is_ok());
    assert!(eng.allocate(10, 10).is_ok());
    assert_eq!(
        eng.allocate(10, 0),
        Err(AllocationError::InvalidPriority("0".to_string()))
    );
    assert_eq!(
        eng.allocate(10, 11),
        Err(AllocationError::InvalidPriority("11".to_string()))
    );
    assert_eq!(eng.processes().len(), 2);
}

#[test]
fn test_ties_broken_by_id() {
    let mut eng = engine(4);
    eng.allocate(10, 4).unwrap();
    eng.allocate(10, 6).unwrap();
    eng.allocate(10, 4).unwrap();
    eng.allocate(10, 6).unwrap();

    assert_eq!(order(&eng), vec![(2, 6), (4, 6), (1, 4), (3, 4)]);
}

#[test]
fn test_aging_clamps_at_ten() {
    let mut eng = engine(3);
    eng.allocate(10, 10).unwrap();
    eng.allocate(10, 9).unwrap();
    eng.allocate(10, 3).unwrap();

    assert_eq!(eng.apply_aging(), 2);
    assert_eq!(order(&eng), vec![(1, 10), (2, 10), (3, 4)]);

    for _ in 0..20 {
        eng.apply_aging();
    }
    assert!(eng.processes().iter().all(|p| p.priority == 10));
    assert_eq!(eng.apply_aging(), 0);
}

#[test]
fn test_aging_step_is_configurable() {
    let mut eng = AllocationEngine::builder()
        .with_capacities(vec![100, 100])
        .with_aging_step(3)
        .build()
        .unwrap();
    eng.allocate(10, 2).unwrap();
    eng.allocate(10, 9).unwrap();

    eng.apply_aging();
    assert_eq!(order(&eng), vec![(2, 10), (1, 5)]);
}

#[test]
fn test_aging_skips_terminated() {
    let mut eng = engine(2);
    let pid = eng.allocate(10, 2).unwrap();
    eng.terminate(pid).unwrap();

    assert_eq!(eng.apply_aging(), 0);
    assert_eq!(eng.terminated()[0].priority, 2);
}

#[test]
fn test_search_by_exact_id() {
    let mut eng = engine(20);
    // Sizes and priorities full of sevens must not match
    for _ in 0..17 {
        eng.allocate(77, 7).unwrap();
    }

    let hits: Vec<_> = eng.search("7").into_iter().map(|p| p.id).collect();
    assert_eq!(hits, vec![7]);

    let hits: Vec<_> = eng.search("17").into_iter().map(|p| p.id).collect();
    assert_eq!(hits, vec![17]);

    assert!(eng.search("70").is_empty());
    assert!(eng.search("   ").is_empty());
}
