/*!
 * Statistics Tests
 * Fragmentation, utilization and pressure reporting
 */

use partition_sim::{AllocationEngine, MemoryPressure, Placement};
use pretty_assertions::assert_eq;

fn engine() -> AllocationEngine {
    AllocationEngine::builder()
        .with_capacities(vec![50, 30, 100, 20, 70, 10])
        .build()
        .unwrap()
}

#[test]
fn test_idle_table_is_all_free() {
    let eng = engine();
    let util = eng.utilization();

    assert_eq!(eng.fragmentation(), 280);
    assert_eq!((util.total, util.used, util.free), (280, 0, 280));
    assert_eq!(eng.stats().free_blocks, 6);
}

#[test]
fn test_residual_inside_occupied_block_counts_as_used() {
    let mut eng = engine();
    eng.allocate_with(Placement::FirstFit, 40, 5).unwrap();

    let util = eng.utilization();
    assert_eq!(eng.fragmentation(), 230);
    assert_eq!(util.used, 50);
    assert_eq!(util.used + util.free, util.total);

    let stats = eng.stats();
    assert_eq!(stats.allocated_blocks, 1);
    assert_eq!(stats.internal_waste, 10);
    assert_eq!(stats.largest_free_block, 100);
}

#[test]
fn test_pressure_tracks_usage() {
    let mut eng = engine();
    assert_eq!(eng.pressure(), MemoryPressure::Low);

    // 100 + 70 of 280 = ~61%
    eng.allocate_with(Placement::WorstFit, 100, 5).unwrap();
    eng.allocate_with(Placement::WorstFit, 70, 5).unwrap();
    assert_eq!(eng.pressure(), MemoryPressure::Medium);

    // + 50 + 30 = ~89%
    eng.allocate_with(Placement::WorstFit, 50, 5).unwrap();
    eng.allocate_with(Placement::WorstFit, 30, 5).unwrap();
    assert_eq!(eng.pressure(), MemoryPressure::High);

    // + 20 + 10 = 100%
    eng.allocate(20, 5).unwrap();
    eng.allocate(10, 5).unwrap();
    assert_eq!(eng.pressure(), MemoryPressure::Critical);
    assert_eq!(eng.stats().usage_percentage, 100.0);
}

#[test]
fn test_block_usage_rows() {
    let mut eng = engine();
    let pid = eng.allocate_with(Placement::BestFit, 25, 5).unwrap();

    let rows = eng.block_usage();
    assert_eq!(rows.len(), 6);
    let row = &rows[1];
    assert_eq!((row.capacity, row.used, row.free, row.occupant), (30, 25, 5, Some(pid)));
    assert!(rows.iter().filter(|r| r.index != 1).all(|r| r.occupant.is_none()));
}
