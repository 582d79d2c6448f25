/*!
 * Engine Tests
 * Construction, configuration and end-to-end scenarios
 */

use partition_sim::{
    AllocationEngine, AllocationError, CommitPolicy, ConfigError, DefragStrategy, EngineConfig,
    Placement, ProcessState, SimError,
};
use pretty_assertions::assert_eq;

#[test]
fn test_default_config_builds_default_table() {
    let eng = AllocationEngine::new(EngineConfig::default()).unwrap();
    let capacities: Vec<_> = eng.blocks().iter().map(|b| b.capacity).collect();

    assert_eq!(capacities, vec![50, 30, 100, 20, 70, 10]);
    assert!(eng.blocks().iter().all(|b| b.is_free() && b.free_size == b.capacity));
}

#[test]
fn test_config_from_lookup_drives_engine() {
    let config = EngineConfig::from_lookup(|var| match var {
        "PARTSIM_BLOCKS" => Some("20 80 40".to_string()),
        "PARTSIM_SORT_DESC" => Some("1".to_string()),
        "PARTSIM_PLACEMENT" => Some("best".to_string()),
        "PARTSIM_COMMIT" => Some("whole".to_string()),
        _ => None,
    })
    .unwrap();
    let mut eng = AllocationEngine::new(config).unwrap();

    let pid = eng.allocate(30, 5).unwrap();
    let block = eng.block(eng.process(pid).unwrap().block.unwrap()).unwrap();
    assert_eq!(block.capacity, 40);
    assert_eq!(block.free_size, 0);
    assert_eq!(eng.config().commit_policy, CommitPolicy::WholeBlock);
}

#[test]
fn test_invalid_configs_rejected() {
    let config = EngineConfig {
        capacities: vec![10, 0],
        ..EngineConfig::default()
    };
    assert_eq!(
        AllocationEngine::new(config).unwrap_err(),
        ConfigError::ZeroCapacity { index: 1 }
    );

    let err = EngineConfig::from_lookup(|var| {
        (var == "PARTSIM_DEFRAG").then(|| "sideways".to_string())
    })
    .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
}

#[test]
fn test_session_scenario() {
    let mut eng = AllocationEngine::builder()
        .with_capacities(vec![50, 30, 100, 20, 70, 10])
        .with_placement(Placement::BestFit)
        .with_defrag_strategy(DefragStrategy::ShiftAndAggregate)
        .build()
        .unwrap();

    let results = eng.allocate_batch(Placement::BestFit, &[25, 45, 65, 95], 4);
    let pids: Vec<u32> = results.into_iter().map(Result::unwrap).collect();
    assert_eq!(pids, vec![1, 2, 3, 4]);

    eng.rename(2, "cache").unwrap();
    eng.suspend(3).unwrap();
    eng.terminate(1).unwrap();
    eng.deallocate(4).unwrap();

    // 30 and 100 are free again, 20 and 10 were never used
    assert_eq!(eng.fragmentation(), 160);
    assert!(matches!(
        eng.allocate(150, 5),
        Err(AllocationError::OutOfMemory { largest_free: 100, .. })
    ));

    eng.defragment_default();
    let pid = eng.allocate(150, 5).unwrap();
    assert_eq!(pid, 5);

    let states: Vec<_> = eng.processes().iter().map(|p| (p.id, p.state)).collect();
    assert_eq!(
        states,
        vec![
            (5, ProcessState::Running),
            (2, ProcessState::Running),
            (3, ProcessState::Suspended)
        ]
    );
    assert_eq!(eng.search("cache")[0].id, 2);
}

#[test]
fn test_errors_unify_into_sim_error() {
    let mut eng = AllocationEngine::new(EngineConfig::default()).unwrap();

    let err: SimError = eng.allocate(0, 5).unwrap_err().into();
    assert_eq!(err.kind(), "allocation");

    let err: SimError = eng.deallocate(99).unwrap_err().into();
    assert_eq!(err.kind(), "deallocation");

    let err: SimError = eng.resume(99).unwrap_err().into();
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["error_type"], "lifecycle");
    assert_eq!(json["details"]["error_type"], "process_not_found");
}
