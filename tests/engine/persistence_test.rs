/*!
 * Persistence Tests
 * Snapshot save/load/restore through the state store
 */

use partition_sim::{
    AllocationEngine, EngineConfig, PersistenceError, RestoreError, Snapshot, StateStore,
};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn busy_engine() -> AllocationEngine {
    let mut eng = AllocationEngine::new(EngineConfig::default()).unwrap();
    let a = eng.allocate(40, 3).unwrap();
    let b = eng.allocate(25, 9).unwrap();
    let c = eng.allocate(60, 6).unwrap();
    eng.rename(b, "web").unwrap();
    eng.suspend(c).unwrap();
    eng.terminate(a).unwrap();
    eng
}

#[test]
fn test_full_state_survives_restart() {
    let dir = TempDir::new().unwrap();
    let store = StateStore::new(dir.path().join("state.json"));
    let eng = busy_engine();

    store.save(&eng.snapshot()).unwrap();
    let snapshot = store.load().unwrap().unwrap();
    let mut restored = AllocationEngine::restore(EngineConfig::default(), snapshot).unwrap();

    assert_eq!(restored.snapshot(), eng.snapshot());
    assert_eq!(restored.utilization(), eng.utilization());
    assert_eq!(restored.search("web").len(), 1);

    // Id assignment continues after the highest id ever issued
    assert_eq!(restored.allocate(5, 1).unwrap(), 4);
}

#[test]
fn test_save_overwrites_previous_state() {
    let dir = TempDir::new().unwrap();
    let store = StateStore::new(dir.path().join("state.json"));

    let mut eng = busy_engine();
    store.save(&eng.snapshot()).unwrap();
    eng.apply_aging();
    store.save(&eng.snapshot()).unwrap();

    assert_eq!(store.load().unwrap(), Some(eng.snapshot()));
}

#[test]
fn test_saved_file_is_readable_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    StateStore::new(&path).save(&busy_engine().snapshot()).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["blocks"].as_array().unwrap().len(), 6);
    assert_eq!(value["processes"][0]["name"], "web");
    assert_eq!(value["terminated"][0]["state"], "terminated");
}

#[test]
fn test_tampered_snapshot_rejected() {
    let mut snapshot: Snapshot = busy_engine().snapshot();
    // Block 2 is held by P3; claim it is free without touching the process
    snapshot.blocks[2].occupant = None;
    snapshot.blocks[2].free_size = snapshot.blocks[2].capacity;

    let err = AllocationEngine::restore(EngineConfig::default(), snapshot).unwrap_err();
    assert_eq!(err, RestoreError::ProcessWithoutBlock { pid: 3 });
}

#[test]
fn test_truncated_file_is_format_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, r#"{"blocks": ["#).unwrap();

    assert!(matches!(
        StateStore::new(&path).load(),
        Err(PersistenceError::Format { .. })
    ));
}
