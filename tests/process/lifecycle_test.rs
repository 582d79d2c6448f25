/*!
 * Process Lifecycle Tests
 * State machine behavior through the engine API
 */

use partition_sim::{AllocationEngine, DeallocationError, LifecycleError, ProcessState, Transition};
use pretty_assertions::assert_eq;

fn engine() -> AllocationEngine {
    AllocationEngine::builder()
        .with_capacities(vec![50, 30, 100])
        .build()
        .unwrap()
}

#[test]
fn test_suspend_resume_round_trip() {
    let mut eng = engine();
    let pid = eng.allocate(40, 5).unwrap();

    eng.suspend(pid).unwrap();
    assert_eq!(eng.process(pid).unwrap().state, ProcessState::Suspended);
    eng.resume(pid).unwrap();
    assert_eq!(eng.process(pid).unwrap().state, ProcessState::Running);
}

#[test]
fn test_resume_running_is_invalid() {
    let mut eng = engine();
    let pid = eng.allocate(40, 5).unwrap();

    assert_eq!(
        eng.resume(pid),
        Err(LifecycleError::InvalidTransition {
            pid,
            from: ProcessState::Running,
            operation: Transition::Resume,
        })
    );
}

#[test]
fn test_suspend_twice_is_invalid() {
    let mut eng = engine();
    let pid = eng.allocate(40, 5).unwrap();
    eng.suspend(pid).unwrap();

    assert!(matches!(
        eng.suspend(pid),
        Err(LifecycleError::InvalidTransition {
            from: ProcessState::Suspended,
            ..
        })
    ));
}

#[test]
fn test_terminate_suspended_releases_block() {
    let mut eng = engine();
    let pid = eng.allocate(40, 5).unwrap();
    eng.suspend(pid).unwrap();
    eng.terminate(pid).unwrap();

    assert!(eng.process(pid).is_none());
    assert_eq!(eng.terminated()[0].id, pid);
    assert_eq!(eng.terminated()[0].state, ProcessState::Terminated);
    assert_eq!(eng.block(0).unwrap().free_size, 50);
    assert_eq!(eng.utilization().used, 0);
}

#[test]
fn test_suspend_terminated_is_invalid() {
    let mut eng = engine();
    let pid = eng.allocate(40, 5).unwrap();
    eng.terminate(pid).unwrap();

    assert_eq!(
        eng.suspend(pid),
        Err(LifecycleError::InvalidTransition {
            pid,
            from: ProcessState::Terminated,
            operation: Transition::Suspend,
        })
    );
}

#[test]
fn test_deallocate_terminated_is_not_found() {
    let mut eng = engine();
    let pid = eng.allocate(40, 5).unwrap();
    eng.terminate(pid).unwrap();

    assert_eq!(eng.deallocate(pid), Err(DeallocationError::ProcessNotFound(pid)));
}

#[test]
fn test_deallocate_drops_process_without_history() {
    let mut eng = engine();
    let pid = eng.allocate(40, 5).unwrap();
    eng.deallocate(pid).unwrap();

    assert!(eng.process(pid).is_none());
    assert!(eng.terminated().is_empty());
    assert_eq!(eng.suspend(pid), Err(LifecycleError::ProcessNotFound(pid)));
}

#[test]
fn test_rename_trims_and_is_searchable() {
    let mut eng = engine();
    let pid = eng.allocate(10, 5).unwrap();
    eng.rename(pid, "  Log Shipper ").unwrap();

    assert_eq!(eng.process(pid).unwrap().label(), format!("P{} (Log Shipper)", pid));
    let hits: Vec<_> = eng.search("shipper").into_iter().map(|p| p.id).collect();
    assert_eq!(hits, vec![pid]);
}
