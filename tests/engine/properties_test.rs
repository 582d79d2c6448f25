/*!
 * Property Tests
 * Invariants that must hold for arbitrary tables and request sequences
 */

use partition_sim::{AllocationEngine, CommitPolicy, DefragStrategy, Placement};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Alloc(u64, u8, Placement),
    Free(u32),
    Terminate(u32),
    Suspend(u32),
    Age,
    Defrag(DefragStrategy),
}

fn placement() -> impl Strategy<Value = Placement> {
    prop_oneof![
        Just(Placement::FirstFit),
        Just(Placement::BestFit),
        Just(Placement::WorstFit),
    ]
}

fn defrag_strategy() -> impl Strategy<Value = DefragStrategy> {
    prop_oneof![
        Just(DefragStrategy::CoalesceAdjacent),
        Just(DefragStrategy::ShiftAndAggregate),
    ]
}

fn commit_policy() -> impl Strategy<Value = CommitPolicy> {
    prop_oneof![Just(CommitPolicy::Partition), Just(CommitPolicy::WholeBlock)]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (1u64..150, 1u8..=10, placement()).prop_map(|(s, p, pl)| Op::Alloc(s, p, pl)),
        2 => (1u32..20).prop_map(Op::Free),
        1 => (1u32..20).prop_map(Op::Terminate),
        1 => (1u32..20).prop_map(Op::Suspend),
        1 => Just(Op::Age),
        1 => defrag_strategy().prop_map(Op::Defrag),
    ]
}

fn capacities() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(1u64..120, 1..10)
}

fn engine(capacities: Vec<u64>, policy: CommitPolicy) -> AllocationEngine {
    AllocationEngine::builder()
        .with_capacities(capacities)
        .with_commit_policy(policy)
        .build()
        .unwrap()
}

fn apply(eng: &mut AllocationEngine, op: &Op) {
    match *op {
        Op::Alloc(size, priority, placement) => {
            let _ = eng.allocate_with(placement, size, priority);
        }
        Op::Free(pid) => {
            let _ = eng.deallocate(pid);
        }
        Op::Terminate(pid) => {
            let _ = eng.terminate(pid);
        }
        Op::Suspend(pid) => {
            let _ = eng.suspend(pid);
        }
        Op::Age => {
            eng.apply_aging();
        }
        Op::Defrag(strategy) => {
            eng.defragment(strategy);
        }
    }
}

proptest! {
    #[test]
    fn prop_utilization_invariant(
        caps in capacities(),
        policy in commit_policy(),
        ops in prop::collection::vec(op(), 0..40),
    ) {
        let mut eng = engine(caps, policy);
        for op in &ops {
            apply(&mut eng, op);
            let util = eng.utilization();
            prop_assert_eq!(util.used + util.free, util.total);
            prop_assert_eq!(util.free, eng.fragmentation());
        }
    }

    #[test]
    fn prop_associations_stay_consistent(
        caps in capacities(),
        ops in prop::collection::vec(op(), 0..40),
    ) {
        let mut eng = engine(caps, CommitPolicy::Partition);
        for op in &ops {
            apply(&mut eng, op);
        }

        let processes = eng.processes();
        let occupied = eng.blocks().iter().filter(|b| !b.is_free()).count();
        prop_assert_eq!(processes.len(), occupied);
        for process in &processes {
            let block = eng.block(process.block.unwrap()).unwrap();
            prop_assert_eq!(block.occupant, Some(process.id));
            prop_assert!(process.priority >= 1 && process.priority <= 10);
        }
        for block in eng.blocks() {
            prop_assert!(block.free_size <= block.capacity);
        }
    }

    #[test]
    fn prop_alloc_dealloc_round_trip(
        caps in capacities(),
        size in 1u64..120,
        placement in placement(),
        policy in commit_policy(),
    ) {
        let mut eng = engine(caps, policy);
        let before = eng.blocks().to_vec();

        if let Ok(pid) = eng.allocate_with(placement, size, 5) {
            eng.deallocate(pid).unwrap();
        }
        prop_assert_eq!(eng.blocks(), before.as_slice());
    }

    #[test]
    fn prop_defrag_idempotent(
        caps in capacities(),
        ops in prop::collection::vec(op(), 0..30),
        strategy in defrag_strategy(),
    ) {
        let mut eng = engine(caps, CommitPolicy::Partition);
        for op in &ops {
            apply(&mut eng, op);
        }

        eng.defragment(strategy);
        let once = eng.snapshot();
        eng.defragment(strategy);
        prop_assert_eq!(eng.snapshot(), once);
    }

    #[test]
    fn prop_oom_leaves_state_unchanged(
        caps in capacities(),
        ops in prop::collection::vec(op(), 0..30),
        placement in placement(),
    ) {
        let mut eng = engine(caps, CommitPolicy::Partition);
        for op in &ops {
            apply(&mut eng, op);
        }

        let too_big = eng.blocks().iter().map(|b| b.capacity).max().unwrap_or(0) + 1;
        let before = eng.snapshot();
        prop_assert!(eng.allocate_with(placement, too_big, 5).is_err());
        prop_assert_eq!(eng.snapshot(), before);
    }

    #[test]
    fn prop_aging_never_exceeds_ten(
        priorities in prop::collection::vec(1u8..=10, 1..8),
        rounds in 1usize..15,
    ) {
        let mut eng = engine(vec![10; priorities.len()], CommitPolicy::Partition);
        for &priority in &priorities {
            eng.allocate(5, priority).unwrap();
        }
        for _ in 0..rounds {
            eng.apply_aging();
        }
        for process in eng.processes() {
            prop_assert!(process.priority <= 10);
        }
    }
}
