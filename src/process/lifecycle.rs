/*!
 * Process Lifecycle State Machine
 *
 * ```text
 *   Running ──suspend──▶ Suspended
 *      ▲                    │
 *      └──────resume────────┘
 *   Running | Suspended ──terminate──▶ Terminated (absorbing)
 * ```
 *
 * Rename is metadata-only and allowed from any non-terminated state.
 */

use super::types::{LifecycleError, LifecycleResult, ProcessState, Transition};
use crate::core::types::ProcessId;

impl ProcessState {
    /// Target state of `op` from `self`, or `None` if the transition is not allowed
    #[must_use]
    pub const fn apply(self, op: Transition) -> Option<ProcessState> {
        use ProcessState::*;
        match (self, op) {
            (Running, Transition::Suspend) => Some(Suspended),
            (Suspended, Transition::Resume) => Some(Running),
            (Running | Suspended, Transition::Terminate) => Some(Terminated),
            (Running | Suspended, Transition::Rename) => Some(self),
            _ => None,
        }
    }

    /// Whether a process in this state holds a block
    #[inline]
    #[must_use]
    pub const fn holds_block(self) -> bool {
        !matches!(self, ProcessState::Terminated)
    }
}

/// Resolve `op` for process `pid` in state `from`
pub(crate) fn transition(
    pid: ProcessId,
    from: ProcessState,
    op: Transition,
) -> LifecycleResult<ProcessState> {
    from.apply(op).ok_or(LifecycleError::InvalidTransition {
        pid,
        from,
        operation: op,
    })
}
