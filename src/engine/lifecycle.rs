/*!
 * Engine Lifecycle Operations
 * Suspend, resume, terminate, rename and aging
 */

use super::AllocationEngine;
use crate::core::limits::MAX_PRIORITY;
use crate::core::types::ProcessId;
use crate::process::lifecycle::transition;
use crate::process::types::{LifecycleError, LifecycleResult, ProcessState, Transition};
use crate::process::validation::validate_name;
use std::time::Duration;
use tracing::{info, warn};

impl AllocationEngine {
    /// Current state of `pid`, including terminated history
    fn lifecycle_state(&self, pid: ProcessId) -> LifecycleResult<ProcessState> {
        if let Some(process) = self.registry.get(pid) {
            return Ok(process.state);
        }
        if self.registry.is_terminated(pid) {
            return Ok(ProcessState::Terminated);
        }
        Err(LifecycleError::ProcessNotFound(pid))
    }

    /// Resolve `op` for `pid` without mutating anything
    fn check_transition(&self, pid: ProcessId, op: Transition) -> LifecycleResult<ProcessState> {
        let from = self.lifecycle_state(pid)?;
        transition(pid, from, op).inspect_err(|err| {
            warn!(pid, %op, %from, "Rejected lifecycle transition: {}", err);
        })
    }

    fn set_state(&mut self, pid: ProcessId, op: Transition) -> LifecycleResult<()> {
        let to = self.check_transition(pid, op)?;
        if let Some(process) = self.registry.get_mut(pid) {
            process.state = to;
        }
        info!(pid, %op, state = %to, "Process state changed");
        Ok(())
    }

    /// Running -> Suspended
    pub fn suspend(&mut self, pid: ProcessId) -> LifecycleResult<()> {
        self.set_state(pid, Transition::Suspend)
    }

    /// Suspended -> Running
    pub fn resume(&mut self, pid: ProcessId) -> LifecycleResult<()> {
        self.set_state(pid, Transition::Resume)
    }

    /// Release the process's block and record it as Terminated
    ///
    /// Returns the elapsed runtime between allocation and termination.
    pub fn terminate(&mut self, pid: ProcessId) -> LifecycleResult<Duration> {
        self.check_transition(pid, Transition::Terminate)?;

        if let Some(index) = self.table.find_occupied_by(pid) {
            self.table.release(index);
        }
        let now = self.clock.now();
        let elapsed = self
            .registry
            .retire(pid, now)
            .and_then(|process| process.elapsed())
            .unwrap_or_default();

        info!(
            pid,
            elapsed_ms = elapsed.as_millis() as u64,
            "Terminated process"
        );
        Ok(elapsed)
    }

    /// Set a display name; metadata only
    pub fn rename(&mut self, pid: ProcessId, name: &str) -> LifecycleResult<()> {
        self.check_transition(pid, Transition::Rename)?;
        let name = validate_name(name)?;

        if let Some(process) = self.registry.get_mut(pid) {
            info!(pid, name = %name, "Renamed process");
            process.name = Some(name);
        }
        Ok(())
    }

    /// Raise every active priority by the configured step, clamped to the maximum
    ///
    /// Returns how many priorities changed.
    pub fn apply_aging(&mut self) -> usize {
        let changed = self.registry.age(self.config.aging_step, MAX_PRIORITY);
        info!(
            changed,
            step = self.config.aging_step,
            "Applied priority aging"
        );
        changed
    }
}
