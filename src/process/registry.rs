/*!
 * Process Registry
 *
 * Live processes keyed by id, an active view ordered by `(priority desc, id asc)`,
 * and the history of terminated processes. Ids come from a monotonic counter and
 * are never reused, including after a process leaves the registry.
 */

use super::types::{Process, ProcessState};
use crate::core::types::{BlockIndex, Kb, Priority, ProcessId};
use ahash::RandomState;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::time::SystemTime;

#[derive(Debug, Clone)]
pub struct ProcessRegistry {
    live: HashMap<ProcessId, Process, RandomState>,
    order: Vec<ProcessId>,
    terminated: Vec<Process>,
    next_id: ProcessId,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self {
            live: HashMap::with_hasher(RandomState::new()),
            order: Vec::new(),
            terminated: Vec::new(),
            next_id: 1,
        }
    }

    /// Rebuild from restored records; id assignment resumes after the largest id seen
    ///
    /// Records are assumed to be validated by the caller. Returns `None` when the
    /// largest id leaves no successor.
    pub(crate) fn from_parts(active: Vec<Process>, terminated: Vec<Process>) -> Option<Self> {
        let max_id = active
            .iter()
            .chain(terminated.iter())
            .map(|p| p.id)
            .max()
            .unwrap_or(0);

        let mut registry = Self::new();
        registry.next_id = max_id.checked_add(1)?;
        for process in active {
            registry.order.push(process.id);
            registry.live.insert(process.id, process);
        }
        registry.terminated = terminated;
        registry.resort();
        Some(registry)
    }

    /// Id the next admitted process will receive
    #[inline]
    pub fn peek_next_id(&self) -> ProcessId {
        self.next_id
    }

    /// Whether every id has been handed out; `ProcessId::MAX` is never assigned
    #[inline]
    pub fn ids_exhausted(&self) -> bool {
        self.next_id == ProcessId::MAX
    }

    /// Admit a new Running process holding `block`
    pub(crate) fn admit(
        &mut self,
        requested_size: Kb,
        priority: Priority,
        block: BlockIndex,
        now: SystemTime,
    ) -> ProcessId {
        let id = self.next_id;
        self.next_id += 1;

        self.live
            .insert(id, Process::new(id, requested_size, priority, block, now));
        self.order.push(id);
        self.resort();
        id
    }

    #[inline]
    pub fn get(&self, pid: ProcessId) -> Option<&Process> {
        self.live.get(&pid)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, pid: ProcessId) -> Option<&mut Process> {
        self.live.get_mut(&pid)
    }

    /// Whether `pid` belongs to the terminated history
    pub fn is_terminated(&self, pid: ProcessId) -> bool {
        self.terminated.iter().any(|p| p.id == pid)
    }

    /// Drop a live process entirely
    pub(crate) fn remove(&mut self, pid: ProcessId) -> Option<Process> {
        let process = self.live.remove(&pid)?;
        self.order.retain(|id| *id != pid);
        Some(process)
    }

    /// Move a live process to the terminated history
    pub(crate) fn retire(&mut self, pid: ProcessId, now: SystemTime) -> Option<&Process> {
        let mut process = self.remove(pid)?;
        process.state = ProcessState::Terminated;
        process.block = None;
        process.end_time = Some(now);
        self.terminated.push(process);
        self.terminated.last()
    }

    /// Point a live process at a (renumbered) block
    pub(crate) fn set_block(&mut self, pid: ProcessId, block: BlockIndex) {
        if let Some(process) = self.live.get_mut(&pid) {
            process.block = Some(block);
        }
    }

    /// Re-sort the active view by `(priority desc, id asc)`
    pub(crate) fn resort(&mut self) {
        let live = &self.live;
        self.order
            .sort_by_key(|id| (Reverse(live.get(id).map_or(0, |p| p.priority)), *id));
    }

    /// Raise every live priority by `step`, clamped to `max`
    ///
    /// Returns the number of processes whose priority changed.
    pub(crate) fn age(&mut self, step: Priority, max: Priority) -> usize {
        let mut changed = 0;
        for process in self.live.values_mut() {
            let aged = process.priority.saturating_add(step).min(max);
            if aged != process.priority {
                process.priority = aged;
                changed += 1;
            }
        }
        if changed > 0 {
            self.resort();
        }
        changed
    }

    /// Active processes in priority order
    pub fn active(&self) -> impl Iterator<Item = &Process> + '_ {
        self.order.iter().filter_map(move |id| self.live.get(id))
    }

    /// Terminated processes in termination order
    pub fn terminated(&self) -> &[Process] {
        &self.terminated
    }

    /// Case-insensitive match on exact id or name substring over active processes
    pub fn search(&self, query: &str) -> Vec<&Process> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        self.active()
            .filter(|p| {
                p.id.to_string() == query
                    || p.name
                        .as_ref()
                        .is_some_and(|name| name.to_lowercase().contains(&query))
            })
            .collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

impl Default for ProcessRegistry {
    fn default() -> Self {
        Self::new()
    }
}
