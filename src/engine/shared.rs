/*!
 * Shared Engine
 *
 * Thread-safe handle around a single engine. Mutations take the write lock for
 * their whole duration, so every operation is atomic with respect to every
 * other; queries share the read lock and return owned values.
 */

use super::{AllocationEngine, Snapshot};
use crate::core::types::{Kb, Priority, ProcessId};
use crate::memory::types::{
    AllocationResult, BlockUsage, DeallocationResult, MemoryStats, Utilization,
};
use crate::memory::{DefragReport, DefragStrategy, Placement};
use crate::process::types::{LifecycleResult, Process};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

/// Cloneable, lock-protected engine handle
#[derive(Debug, Clone)]
pub struct SharedEngine {
    inner: Arc<RwLock<AllocationEngine>>,
}

impl SharedEngine {
    pub fn new(engine: AllocationEngine) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    /// Run `f` under the read lock
    pub fn read<R>(&self, f: impl FnOnce(&AllocationEngine) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` under the write lock; use for multi-step sequences that must not interleave
    pub fn write<R>(&self, f: impl FnOnce(&mut AllocationEngine) -> R) -> R {
        f(&mut self.inner.write())
    }

    pub fn allocate(&self, size: Kb, priority: Priority) -> AllocationResult<ProcessId> {
        self.inner.write().allocate(size, priority)
    }

    pub fn allocate_with(
        &self,
        placement: Placement,
        size: Kb,
        priority: Priority,
    ) -> AllocationResult<ProcessId> {
        self.inner.write().allocate_with(placement, size, priority)
    }

    pub fn allocate_batch(
        &self,
        placement: Placement,
        sizes: &[Kb],
        priority: Priority,
    ) -> Vec<AllocationResult<ProcessId>> {
        self.inner.write().allocate_batch(placement, sizes, priority)
    }

    pub fn deallocate(&self, pid: ProcessId) -> DeallocationResult<()> {
        self.inner.write().deallocate(pid)
    }

    pub fn defragment(&self, strategy: DefragStrategy) -> DefragReport {
        self.inner.write().defragment(strategy)
    }

    pub fn suspend(&self, pid: ProcessId) -> LifecycleResult<()> {
        self.inner.write().suspend(pid)
    }

    pub fn resume(&self, pid: ProcessId) -> LifecycleResult<()> {
        self.inner.write().resume(pid)
    }

    pub fn terminate(&self, pid: ProcessId) -> LifecycleResult<Duration> {
        self.inner.write().terminate(pid)
    }

    pub fn rename(&self, pid: ProcessId, name: &str) -> LifecycleResult<()> {
        self.inner.write().rename(pid, name)
    }

    pub fn apply_aging(&self) -> usize {
        self.inner.write().apply_aging()
    }

    pub fn fragmentation(&self) -> Kb {
        self.inner.read().fragmentation()
    }

    pub fn utilization(&self) -> Utilization {
        self.inner.read().utilization()
    }

    pub fn stats(&self) -> MemoryStats {
        self.inner.read().stats()
    }

    pub fn block_usage(&self) -> Vec<BlockUsage> {
        self.inner.read().block_usage()
    }

    pub fn processes(&self) -> Vec<Process> {
        self.inner.read().processes()
    }

    pub fn search(&self, query: &str) -> Vec<Process> {
        self.inner.read().search(query)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.inner.read().snapshot()
    }
}

impl From<AllocationEngine> for SharedEngine {
    fn from(engine: AllocationEngine) -> Self {
        Self::new(engine)
    }
}
