/*!
 * Engine Queries
 * Read-only views; nothing here mutates state
 */

use super::AllocationEngine;
use crate::core::types::{BlockIndex, Kb, ProcessId};
use crate::memory::stats;
use crate::memory::types::{Block, BlockUsage, MemoryPressure, MemoryStats, Utilization};
use crate::process::types::Process;

impl AllocationEngine {
    /// Total free KB sitting in free blocks
    pub fn fragmentation(&self) -> Kb {
        stats::fragmentation(&self.table)
    }

    pub fn utilization(&self) -> Utilization {
        stats::utilization(&self.table)
    }

    pub fn stats(&self) -> MemoryStats {
        stats::memory_stats(&self.table)
    }

    pub fn pressure(&self) -> MemoryPressure {
        self.stats().memory_pressure()
    }

    /// One usage row per block, in table order
    pub fn block_usage(&self) -> Vec<BlockUsage> {
        stats::block_usage(&self.table)
    }

    #[inline]
    pub fn block(&self, index: BlockIndex) -> Option<&Block> {
        self.table.get(index)
    }

    #[inline]
    pub fn blocks(&self) -> &[Block] {
        self.table.blocks()
    }

    /// Live process by id; terminated processes are only in `terminated()`
    #[inline]
    pub fn process(&self, pid: ProcessId) -> Option<&Process> {
        self.registry.get(pid)
    }

    /// Active processes ordered by priority (desc) then id (asc)
    pub fn processes(&self) -> Vec<Process> {
        self.registry.active().cloned().collect()
    }

    pub fn terminated(&self) -> &[Process] {
        self.registry.terminated()
    }

    /// Active processes whose id equals `query` or whose name contains it
    pub fn search(&self, query: &str) -> Vec<Process> {
        self.registry.search(query).into_iter().cloned().collect()
    }
}
