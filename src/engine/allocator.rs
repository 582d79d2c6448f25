/*!
 * Engine Allocation
 * Placement, deallocation and compaction
 */

use super::AllocationEngine;
use crate::core::types::{Kb, Priority, ProcessId};
use crate::memory::defrag::{self, DefragReport, DefragStrategy};
use crate::memory::types::{
    AllocationError, AllocationResult, DeallocationError, DeallocationResult,
};
use crate::memory::Placement;
use crate::process::validation::{validate_priority, validate_size};
use tracing::{debug, info, warn};

impl AllocationEngine {
    /// Allocate with the configured default placement
    pub fn allocate(&mut self, size: Kb, priority: Priority) -> AllocationResult<ProcessId> {
        self.allocate_with(self.config.placement, size, priority)
    }

    /// Allocate a block for a new Running process using `placement`
    ///
    /// The table is only touched once a candidate has been found, so a failed
    /// request leaves every block and process untouched.
    pub fn allocate_with(
        &mut self,
        placement: Placement,
        size: Kb,
        priority: Priority,
    ) -> AllocationResult<ProcessId> {
        let size = validate_size(size)?;
        let priority = validate_priority(priority)?;
        if self.registry.ids_exhausted() {
            warn!(size, "No process id left to assign");
            return Err(AllocationError::IdsExhausted);
        }

        let Some(index) = placement.select(self.table.blocks(), size) else {
            let largest_free = self.table.largest_free();
            warn!(
                size,
                largest_free_kb = largest_free,
                %placement,
                "OOM: no free block can hold the request"
            );
            return Err(AllocationError::OutOfMemory {
                requested: size,
                largest_free,
            });
        };

        debug!(%placement, size, block = index, "Selected block");
        let now = self.clock.now();
        let pid = self.registry.peek_next_id();
        self.table
            .commit(index, pid, size, self.config.commit_policy);
        let admitted = self.registry.admit(size, priority, index, now);
        debug_assert_eq!(admitted, pid);

        info!(
            pid,
            block = index,
            size,
            priority,
            %placement,
            "Allocated process"
        );
        Ok(pid)
    }

    /// Allocate several sizes in order, one process per success
    ///
    /// A failed size does not stop later sizes.
    pub fn allocate_batch(
        &mut self,
        placement: Placement,
        sizes: &[Kb],
        priority: Priority,
    ) -> Vec<AllocationResult<ProcessId>> {
        sizes
            .iter()
            .map(|&size| self.allocate_with(placement, size, priority))
            .collect()
    }

    /// Release the block held by `pid` and drop the process
    pub fn deallocate(&mut self, pid: ProcessId) -> DeallocationResult<()> {
        let Some(index) = self.table.find_occupied_by(pid) else {
            warn!(pid, "Attempted to deallocate a process that holds no block");
            return Err(DeallocationError::ProcessNotFound(pid));
        };

        self.table.release(index);
        self.registry.remove(pid);

        info!(pid, block = index, "Deallocated process");
        Ok(())
    }

    /// Compact with the configured default strategy
    pub fn defragment_default(&mut self) -> DefragReport {
        self.defragment(self.config.defrag_strategy)
    }

    /// Compact free capacity; process identity and state are preserved
    pub fn defragment(&mut self, strategy: DefragStrategy) -> DefragReport {
        let report = defrag::defragment(&mut self.table, strategy);
        self.sync_block_associations();
        report
    }
}
