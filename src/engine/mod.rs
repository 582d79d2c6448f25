/*!
 * Allocation Engine
 *
 * Owns the block table and the process registry exclusively. Every operation is a
 * synchronous transformation that either completes or leaves all state unchanged;
 * callers only ever see owned snapshots or shared borrows between operations.
 *
 * ## Operations
 *
 * - **Placement**: `allocate` / `allocate_with` / `allocate_batch`
 * - **Release**: `deallocate`, `terminate`
 * - **Compaction**: `defragment`
 * - **Lifecycle**: `suspend`, `resume`, `rename`, `apply_aging`
 * - **Queries**: `fragmentation`, `utilization`, `stats`, `block_usage`, `search`, `snapshot`
 *
 * `SharedEngine` wraps the engine in a single exclusive lock for concurrent hosts.
 */

mod allocator;
mod builder;
mod lifecycle;
mod query;
mod shared;
mod snapshot;

pub use builder::EngineBuilder;
pub use shared::SharedEngine;
pub use snapshot::{RestoreError, Snapshot};

use crate::config::{ConfigError, EngineConfig};
use crate::core::types::{Clock, SystemClock};
use crate::memory::BlockTable;
use crate::process::ProcessRegistry;
use std::fmt;
use std::sync::Arc;

/// Fixed-partition allocation engine
pub struct AllocationEngine {
    table: BlockTable,
    registry: ProcessRegistry,
    config: EngineConfig,
    clock: Arc<dyn Clock>,
}

impl AllocationEngine {
    /// Create an engine with the system clock
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create an engine reading timestamps from `clock`
    pub fn with_clock(config: EngineConfig, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
        config.validate()?;
        let table = BlockTable::new(&config.capacities, config.sort_blocks_desc);
        Ok(Self {
            table,
            registry: ProcessRegistry::new(),
            config,
            clock,
        })
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Re-point every live process at the block it occupies after a reshape
    fn sync_block_associations(&mut self) {
        for block in self.table.blocks() {
            if let Some(pid) = block.occupant {
                self.registry.set_block(pid, block.index);
            }
        }
    }
}

impl fmt::Debug for AllocationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AllocationEngine")
            .field("table", &self.table)
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
