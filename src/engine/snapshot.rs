/*!
 * Engine Snapshots
 *
 * A snapshot is the complete engine state: block table, active processes in
 * priority order and the terminated history. Restoring validates every
 * cross-reference before an engine is handed out, so a restored engine holds the
 * same invariants as one built from scratch.
 */

use super::AllocationEngine;
use crate::config::{ConfigError, EngineConfig};
use crate::core::limits::{MAX_PRIORITY, MIN_PRIORITY};
use crate::core::serde::is_empty_vec;
use crate::core::types::{BlockIndex, Clock, Kb, ProcessId, SystemClock};
use crate::memory::types::{Block, BlockError};
use crate::memory::BlockTable;
use crate::process::types::{Process, ProcessState};
use crate::process::ProcessRegistry;
use ahash::{HashMap, HashMapExt, HashSet, HashSetExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Serializable engine state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub blocks: Vec<Block>,
    /// Active processes, priority desc then id asc
    pub processes: Vec<Process>,
    #[serde(default, skip_serializing_if = "is_empty_vec")]
    pub terminated: Vec<Process>,
}

/// Reasons a snapshot cannot become an engine
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum RestoreError {
    #[error("Snapshot contains no blocks")]
    EmptyTable,

    #[error("Invalid block in snapshot: {0}")]
    InvalidBlock(#[from] BlockError),

    #[error("Process id {0} is outside the assignable range")]
    InvalidProcessId(ProcessId),

    #[error("Process P{0} appears more than once")]
    DuplicateProcess(ProcessId),

    #[error("Blocks {first} and {second} are both held by P{pid}")]
    DuplicateOccupant {
        pid: ProcessId,
        first: BlockIndex,
        second: BlockIndex,
    },

    #[error("Block {block} is held by P{pid}, which is not an active process")]
    UnknownOccupant { pid: ProcessId, block: BlockIndex },

    #[error("Process P{pid} is active but holds no block")]
    ProcessWithoutBlock { pid: ProcessId },

    #[error("Process P{pid} claims block {claimed:?} but holds block {actual}")]
    BlockMismatch {
        pid: ProcessId,
        claimed: Option<BlockIndex>,
        actual: BlockIndex,
    },

    #[error("Process P{pid} requests {requested}KB, which a {capacity}KB block cannot hold")]
    InvalidRequest {
        pid: ProcessId,
        requested: Kb,
        capacity: Kb,
    },

    #[error("Block {block} commits {used}KB to P{pid}, which requested {requested}KB")]
    UsageMismatch {
        pid: ProcessId,
        block: BlockIndex,
        requested: Kb,
        used: Kb,
    },

    #[error("Process P{pid} has invalid priority {priority}")]
    InvalidPriority { pid: ProcessId, priority: u8 },

    #[error("Process P{pid} is listed as {listed} but recorded as {state}")]
    StateMismatch {
        pid: ProcessId,
        listed: String,
        state: ProcessState,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl AllocationEngine {
    /// Capture the complete engine state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            blocks: self.table.blocks().to_vec(),
            processes: self.processes(),
            terminated: self.registry.terminated().to_vec(),
        }
    }

    /// Rebuild an engine from `snapshot` with the system clock
    ///
    /// Tuning options (placement, commit policy, aging step) come from `config`;
    /// the block table comes from the snapshot.
    pub fn restore(config: EngineConfig, snapshot: Snapshot) -> Result<Self, RestoreError> {
        Self::restore_with_clock(config, snapshot, Arc::new(SystemClock))
    }

    pub fn restore_with_clock(
        config: EngineConfig,
        snapshot: Snapshot,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, RestoreError> {
        config.validate_tuning()?;
        let Snapshot {
            blocks,
            processes,
            terminated,
        } = snapshot;

        let table = restore_table(blocks)?;
        check_processes(&table, &processes, &terminated)?;
        let registry = ProcessRegistry::from_parts(processes, terminated)
            .ok_or(RestoreError::InvalidProcessId(ProcessId::MAX))?;

        info!(
            blocks = table.len(),
            active = registry.active().count(),
            terminated = registry.terminated().len(),
            "Restored engine from snapshot"
        );
        Ok(Self {
            table,
            registry,
            config,
            clock,
        })
    }
}

fn restore_table(blocks: Vec<Block>) -> Result<BlockTable, RestoreError> {
    if blocks.is_empty() {
        return Err(RestoreError::EmptyTable);
    }
    if let Some((position, block)) = blocks
        .iter()
        .enumerate()
        .find(|(position, block)| block.index != *position)
    {
        return Err(BlockError::IndexMismatch {
            position,
            index: block.index,
        }
        .into());
    }

    let table = BlockTable::from_blocks(blocks);
    table.check()?;
    Ok(table)
}

fn check_processes(
    table: &BlockTable,
    active: &[Process],
    terminated: &[Process],
) -> Result<(), RestoreError> {
    let mut seen = HashSet::new();
    for process in active.iter().chain(terminated) {
        // Id 0 is never assigned and MAX would leave no id to hand out next
        if process.id == 0 || process.id == ProcessId::MAX {
            return Err(RestoreError::InvalidProcessId(process.id));
        }
        if !seen.insert(process.id) {
            return Err(RestoreError::DuplicateProcess(process.id));
        }
    }

    let mut holders: HashMap<ProcessId, BlockIndex> = HashMap::new();
    for block in table.blocks() {
        let Some(pid) = block.occupant else { continue };
        if let Some(&first) = holders.get(&pid) {
            return Err(RestoreError::DuplicateOccupant {
                pid,
                first,
                second: block.index,
            });
        }
        holders.insert(pid, block.index);
    }

    for process in active {
        let pid = process.id;
        if !process.state.holds_block() {
            return Err(RestoreError::StateMismatch {
                pid,
                listed: "active".to_string(),
                state: process.state,
            });
        }
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&process.priority) {
            return Err(RestoreError::InvalidPriority {
                pid,
                priority: process.priority,
            });
        }
        let Some(actual) = holders.remove(&pid) else {
            return Err(RestoreError::ProcessWithoutBlock { pid });
        };
        if process.block != Some(actual) {
            return Err(RestoreError::BlockMismatch {
                pid,
                claimed: process.block,
                actual,
            });
        }
        if let Some(block) = table.get(actual) {
            check_commit(process, block)?;
        }
    }

    // Anything left is held by a process that is not active
    if let Some((&pid, &block)) = holders.iter().min_by_key(|(_, block)| **block) {
        return Err(RestoreError::UnknownOccupant { pid, block });
    }

    for process in terminated {
        if !process.is_terminated() || process.block.is_some() {
            return Err(RestoreError::StateMismatch {
                pid: process.id,
                listed: "terminated".to_string(),
                state: process.state,
            });
        }
    }
    Ok(())
}

/// A held block must fit the request and commit either exactly the request
/// (partition commit) or the whole block
fn check_commit(process: &Process, block: &Block) -> Result<(), RestoreError> {
    let requested = process.requested_size;
    if requested == 0 || requested > block.capacity {
        return Err(RestoreError::InvalidRequest {
            pid: process.id,
            requested,
            capacity: block.capacity,
        });
    }
    let used = block.used();
    if used != requested && used != block.capacity {
        return Err(RestoreError::UsageMismatch {
            pid: process.id,
            block: block.index,
            requested,
            used,
        });
    }
    Ok(())
}
