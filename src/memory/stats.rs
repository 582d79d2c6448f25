/*!
 * Memory Statistics
 * Pure functions over a block table
 */

use super::table::BlockTable;
use super::types::{BlockUsage, MemoryStats, Utilization};
use crate::core::types::Kb;

/// Total free size over free blocks
pub fn fragmentation(table: &BlockTable) -> Kb {
    table
        .blocks()
        .iter()
        .filter(|b| b.is_free())
        .map(|b| b.free_size)
        .sum()
}

/// Total, used and free capacity; used is everything not sitting in a free block
pub fn utilization(table: &BlockTable) -> Utilization {
    let total: Kb = table.blocks().iter().map(|b| b.capacity).sum();
    let free = fragmentation(table);
    Utilization {
        total,
        used: total - free,
        free,
    }
}

pub fn memory_stats(table: &BlockTable) -> MemoryStats {
    let Utilization { total, used, free } = utilization(table);
    let free_blocks = table.blocks().iter().filter(|b| b.is_free()).count();
    let internal_waste = table
        .blocks()
        .iter()
        .filter(|b| !b.is_free())
        .map(|b| b.free_size)
        .sum();

    MemoryStats {
        total_memory: total,
        used_memory: used,
        free_memory: free,
        usage_percentage: if total == 0 {
            0.0
        } else {
            (used as f64 / total as f64) * 100.0
        },
        allocated_blocks: table.len() - free_blocks,
        free_blocks,
        largest_free_block: table.largest_free(),
        internal_waste,
    }
}

pub fn block_usage(table: &BlockTable) -> Vec<BlockUsage> {
    table.blocks().iter().map(BlockUsage::from).collect()
}
