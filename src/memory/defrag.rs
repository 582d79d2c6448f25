/*!
 * Defragmentation
 *
 * Compacts free capacity in the block table:
 * - **Coalesce-adjacent**: each run of consecutive free blocks becomes one free block;
 *   occupied blocks are not moved relative to each other
 * - **Shift-and-aggregate**: occupied blocks move to the front (stable) and all free
 *   capacity becomes a single trailing free block
 *
 * Both passes are idempotent. Indices are renumbered afterwards, so callers that
 * track a process's block must re-read it from the table.
 */

use super::table::BlockTable;
use super::types::{Block, UnknownOption};
use crate::core::types::Kb;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// Compaction strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefragStrategy {
    #[default]
    CoalesceAdjacent,
    ShiftAndAggregate,
}

impl fmt::Display for DefragStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefragStrategy::CoalesceAdjacent => f.write_str("coalesce-adjacent"),
            DefragStrategy::ShiftAndAggregate => f.write_str("shift-and-aggregate"),
        }
    }
}

impl std::str::FromStr for DefragStrategy {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coalesce" | "coalesce-adjacent" | "coalesce_adjacent" => {
                Ok(DefragStrategy::CoalesceAdjacent)
            }
            "shift" | "shift-and-aggregate" | "shift_and_aggregate" | "compact" => {
                Ok(DefragStrategy::ShiftAndAggregate)
            }
            other => Err(UnknownOption::new("defragmentation strategy", other)),
        }
    }
}

/// Outcome of one compaction pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefragReport {
    pub strategy: DefragStrategy,
    pub blocks_before: usize,
    pub blocks_after: usize,
    pub largest_free_before: Kb,
    pub largest_free_after: Kb,
}

impl DefragReport {
    /// Whether the pass reshaped the table
    pub fn changed(&self) -> bool {
        self.blocks_before != self.blocks_after
            || self.largest_free_before != self.largest_free_after
    }
}

/// Run a compaction pass over `table`
pub fn defragment(table: &mut BlockTable, strategy: DefragStrategy) -> DefragReport {
    let blocks_before = table.len();
    let largest_free_before = table.largest_free();

    let compacted = match strategy {
        DefragStrategy::CoalesceAdjacent => coalesce_adjacent(table.blocks()),
        DefragStrategy::ShiftAndAggregate => shift_and_aggregate(table.blocks()),
    };
    table.replace(compacted);

    let report = DefragReport {
        strategy,
        blocks_before,
        blocks_after: table.len(),
        largest_free_before,
        largest_free_after: table.largest_free(),
    };

    if report.changed() {
        info!(
            %strategy,
            blocks_before,
            blocks_after = report.blocks_after,
            largest_free_kb = report.largest_free_after,
            "Defragmented block table"
        );
    }
    report
}

fn coalesce_adjacent(blocks: &[Block]) -> Vec<Block> {
    let mut out = Vec::with_capacity(blocks.len());
    let mut run: Kb = 0;

    for block in blocks {
        if block.is_free() {
            run += block.capacity;
            continue;
        }
        if run > 0 {
            out.push(Block::new(out.len(), run));
            run = 0;
        }
        out.push(block.clone());
    }
    if run > 0 {
        out.push(Block::new(out.len(), run));
    }
    out
}

fn shift_and_aggregate(blocks: &[Block]) -> Vec<Block> {
    let mut out: Vec<Block> = blocks.iter().filter(|b| !b.is_free()).cloned().collect();
    let free_total: Kb = blocks
        .iter()
        .filter(|b| b.is_free())
        .map(|b| b.capacity)
        .sum();

    if free_total > 0 {
        out.push(Block::new(out.len(), free_total));
    }
    out
}
