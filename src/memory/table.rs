/*!
 * Block Table
 * Ordered sequence of fixed partitions
 */

use super::types::{total_capacity, Block, BlockError, CommitPolicy};
use crate::core::types::{BlockIndex, Kb, ProcessId};
use tracing::{debug, info};

/// Ordered sequence of blocks, fixed length except where defragmentation reshapes it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockTable {
    blocks: Vec<Block>,
}

impl BlockTable {
    /// Build a table of free blocks, optionally sorted by descending capacity
    ///
    /// Capacities are assumed to be validated (non-empty, all positive).
    pub fn new(capacities: &[Kb], sort_desc: bool) -> Self {
        let mut sizes = capacities.to_vec();
        if sort_desc {
            // Stable, so equal capacities keep their configured order
            sizes.sort_by(|a, b| b.cmp(a));
        }

        let blocks: Vec<Block> = sizes
            .into_iter()
            .enumerate()
            .map(|(index, capacity)| Block::new(index, capacity))
            .collect();

        info!(
            blocks = blocks.len(),
            total_kb = blocks.iter().fold(0, |t: Kb, b| t.saturating_add(b.capacity)),
            sorted = sort_desc,
            "Block table initialized"
        );
        Self { blocks }
    }

    /// Adopt blocks from a snapshot, renumbering indices to table order
    pub(crate) fn from_blocks(mut blocks: Vec<Block>) -> Self {
        for (index, block) in blocks.iter_mut().enumerate() {
            block.index = index;
        }
        Self { blocks }
    }

    #[inline]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    #[inline]
    pub fn get(&self, index: BlockIndex) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Index of the block held by `pid`
    pub fn find_occupied_by(&self, pid: ProcessId) -> Option<BlockIndex> {
        self.blocks.iter().position(|b| b.occupant == Some(pid))
    }

    /// Largest free size among free blocks (0 when none)
    pub fn largest_free(&self) -> Kb {
        self.blocks
            .iter()
            .filter(|b| b.is_free())
            .map(|b| b.free_size)
            .max()
            .unwrap_or(0)
    }

    /// Commit a free block to `pid`
    ///
    /// The caller has already selected `index` as a candidate for `size`.
    pub(crate) fn commit(
        &mut self,
        index: BlockIndex,
        pid: ProcessId,
        size: Kb,
        policy: CommitPolicy,
    ) {
        let block = &mut self.blocks[index];
        debug_assert!(block.is_free() && block.free_size >= size);
        block.occupant = Some(pid);
        block.free_size = policy.residual(block.free_size, size);
        debug!(
            pid,
            block = index,
            size,
            residual = block.free_size,
            "Committed block"
        );
    }

    /// Release the block at `index`, restoring its original capacity
    ///
    /// Returns the previous occupant.
    pub(crate) fn release(&mut self, index: BlockIndex) -> Option<ProcessId> {
        let block = &mut self.blocks[index];
        let previous = block.occupant.take();
        block.free_size = block.capacity;
        previous
    }

    /// Replace the table contents (used by compaction), renumbering indices
    pub(crate) fn replace(&mut self, blocks: Vec<Block>) {
        *self = Self::from_blocks(blocks);
    }

    /// Check every block invariant
    pub fn check(&self) -> Result<(), BlockError> {
        for (position, block) in self.blocks.iter().enumerate() {
            if block.index != position {
                return Err(BlockError::IndexMismatch {
                    position,
                    index: block.index,
                });
            }
            block.check()?;
        }
        // Statistics and compaction sum capacities unchecked
        if total_capacity(self.blocks.iter().map(|b| b.capacity)).is_none() {
            return Err(BlockError::CapacityOverflow);
        }
        Ok(())
    }
}
