/*!
 * Placement Strategies
 *
 * Selects which free block services an allocation request.
 *
 * - **First-fit**: first candidate in table order
 * - **Best-fit**: tightest candidate (smallest free size)
 * - **Worst-fit**: loosest candidate (largest free size)
 *
 * A candidate is a free block whose free size is at least the request.
 * Ties in best/worst-fit go to the lowest index. All strategies are O(n).
 */

use super::types::{Block, UnknownOption};
use crate::core::types::{BlockIndex, Kb};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Block selection interface
pub trait PlacementStrategy: Send + Sync {
    /// Human-readable strategy name
    fn name(&self) -> &'static str;

    /// Index of the block to commit, or `None` if no candidate fits
    fn select(&self, blocks: &[Block], size: Kb) -> Option<BlockIndex>;
}

#[inline]
fn candidates(blocks: &[Block], size: Kb) -> impl Iterator<Item = &Block> {
    blocks
        .iter()
        .filter(move |b| b.is_free() && b.free_size >= size)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFit;

impl PlacementStrategy for FirstFit {
    fn name(&self) -> &'static str {
        "first-fit"
    }

    fn select(&self, blocks: &[Block], size: Kb) -> Option<BlockIndex> {
        candidates(blocks, size).next().map(|b| b.index)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BestFit;

impl PlacementStrategy for BestFit {
    fn name(&self) -> &'static str {
        "best-fit"
    }

    fn select(&self, blocks: &[Block], size: Kb) -> Option<BlockIndex> {
        // min_by_key returns the first minimum, so ties keep the lowest index
        candidates(blocks, size)
            .min_by_key(|b| b.free_size)
            .map(|b| b.index)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WorstFit;

impl PlacementStrategy for WorstFit {
    fn name(&self) -> &'static str {
        "worst-fit"
    }

    fn select(&self, blocks: &[Block], size: Kb) -> Option<BlockIndex> {
        // max_by keeps the last of equal elements, so indices compare in reverse
        candidates(blocks, size)
            .max_by(|a, b| a.free_size.cmp(&b.free_size).then(b.index.cmp(&a.index)))
            .map(|b| b.index)
    }
}

/// Placement algorithm choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    #[default]
    FirstFit,
    BestFit,
    WorstFit,
}

impl Placement {
    pub const ALL: [Placement; 3] = [Placement::FirstFit, Placement::BestFit, Placement::WorstFit];

    /// Strategy implementation for this choice
    pub fn strategy(self) -> &'static dyn PlacementStrategy {
        match self {
            Placement::FirstFit => &FirstFit,
            Placement::BestFit => &BestFit,
            Placement::WorstFit => &WorstFit,
        }
    }

    #[inline]
    pub fn select(self, blocks: &[Block], size: Kb) -> Option<BlockIndex> {
        self.strategy().select(blocks, size)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.strategy().name())
    }
}

impl std::str::FromStr for Placement {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(|c: char| c == '_' || c == ' ', "-").as_str() {
            "first" | "first-fit" | "firstfit" => Ok(Placement::FirstFit),
            "best" | "best-fit" | "bestfit" => Ok(Placement::BestFit),
            "worst" | "worst-fit" | "worstfit" => Ok(Placement::WorstFit),
            other => Err(UnknownOption::new("placement strategy", other)),
        }
    }
}
