/*!
 * Memory Types
 * Common types for the block table and its statistics
 */

use crate::core::serde::is_none;
use crate::core::types::{BlockIndex, Kb, ProcessId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Allocation operation result
pub type AllocationResult<T> = Result<T, AllocationError>;

/// Deallocation operation result
pub type DeallocationResult<T> = Result<T, DeallocationError>;

/// Allocation errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum AllocationError {
    #[error("Invalid size '{0}': must be a positive number of KB")]
    InvalidSize(String),

    #[error("Invalid priority '{0}': must be between 1 and 10")]
    InvalidPriority(String),

    #[error("Out of memory: requested {requested}KB, largest free block {largest_free}KB")]
    OutOfMemory { requested: Kb, largest_free: Kb },

    #[error("Process ids exhausted")]
    IdsExhausted,
}

/// Deallocation errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum DeallocationError {
    #[error("Process P{0} not found")]
    ProcessNotFound(ProcessId),
}

/// Block table invariant violations
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum BlockError {
    #[error("Block at position {position} carries index {index}")]
    IndexMismatch {
        position: usize,
        index: BlockIndex,
    },

    #[error("Block {index} has zero capacity")]
    ZeroCapacity { index: BlockIndex },

    #[error("Block {index} free size {free_size}KB exceeds capacity {capacity}KB")]
    FreeSizeExceedsCapacity {
        index: BlockIndex,
        free_size: Kb,
        capacity: Kb,
    },

    #[error("Free block {index} has free size {free_size}KB but capacity {capacity}KB")]
    PartiallyFree {
        index: BlockIndex,
        free_size: Kb,
        capacity: Kb,
    },

    #[error("Total block capacity does not fit in {}KB", Kb::MAX)]
    CapacityOverflow,
}

/// Unrecognized name for a selectable option
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownOption {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownOption {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Sum of `capacities`, or `None` when it overflows `Kb`
pub fn total_capacity(capacities: impl IntoIterator<Item = Kb>) -> Option<Kb> {
    capacities
        .into_iter()
        .try_fold(0 as Kb, |total, capacity| total.checked_add(capacity))
}

/// How much of a block a placed process consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitPolicy {
    /// Block keeps `capacity - request` as residual free size (internal waste)
    #[default]
    Partition,
    /// Entire block is consumed regardless of request size
    WholeBlock,
}

impl CommitPolicy {
    /// Free size left in a block of `capacity` after committing `request`
    #[inline]
    #[must_use]
    pub const fn residual(self, capacity: Kb, request: Kb) -> Kb {
        match self {
            CommitPolicy::Partition => capacity - request,
            CommitPolicy::WholeBlock => 0,
        }
    }
}

impl std::str::FromStr for CommitPolicy {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "partition" => Ok(CommitPolicy::Partition),
            "whole" | "whole_block" | "wholeblock" => Ok(CommitPolicy::WholeBlock),
            other => Err(UnknownOption::new("commit policy", other)),
        }
    }
}

/// Memory block metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: BlockIndex,
    pub capacity: Kb,
    pub free_size: Kb,
    #[serde(default, skip_serializing_if = "is_none")]
    pub occupant: Option<ProcessId>,
}

impl Block {
    pub fn new(index: BlockIndex, capacity: Kb) -> Self {
        Self {
            index,
            capacity,
            free_size: capacity,
            occupant: None,
        }
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_free(&self) -> bool {
        self.occupant.is_none()
    }

    /// KB committed to the occupant (zero when free)
    #[inline]
    #[must_use]
    pub const fn used(&self) -> Kb {
        if self.occupant.is_some() {
            self.capacity - self.free_size
        } else {
            0
        }
    }

    /// Check the block invariants, reporting the first violation
    pub fn check(&self) -> Result<(), BlockError> {
        if self.capacity == 0 {
            return Err(BlockError::ZeroCapacity { index: self.index });
        }
        if self.free_size > self.capacity {
            return Err(BlockError::FreeSizeExceedsCapacity {
                index: self.index,
                free_size: self.free_size,
                capacity: self.capacity,
            });
        }
        if self.is_free() && self.free_size != self.capacity {
            return Err(BlockError::PartiallyFree {
                index: self.index,
                free_size: self.free_size,
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}

/// Memory utilization figures; `used + free == total` always holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utilization {
    pub total: Kb,
    pub used: Kb,
    pub free: Kb,
}

/// Memory statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total_memory: Kb,
    pub used_memory: Kb,
    pub free_memory: Kb,
    pub usage_percentage: f64,
    pub allocated_blocks: usize,
    pub free_blocks: usize,
    pub largest_free_block: Kb,
    /// Residual KB left inside occupied blocks (partition commit only)
    pub internal_waste: Kb,
}

impl MemoryStats {
    pub fn memory_pressure(&self) -> MemoryPressure {
        MemoryPressure::from_ratio(self.usage_percentage / 100.0)
    }
}

/// Memory pressure levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryPressure {
    Low,
    Medium,
    High,
    Critical,
}

impl MemoryPressure {
    pub fn from_ratio(ratio: f64) -> Self {
        use crate::core::limits::{
            PRESSURE_CRITICAL_RATIO, PRESSURE_HIGH_RATIO, PRESSURE_MEDIUM_RATIO,
        };

        if ratio >= PRESSURE_CRITICAL_RATIO {
            MemoryPressure::Critical
        } else if ratio >= PRESSURE_HIGH_RATIO {
            MemoryPressure::High
        } else if ratio >= PRESSURE_MEDIUM_RATIO {
            MemoryPressure::Medium
        } else {
            MemoryPressure::Low
        }
    }
}

impl std::fmt::Display for MemoryPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MemoryPressure::Low => write!(f, "LOW"),
            MemoryPressure::Medium => write!(f, "MEDIUM"),
            MemoryPressure::High => write!(f, "HIGH"),
            MemoryPressure::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Per-block usage row consumed by chart renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockUsage {
    pub index: BlockIndex,
    pub capacity: Kb,
    pub used: Kb,
    pub free: Kb,
    #[serde(default, skip_serializing_if = "is_none")]
    pub occupant: Option<ProcessId>,
}

impl From<&Block> for BlockUsage {
    fn from(block: &Block) -> Self {
        Self {
            index: block.index,
            capacity: block.capacity,
            used: block.used(),
            free: block.free_size,
            occupant: block.occupant,
        }
    }
}
