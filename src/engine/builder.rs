/*!
 * Engine Builder
 * Builder pattern for AllocationEngine construction
 */

use super::snapshot::{RestoreError, Snapshot};
use super::AllocationEngine;
use crate::config::{ConfigError, EngineConfig};
use crate::core::types::{Clock, Kb, Priority, SystemClock};
use crate::memory::{CommitPolicy, DefragStrategy, Placement};
use std::sync::Arc;
use tracing::info;

/// Builder for AllocationEngine
pub struct EngineBuilder {
    config: EngineConfig,
    clock: Option<Arc<dyn Clock>>,
}

impl EngineBuilder {
    /// Start from the default configuration
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            clock: None,
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Block capacities in KB, in table order
    pub fn with_capacities(mut self, capacities: Vec<Kb>) -> Self {
        self.config.capacities = capacities;
        self
    }

    /// Sort blocks by descending capacity at construction
    pub fn sort_blocks_desc(mut self, sort: bool) -> Self {
        self.config.sort_blocks_desc = sort;
        self
    }

    pub fn with_commit_policy(mut self, policy: CommitPolicy) -> Self {
        self.config.commit_policy = policy;
        self
    }

    /// Placement used by `allocate`
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.config.placement = placement;
        self
    }

    /// Strategy used by `defragment_default`
    pub fn with_defrag_strategy(mut self, strategy: DefragStrategy) -> Self {
        self.config.defrag_strategy = strategy;
        self
    }

    pub fn with_aging_step(mut self, step: Priority) -> Self {
        self.config.aging_step = step;
        self
    }

    /// Timestamp source; defaults to the system clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build a fresh engine with every block free
    pub fn build(self) -> Result<AllocationEngine, ConfigError> {
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let engine = AllocationEngine::with_clock(self.config, clock)?;

        info!(
            blocks = engine.blocks().len(),
            placement = %engine.config().placement,
            commit = ?engine.config().commit_policy,
            "Allocation engine ready"
        );
        Ok(engine)
    }

    /// Build an engine from a snapshot; configured capacities are ignored
    pub fn restore(self, snapshot: Snapshot) -> Result<AllocationEngine, RestoreError> {
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        AllocationEngine::restore_with_clock(self.config, snapshot, clock)
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
