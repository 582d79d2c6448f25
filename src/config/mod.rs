/*!
 * Engine Configuration
 *
 * Deployment-time options with defaults and environment overrides.
 *
 * Environment variables:
 * - PARTSIM_BLOCKS: block capacities in KB, comma or space separated
 * - PARTSIM_SORT_DESC: sort blocks by descending capacity before first use (1/true)
 * - PARTSIM_COMMIT: `partition` (residual tracked) or `whole` (entire block consumed)
 * - PARTSIM_PLACEMENT: default placement (`first`, `best`, `worst`)
 * - PARTSIM_DEFRAG: default compaction (`coalesce`, `shift`)
 * - PARTSIM_STATE_PATH: JSON file the CLI restores from and saves to
 */

use crate::core::limits::{
    DEFAULT_AGING_STEP, DEFAULT_BLOCK_CAPACITIES, ENV_BLOCKS, ENV_COMMIT, ENV_DEFRAG,
    ENV_PLACEMENT, ENV_SORT_DESC, ENV_STATE_PATH,
};
use crate::core::serde::is_none;
use crate::core::types::{Kb, Priority};
use crate::memory::types::total_capacity;
use crate::memory::{CommitPolicy, DefragStrategy, Placement};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ConfigError {
    #[error("Block table must contain at least one block")]
    EmptyBlockTable,

    #[error("Block {index} has zero capacity")]
    ZeroCapacity { index: usize },

    #[error("Total block capacity does not fit in {}KB", Kb::MAX)]
    CapacityOverflow,

    #[error("Aging step must be positive")]
    ZeroAgingStep,

    #[error("Invalid value for {var}: '{value}' ({reason})")]
    InvalidValue {
        var: String,
        value: String,
        reason: String,
    },
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub capacities: Vec<Kb>,
    pub sort_blocks_desc: bool,
    pub commit_policy: CommitPolicy,
    pub placement: Placement,
    pub defrag_strategy: DefragStrategy,
    pub aging_step: Priority,
    #[serde(default, skip_serializing_if = "is_none")]
    pub state_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            capacities: DEFAULT_BLOCK_CAPACITIES.to_vec(),
            sort_blocks_desc: false,
            commit_policy: CommitPolicy::default(),
            placement: Placement::default(),
            defrag_strategy: DefragStrategy::default(),
            aging_step: DEFAULT_AGING_STEP,
            state_path: None,
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with `PARTSIM_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overlaid with values from `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_BLOCKS) {
            config.capacities = parse_capacities(&raw).map_err(|reason| invalid(ENV_BLOCKS, &raw, reason))?;
        }
        if let Some(raw) = lookup(ENV_SORT_DESC) {
            config.sort_blocks_desc = parse_bool(&raw).ok_or_else(|| {
                invalid(ENV_SORT_DESC, &raw, "expected true/false")
            })?;
        }
        if let Some(raw) = lookup(ENV_COMMIT) {
            config.commit_policy = raw.parse().map_err(|reason| invalid(ENV_COMMIT, &raw, reason))?;
        }
        if let Some(raw) = lookup(ENV_PLACEMENT) {
            config.placement = raw.parse().map_err(|reason| invalid(ENV_PLACEMENT, &raw, reason))?;
        }
        if let Some(raw) = lookup(ENV_DEFRAG) {
            config.defrag_strategy = raw.parse().map_err(|reason| invalid(ENV_DEFRAG, &raw, reason))?;
        }
        if let Some(raw) = lookup(ENV_STATE_PATH) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                config.state_path = Some(PathBuf::from(trimmed));
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Check block capacities and tuning values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacities.is_empty() {
            return Err(ConfigError::EmptyBlockTable);
        }
        if let Some(index) = self.capacities.iter().position(|c| *c == 0) {
            return Err(ConfigError::ZeroCapacity { index });
        }
        if total_capacity(self.capacities.iter().copied()).is_none() {
            return Err(ConfigError::CapacityOverflow);
        }
        self.validate_tuning()
    }

    /// Check everything except the block capacities (restored tables bring their own)
    pub(crate) fn validate_tuning(&self) -> Result<(), ConfigError> {
        if self.aging_step == 0 {
            return Err(ConfigError::ZeroAgingStep);
        }
        Ok(())
    }
}

fn invalid(var: &str, value: &str, reason: impl fmt::Display) -> ConfigError {
    ConfigError::InvalidValue {
        var: var.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse `"50, 30 100"` style capacity lists
pub fn parse_capacities(raw: &str) -> Result<Vec<Kb>, String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<Kb>()
                .map_err(|_| format!("'{}' is not a block size", part))
        })
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
