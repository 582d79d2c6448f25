/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use crate::core::data_structures::InlineString;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::config::ConfigError;
pub use crate::engine::RestoreError;
pub use crate::memory::types::{AllocationError, BlockError, DeallocationError, UnknownOption};
pub use crate::persistence::PersistenceError;
pub use crate::process::types::LifecycleError;

/// Unified simulator error type with miette diagnostics
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SimError {
    #[error("Allocation failed: {0}")]
    #[diagnostic(
        code(sim::allocation),
        help("Sizes must be positive and fit a free block; priorities range from 1 to 10. Try `defrag`.")
    )]
    Allocation(#[from] AllocationError),

    #[error("Deallocation failed: {0}")]
    #[diagnostic(
        code(sim::deallocation),
        help("Only processes currently holding a block can be freed. Check `ps`.")
    )]
    Deallocation(#[from] DeallocationError),

    #[error("Lifecycle error: {0}")]
    #[diagnostic(
        code(sim::lifecycle),
        help("Terminated processes accept no further operations.")
    )]
    Lifecycle(#[from] LifecycleError),

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(sim::config),
        help("Review the PARTSIM_* environment variables.")
    )]
    Config(#[from] ConfigError),

    #[error("Restore failed: {0}")]
    #[diagnostic(
        code(sim::restore),
        help("The saved state is inconsistent. Remove the state file to start fresh.")
    )]
    Restore(#[from] RestoreError),

    #[error("Persistence error: {0}")]
    #[diagnostic(
        code(sim::persistence),
        help("Check that the state path is writable and holds a JSON snapshot.")
    )]
    Persistence(#[from] PersistenceError),

    #[error("Invalid command: {0}")]
    #[diagnostic(code(sim::command), help("Type `help` to list commands."))]
    Command(InlineString),
}

impl SimError {
    /// Stable machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            SimError::Allocation(_) => "allocation",
            SimError::Deallocation(_) => "deallocation",
            SimError::Lifecycle(_) => "lifecycle",
            SimError::Config(_) => "config",
            SimError::Restore(_) => "restore",
            SimError::Persistence(_) => "persistence",
            SimError::Command(_) => "command",
        }
    }
}

impl From<String> for SimError {
    fn from(msg: String) -> Self {
        SimError::Command(msg.into())
    }
}

impl From<UnknownOption> for SimError {
    fn from(err: UnknownOption) -> Self {
        SimError::Command(err.to_string().into())
    }
}

impl From<&str> for SimError {
    fn from(msg: &str) -> Self {
        SimError::Command(msg.into())
    }
}

/// Flat error representation for line-oriented output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SerializableError {
    pub error_type: InlineString,
    pub message: InlineString,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&SimError> for SerializableError {
    fn from(err: &SimError) -> Self {
        let details = serde_json::to_value(err)
            .ok()
            .and_then(|value| value.get("details").cloned());
        Self {
            error_type: err.kind().into(),
            message: err.to_string().into(),
            details,
        }
    }
}

impl From<SimError> for SerializableError {
    fn from(err: SimError) -> Self {
        Self::from(&err)
    }
}
