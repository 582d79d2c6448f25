/*!
 * Process Types
 * Common types for process bookkeeping
 */

use crate::core::data_structures::InlineString;
use crate::core::serde::{is_none, optional_system_time_micros, system_time_micros};
use crate::core::types::{BlockIndex, Kb, Priority, ProcessId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime};
use thiserror::Error;

/// Lifecycle operation result
pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Lifecycle errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum LifecycleError {
    #[error("Process P{0} not found")]
    ProcessNotFound(ProcessId),

    #[error("Cannot {operation} P{pid}: process is {from}")]
    InvalidTransition {
        pid: ProcessId,
        from: ProcessState,
        operation: Transition,
    },

    #[error("Invalid process name: {0}")]
    InvalidName(String),
}

/// Process state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Process holds a block and is running
    Running,
    /// Process holds a block but is paused
    Suspended,
    /// Process has released its block; absorbing
    Terminated,
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessState::Running => f.write_str("Running"),
            ProcessState::Suspended => f.write_str("Suspended"),
            ProcessState::Terminated => f.write_str("Terminated"),
        }
    }
}

/// Lifecycle operations that act on process state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Suspend,
    Resume,
    Terminate,
    Rename,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Suspend => f.write_str("suspend"),
            Transition::Resume => f.write_str("resume"),
            Transition::Terminate => f.write_str("terminate"),
            Transition::Rename => f.write_str("rename"),
        }
    }
}

/// Process record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub id: ProcessId,
    pub requested_size: Kb,
    pub priority: Priority,
    pub state: ProcessState,
    #[serde(default, skip_serializing_if = "is_none")]
    pub name: Option<InlineString>,
    /// Block held while Running or Suspended
    #[serde(default, skip_serializing_if = "is_none")]
    pub block: Option<BlockIndex>,
    #[serde(with = "system_time_micros")]
    pub start_time: SystemTime,
    #[serde(
        with = "optional_system_time_micros",
        default,
        skip_serializing_if = "is_none"
    )]
    pub end_time: Option<SystemTime>,
}

impl Process {
    #[inline]
    #[must_use]
    pub fn new(
        id: ProcessId,
        requested_size: Kb,
        priority: Priority,
        block: BlockIndex,
        start_time: SystemTime,
    ) -> Self {
        Self {
            id,
            requested_size,
            priority,
            state: ProcessState::Running,
            name: None,
            block: Some(block),
            start_time,
            end_time: None,
        }
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.state, ProcessState::Running)
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_terminated(&self) -> bool {
        matches!(self.state, ProcessState::Terminated)
    }

    /// Runtime between start and end; `None` until terminated
    pub fn elapsed(&self) -> Option<Duration> {
        self.end_time
            .map(|end| end.duration_since(self.start_time).unwrap_or_default())
    }

    /// Label used in logs and listings, e.g. `P3` or `P3 (editor)`
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("P{} ({})", self.id, name),
            None => format!("P{}", self.id),
        }
    }
}
