/*!
 * Partition Simulator Library
 * Fixed-partition memory allocation engine exposed as a library
 */

pub mod config;
pub mod core;
pub mod engine;
pub mod memory;
pub mod monitoring;
pub mod persistence;
pub mod process;

// Re-exports
pub use config::{ConfigError, EngineConfig};
pub use crate::core::errors::{SerializableError, SimError};
pub use crate::core::types::{BlockIndex, Clock, Kb, Priority, ProcessId, SystemClock};
pub use engine::{AllocationEngine, EngineBuilder, RestoreError, SharedEngine, Snapshot};
pub use memory::{
    AllocationError, Block, BlockError, BlockUsage, CommitPolicy, DeallocationError, DefragReport,
    DefragStrategy, MemoryPressure, MemoryStats, Placement, Utilization,
};
pub use monitoring::init_tracing;
pub use persistence::{PersistenceError, StateStore};
pub use process::{LifecycleError, Process, ProcessState, Transition};
