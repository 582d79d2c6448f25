/*!
 * Core Types
 * Common types used across the simulator
 */

use std::time::SystemTime;

/// Process ID type (assigned from 1, never reused within a session)
pub type ProcessId = u32;

/// Memory quantity in kilobytes
pub type Kb = u64;

/// Priority level (valid range 1-10, higher is more important)
pub type Priority = u8;

/// Ordinal position of a block in the block table
pub type BlockIndex = usize;

/// Source of wall-clock timestamps
///
/// Timestamps are read once per operation; the engine never advances time itself.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

/// Clock backed by the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}
