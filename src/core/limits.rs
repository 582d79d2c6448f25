/*!
 * Simulator Limits and Constants
 *
 * Centralized location for ranges, defaults and environment variable names.
 */

use super::types::{Kb, Priority};

// =============================================================================
// PROCESS LIMITS
// =============================================================================

/// Lowest accepted process priority
pub const MIN_PRIORITY: Priority = 1;

/// Highest accepted process priority
/// Aging never raises a priority past this value
pub const MAX_PRIORITY: Priority = 10;

/// Priority increment applied per aging pass
pub const DEFAULT_AGING_STEP: Priority = 1;

// =============================================================================
// MEMORY LIMITS
// =============================================================================

/// Default block capacities (KB), in table order
pub const DEFAULT_BLOCK_CAPACITIES: [Kb; 6] = [50, 30, 100, 20, 70, 10];

/// Usage ratio at which pressure is reported as Medium
pub const PRESSURE_MEDIUM_RATIO: f64 = 0.60;

/// Usage ratio at which pressure is reported as High
pub const PRESSURE_HIGH_RATIO: f64 = 0.80;

/// Usage ratio at which pressure is reported as Critical
pub const PRESSURE_CRITICAL_RATIO: f64 = 0.95;

// =============================================================================
// ENVIRONMENT
// =============================================================================

pub const ENV_BLOCKS: &str = "PARTSIM_BLOCKS";
pub const ENV_SORT_DESC: &str = "PARTSIM_SORT_DESC";
pub const ENV_COMMIT: &str = "PARTSIM_COMMIT";
pub const ENV_PLACEMENT: &str = "PARTSIM_PLACEMENT";
pub const ENV_DEFRAG: &str = "PARTSIM_DEFRAG";
pub const ENV_STATE_PATH: &str = "PARTSIM_STATE_PATH";
pub const ENV_TRACE_JSON: &str = "PARTSIM_TRACE_JSON";
