/*!
 * Request Validation
 * Input checks applied by the engine to every request, plus parsers for raw text input
 */

use super::types::{LifecycleError, LifecycleResult};
use crate::core::data_structures::InlineString;
use crate::core::limits::{MAX_PRIORITY, MIN_PRIORITY};
use crate::core::types::{Kb, Priority};
use crate::memory::types::{AllocationError, AllocationResult};

/// Reject zero-sized requests
pub fn validate_size(size: Kb) -> AllocationResult<Kb> {
    if size == 0 {
        return Err(AllocationError::InvalidSize(size.to_string()));
    }
    Ok(size)
}

/// Reject priorities outside `[MIN_PRIORITY, MAX_PRIORITY]`
pub fn validate_priority(priority: Priority) -> AllocationResult<Priority> {
    if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&priority) {
        return Err(AllocationError::InvalidPriority(priority.to_string()));
    }
    Ok(priority)
}

/// Trim a new process name, rejecting blank names
pub fn validate_name(name: &str) -> LifecycleResult<InlineString> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LifecycleError::InvalidName(
            "Name cannot be empty".to_string(),
        ));
    }
    Ok(InlineString::from(trimmed))
}

/// Parse a size typed by a user
pub fn parse_size(raw: &str) -> AllocationResult<Kb> {
    let trimmed = raw.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| AllocationError::InvalidSize(trimmed.to_string()))?;
    if value <= 0 {
        return Err(AllocationError::InvalidSize(trimmed.to_string()));
    }
    Ok(value as Kb)
}

/// Parse a whitespace-separated list of sizes; every entry must be valid
pub fn parse_sizes(raw: &str) -> AllocationResult<Vec<Kb>> {
    let sizes = raw
        .split_whitespace()
        .map(parse_size)
        .collect::<AllocationResult<Vec<_>>>()?;
    if sizes.is_empty() {
        return Err(AllocationError::InvalidSize(raw.trim().to_string()));
    }
    Ok(sizes)
}

/// Parse a priority typed by a user
pub fn parse_priority(raw: &str) -> AllocationResult<Priority> {
    let trimmed = raw.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| AllocationError::InvalidPriority(trimmed.to_string()))?;
    let priority = Priority::try_from(value)
        .map_err(|_| AllocationError::InvalidPriority(trimmed.to_string()))?;
    validate_priority(priority)
}
