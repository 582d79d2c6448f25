/*!
 * Process Module
 * Process records, lifecycle state machine and registry
 */

pub mod lifecycle;
pub mod registry;
pub mod types;
pub mod validation;

// Re-export for convenience
pub use registry::ProcessRegistry;
pub use types::*;
