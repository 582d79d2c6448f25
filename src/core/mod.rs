/*!
 * Core Module
 * Fundamental simulator types and error handling
 */

pub mod data_structures;
pub mod errors;
pub mod limits;
pub mod serde;
pub mod types;

// Re-export for convenience
pub use errors::*;
pub use types::*;
