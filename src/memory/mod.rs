/*!
 * Memory Module
 * Block table, placement strategies, compaction and statistics
 */

pub mod defrag;
pub mod placement;
pub mod stats;
pub mod table;
pub mod types;

// Re-export for convenience
pub use defrag::{DefragReport, DefragStrategy};
pub use placement::{BestFit, FirstFit, Placement, PlacementStrategy, WorstFit};
pub use table::BlockTable;
pub use types::*;
