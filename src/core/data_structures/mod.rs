/*!
 * Data Structures
 *
 * Specialized data structures shared across the simulator:
 * - Inline strings for short process names
 */

mod inline_string;

pub use inline_string::InlineString;
