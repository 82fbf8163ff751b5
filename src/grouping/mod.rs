//! Group partitioning of filtered records
//!
//! Groups a view by a record field or a property:
//! - **fields**: one bucket per distinct field value
//! - **single-valued properties**: records without a value join the default
//!   value's bucket
//! - **multi-valued properties**: records without values form a null bucket and
//!   records with several values join each of their buckets
//!
//! Multi-valued groupings can be drilled into with a classifier path. Results are
//! memoized by [`GroupingEngine`] until it is invalidated.

pub mod engine;
pub mod types;

pub use engine::{GroupingEngine, GroupingKey, compute_groups};
pub use types::{Group, GroupSort, GroupSummary, GroupValue, GroupingSpec};
