//! Diff engine for Strata revision trees.
//!
//! Walks two trees in lock-step and produces one change record per
//! differing entry name. Subtrees with equal ids are skipped in O(1)
//! without touching the store, so the cost of a diff is proportional to
//! the number of changed leaves, not to collection size.

pub mod error;
pub mod tree_diff;

pub use error::{DiffError, DiffResult};
pub use tree_diff::{count_changes, diff_trees, ChangeKind, TreeChange, TreeDiff};
