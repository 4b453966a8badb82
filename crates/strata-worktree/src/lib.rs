//! Working-tree and staging-index management for Strata.
//!
//! Mutation in a Strata repository flows through two named pointers:
//! `WORK_HEAD` (the live editable tree) and `STAGE_HEAD` (the tree staged
//! for the next commit). Both point at immutable revision trees — every
//! edit builds a new tree bottom-up and repoints, so a failure partway
//! never leaves either pointer on an incomplete tree, and readers always
//! see a fully-written state.

pub mod error;
pub mod staging;
pub mod worktree;

pub use error::{WorktreeError, WorktreeResult};
pub use staging::StagingArea;
pub use worktree::WorkingTree;
