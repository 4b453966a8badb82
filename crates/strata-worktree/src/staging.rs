//! The staging index: the tree staged for the next commit.
//!
//! `STAGE_HEAD` sits between the working tree and history. `add` copies
//! the working-tree pointer into it; the commit operation reads it and
//! wraps it in a commit. Both moves are single-pointer repoints of
//! already-stored trees, so they cannot be observed half-done.

use std::sync::Arc;

use strata_diff::count_changes;
use strata_refs::{Ref, RefStore, STAGE_HEAD, WORK_HEAD};
use strata_store::{ObjectStore, RevTree};
use strata_types::ObjectId;
use tracing::debug;

use crate::error::WorktreeResult;
use crate::worktree::resolve_tree_ref;

/// Handle over the `STAGE_HEAD` pointer.
pub struct StagingArea {
    store: Arc<dyn ObjectStore>,
    refs: Arc<dyn RefStore>,
}

impl StagingArea {
    pub fn new(store: Arc<dyn ObjectStore>, refs: Arc<dyn RefStore>) -> Self {
        Self { store, refs }
    }

    /// Id of the currently staged tree.
    ///
    /// An unset `STAGE_HEAD` resolves to the empty tree.
    pub fn tree_id(&self) -> WorktreeResult<ObjectId> {
        resolve_tree_ref(self.store.as_ref(), self.refs.as_ref(), STAGE_HEAD)
    }

    /// The currently staged tree, loaded from the store.
    pub fn tree(&self) -> WorktreeResult<RevTree> {
        let id = self.tree_id()?;
        let stored = self.store.get(&id)?;
        Ok(RevTree::from_stored_object(&stored)?)
    }

    /// Stage everything: set `STAGE_HEAD := WORK_HEAD`.
    ///
    /// Returns the staged tree id.
    pub fn add(&self) -> WorktreeResult<ObjectId> {
        let work = resolve_tree_ref(self.store.as_ref(), self.refs.as_ref(), WORK_HEAD)?;
        self.refs.write_ref(
            STAGE_HEAD,
            &Ref::Transaction {
                name: STAGE_HEAD.into(),
                target: work,
            },
        )?;
        debug!(root = %work.short_hex(), "staged working tree");
        Ok(work)
    }

    /// Count of differences between the last committed tree and the
    /// staged tree.
    pub fn count_staged(&self, head_tree: &ObjectId) -> WorktreeResult<usize> {
        let stage = self.tree_id()?;
        Ok(count_changes(self.store.as_ref(), head_tree, &stage)?)
    }
}
