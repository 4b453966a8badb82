//! Batched writes of mapped features into the working tree.
//!
//! Mapped features are grouped by destination path and held in memory
//! until a flush threshold is reached, then written out as partial tree
//! builds. This bounds memory during mappings over arbitrarily large
//! source collections while keeping tree rebuilds coarse-grained.

use std::collections::BTreeMap;

use strata_worktree::WorkingTree;
use tracing::debug;

use crate::error::MappingResult;
use crate::mapping::MappedFeature;

/// Buffered entries across all destination paths before a forced flush.
pub const FLUSH_LIMIT: usize = 10_000;

/// Accumulates mapped features per destination path and flushes them in
/// batches through [`WorkingTree::insert_features`].
pub struct FeatureFlusher<'a> {
    work: &'a WorkingTree,
    buffers: BTreeMap<String, Vec<(String, strata_store::Feature)>>,
    buffered: usize,
    limit: usize,
}

impl<'a> FeatureFlusher<'a> {
    pub fn new(work: &'a WorkingTree) -> Self {
        Self::with_limit(work, FLUSH_LIMIT)
    }

    /// A flusher with a custom threshold (used by tests).
    pub fn with_limit(work: &'a WorkingTree, limit: usize) -> Self {
        Self {
            work,
            buffers: BTreeMap::new(),
            buffered: 0,
            limit: limit.max(1),
        }
    }

    /// Number of entries currently buffered.
    pub fn buffered(&self) -> usize {
        self.buffered
    }

    /// Buffer one mapped feature, flushing if the threshold is reached.
    pub fn put(&mut self, mapped: MappedFeature) -> MappingResult<()> {
        self.buffers
            .entry(mapped.path)
            .or_default()
            .push((mapped.name, mapped.feature));
        self.buffered += 1;
        if self.buffered >= self.limit {
            self.flush_all()?;
        }
        Ok(())
    }

    /// Write out every buffered entry, one tree rebuild per destination.
    pub fn flush_all(&mut self) -> MappingResult<()> {
        if self.buffered == 0 {
            return Ok(());
        }
        let buffers = std::mem::take(&mut self.buffers);
        for (path, batch) in buffers {
            debug!(path, count = batch.len(), "flushing mapped features");
            self.work.insert_features(&path, batch)?;
        }
        self.buffered = 0;
        Ok(())
    }
}
