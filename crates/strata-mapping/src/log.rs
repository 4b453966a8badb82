//! The mapping log: provenance records for derived trees.
//!
//! Each successful mapping commit appends one entry linking the source
//! working tree, the resulting mapped tree, and the mapping definition.
//! Before re-running a mapping, the latest entry is consulted: if the
//! current working tree is still the entry's mapped tree, nothing has
//! changed since the last run and re-mapping is skipped.

use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use strata_types::ObjectId;

use crate::error::MappingResult;

/// One provenance record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingLogEntry {
    /// Working tree the mapping read from.
    pub source_tree: ObjectId,
    /// Working tree after the mapping's writes were committed.
    pub mapped_tree: ObjectId,
    /// Id of the mapping definition that was applied.
    pub mapping: ObjectId,
}

/// Storage contract for the mapping log.
///
/// Append-only; durability is a backend concern, like refs.
pub trait MappingLog: Send + Sync {
    /// Append an entry. Called only after a successful mapping commit.
    fn append(&self, entry: MappingLogEntry) -> MappingResult<()>;

    /// The most recent entry for a mapping definition, if any.
    fn latest_for(&self, mapping: &ObjectId) -> MappingResult<Option<MappingLogEntry>>;

    /// All entries for a mapping definition, oldest first.
    fn entries_for(&self, mapping: &ObjectId) -> MappingResult<Vec<MappingLogEntry>>;
}

/// In-memory implementation of [`MappingLog`].
#[derive(Debug, Default)]
pub struct InMemoryMappingLog {
    entries: RwLock<Vec<MappingLogEntry>>,
}

impl InMemoryMappingLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entries across all mappings.
    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    /// Returns `true` if no entries have been appended.
    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("lock poisoned").is_empty()
    }
}

impl MappingLog for InMemoryMappingLog {
    fn append(&self, entry: MappingLogEntry) -> MappingResult<()> {
        self.entries.write().expect("lock poisoned").push(entry);
        Ok(())
    }

    fn latest_for(&self, mapping: &ObjectId) -> MappingResult<Option<MappingLogEntry>> {
        let entries = self.entries.read().expect("lock poisoned");
        Ok(entries
            .iter()
            .rev()
            .find(|e| e.mapping == *mapping)
            .copied())
    }

    fn entries_for(&self, mapping: &ObjectId) -> MappingResult<Vec<MappingLogEntry>> {
        let entries = self.entries.read().expect("lock poisoned");
        Ok(entries
            .iter()
            .filter(|e| e.mapping == *mapping)
            .copied()
            .collect())
    }
}
