//! Bottom-up revision-tree construction.
//!
//! [`TreeBuilder`] accumulates a name → entry mapping (last write wins) and
//! materializes it as a minimal tree: a single direct node while the entry
//! count stays at or below [`NODE_LIMIT`], hash-selected buckets beyond it.
//! Every node is written to the object store before the root id is
//! returned, so a failure partway through never leaves a reference pointing
//! at a missing node — callers repoint refs only after `build` succeeds.
//!
//! The resulting shape is a pure function of the entry set: rebuilding the
//! same entries from any starting point, in any order, yields byte-identical
//! nodes, and shrinking a bucketed tree back to or below the threshold
//! collapses it to a direct node.

use std::collections::BTreeMap;

use strata_store::{EntryKind, ObjectStore, RevTree, TreeEntry};
use strata_types::ObjectId;
use tracing::debug;

use crate::error::{TreeError, TreeResult};
use crate::iter::EntryIterator;

/// Maximum direct entries in a node before it fans out into buckets.
///
/// Compatibility parameter: changing this changes every ObjectId derived
/// from a tree past the threshold.
pub const NODE_LIMIT: usize = 512;

/// Number of hash buckets a node fans out into.
///
/// Compatibility parameter, like [`NODE_LIMIT`].
pub const BUCKET_COUNT: u32 = 32;

/// Bucket index for an entry name at the given sharding depth.
///
/// The depth is mixed into the hash so entries that collide into one
/// bucket redistribute when that bucket shards again.
pub fn bucket_index(name: &str, depth: u32) -> u32 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&depth.to_be_bytes());
    hasher.update(name.as_bytes());
    let digest = hasher.finalize();
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest.as_bytes()[..8]);
    (u64::from_be_bytes(prefix) % BUCKET_COUNT as u64) as u32
}

/// Accumulates entries and builds a canonical revision tree bottom-up.
pub struct TreeBuilder<'a> {
    store: &'a dyn ObjectStore,
    entries: BTreeMap<String, TreeEntry>,
}

impl<'a> TreeBuilder<'a> {
    /// Start from an empty entry set.
    pub fn new(store: &'a dyn ObjectStore) -> Self {
        Self {
            store,
            entries: BTreeMap::new(),
        }
    }

    /// Start from the entry set of an existing tree.
    ///
    /// Bucket structure is dissolved; named subtrees are kept as single
    /// entries, not expanded.
    pub fn from_tree(store: &'a dyn ObjectStore, tree: &RevTree) -> TreeResult<Self> {
        let mut entries = BTreeMap::new();
        for item in EntryIterator::over(store, tree.clone()) {
            let entry = item?;
            entries.insert(entry.name.clone(), entry);
        }
        Ok(Self { store, entries })
    }

    /// Stage an entry. A later put for the same name wins.
    pub fn put(&mut self, entry: TreeEntry) -> TreeResult<()> {
        if entry.name.is_empty() || entry.name.contains('/') {
            return Err(TreeError::InvalidEntryName(entry.name));
        }
        self.entries.insert(entry.name.clone(), entry);
        Ok(())
    }

    /// Remove an entry by name. Returns `true` if it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    /// Number of staged entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no entries are staged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the tree, writing every node to the store.
    ///
    /// Returns the root node and its id. Unchanged subtrees hash to their
    /// existing ids, so rewriting them is a no-op in the store.
    pub fn build(self) -> TreeResult<(ObjectId, RevTree)> {
        let entries: Vec<TreeEntry> = self.entries.into_values().collect();
        let count = entries.len();
        let tree = build_node(self.store, entries, 0)?;
        let id = self.store.write(&tree.to_stored_object()?)?;
        debug!(root = %id.short_hex(), entries = count, size = tree.size, "tree built");
        Ok((id, tree))
    }
}

fn build_node(
    store: &dyn ObjectStore,
    entries: Vec<TreeEntry>,
    depth: u32,
) -> TreeResult<RevTree> {
    if entries.len() <= NODE_LIMIT {
        let size = direct_size(store, &entries)?;
        return Ok(RevTree::direct(entries, size));
    }

    let mut partitions: BTreeMap<u32, Vec<TreeEntry>> = BTreeMap::new();
    for entry in entries {
        partitions
            .entry(bucket_index(&entry.name, depth))
            .or_default()
            .push(entry);
    }

    let mut buckets = BTreeMap::new();
    let mut size = 0u64;
    for (index, bucket_entries) in partitions {
        let child = build_node(store, bucket_entries, depth + 1)?;
        size += child.size;
        let child_id = store.write(&child.to_stored_object()?)?;
        buckets.insert(index, child_id);
    }
    Ok(RevTree::bucketed(buckets, size))
}

/// Feature count for a direct node: one per feature entry, plus the cached
/// size of each named subtree.
fn direct_size(store: &dyn ObjectStore, entries: &[TreeEntry]) -> TreeResult<u64> {
    let mut size = 0u64;
    for entry in entries {
        match entry.kind {
            EntryKind::Feature => size += 1,
            EntryKind::Tree => {
                let stored = store.get(&entry.target)?;
                let child = RevTree::from_stored_object(&stored)?;
                size += child.size;
            }
        }
    }
    Ok(size)
}
