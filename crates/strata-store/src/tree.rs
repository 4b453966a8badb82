//! Revision-tree nodes.
//!
//! A [`RevTree`] node holds either *direct* entries (a sorted name →
//! object mapping) or *buckets* (a sparse index → child-tree mapping),
//! never both. Large collections fan out into buckets; the builder in
//! `strata-tree` owns that policy. Canonical ordering — entries by name,
//! buckets by index — is enforced before serialization so identical entry
//! sets always hash to identical ids regardless of insertion order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strata_types::{Extent, ObjectId};

use crate::error::{StoreError, StoreResult};
use crate::object::{decode_payload, encode_payload, ObjectKind, StoredObject};

/// What a tree entry points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// A feature object.
    Feature,
    /// A child revision tree (named subtree).
    Tree,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Feature => write!(f, "feature"),
            Self::Tree => write!(f, "tree"),
        }
    }
}

/// A single named entry in a direct tree node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Entry name, unique within the node.
    pub name: String,
    /// Content-addressed id of the referenced object.
    pub target: ObjectId,
    /// Whether the target is a feature or a subtree.
    pub kind: EntryKind,
    /// Bounding extent of the referenced object, when known.
    pub extent: Option<Extent>,
    /// Id of the feature's schema, for feature entries.
    pub feature_type: Option<ObjectId>,
}

impl TreeEntry {
    /// Entry pointing at a feature.
    pub fn feature(name: impl Into<String>, target: ObjectId) -> Self {
        Self {
            name: name.into(),
            target,
            kind: EntryKind::Feature,
            extent: None,
            feature_type: None,
        }
    }

    /// Entry pointing at a subtree.
    pub fn subtree(name: impl Into<String>, target: ObjectId) -> Self {
        Self {
            name: name.into(),
            target,
            kind: EntryKind::Tree,
            extent: None,
            feature_type: None,
        }
    }

    /// Attach a bounding extent.
    pub fn with_extent(mut self, extent: Extent) -> Self {
        self.extent = Some(extent);
        self
    }

    /// Attach the feature's schema id.
    pub fn with_feature_type(mut self, id: ObjectId) -> Self {
        self.feature_type = Some(id);
        self
    }
}

impl PartialOrd for TreeEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.name.cmp(&other.name))
    }
}

/// A revision-tree node.
///
/// `size` caches the total number of features reachable from this node so
/// collection counts never require traversal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevTree {
    /// Total features in this subtree (direct and through buckets).
    pub size: u64,
    /// Direct entries, sorted by name. Empty when the node is bucketed.
    pub entries: Vec<TreeEntry>,
    /// Sparse bucket-index → child-tree mapping. Empty when direct.
    pub buckets: BTreeMap<u32, ObjectId>,
}

impl RevTree {
    /// The empty tree.
    pub fn empty() -> Self {
        Self {
            size: 0,
            entries: Vec::new(),
            buckets: BTreeMap::new(),
        }
    }

    /// A direct node from entries (sorted here) and a computed size.
    pub fn direct(mut entries: Vec<TreeEntry>, size: u64) -> Self {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            size,
            entries,
            buckets: BTreeMap::new(),
        }
    }

    /// A bucketed node from a sparse bucket map and a computed size.
    pub fn bucketed(buckets: BTreeMap<u32, ObjectId>, size: u64) -> Self {
        Self {
            size,
            entries: Vec::new(),
            buckets,
        }
    }

    /// Returns `true` if this node fans out into buckets.
    pub fn is_bucketed(&self) -> bool {
        !self.buckets.is_empty()
    }

    /// Returns `true` if the tree holds no features at all.
    pub fn is_empty(&self) -> bool {
        self.size == 0 && self.entries.is_empty() && self.buckets.is_empty()
    }

    /// Look up a direct entry by name. Bucketed nodes always return `None`;
    /// descend through the bucket for the name instead.
    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.entries
            .binary_search_by(|e| e.name.as_str().cmp(name))
            .ok()
            .map(|i| &self.entries[i])
    }

    /// Number of direct entries in this node.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoreResult<StoredObject> {
        encode_payload(ObjectKind::Tree, self)
    }

    /// Decode from a `StoredObject`, checking kind and node-shape invariants.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        let tree: RevTree = decode_payload(ObjectKind::Tree, obj)?;
        if !tree.entries.is_empty() && !tree.buckets.is_empty() {
            return Err(StoreError::CorruptObject {
                id: obj.compute_id(),
                reason: "tree node has both direct entries and buckets".to_string(),
            });
        }
        Ok(tree)
    }

    /// The content-addressed id of this node.
    pub fn id(&self) -> StoreResult<ObjectId> {
        Ok(self.to_stored_object()?.compute_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(b: u8) -> ObjectId {
        ObjectId::from_raw([b; 32])
    }

    #[test]
    fn direct_entries_are_sorted() {
        let tree = RevTree::direct(
            vec![
                TreeEntry::feature("zebra", oid(1)),
                TreeEntry::feature("alpha", oid(2)),
                TreeEntry::subtree("middle", oid(3)),
            ],
            2,
        );
        let names: Vec<_> = tree.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["alpha", "middle", "zebra"]);
    }

    #[test]
    fn id_is_insertion_order_independent() {
        let a = RevTree::direct(
            vec![
                TreeEntry::feature("a", oid(1)),
                TreeEntry::feature("b", oid(2)),
            ],
            2,
        );
        let b = RevTree::direct(
            vec![
                TreeEntry::feature("b", oid(2)),
                TreeEntry::feature("a", oid(1)),
            ],
            2,
        );
        assert_eq!(a.id().unwrap(), b.id().unwrap());
    }

    #[test]
    fn roundtrip_direct() {
        let tree = RevTree::direct(
            vec![TreeEntry::feature("way/8", oid(9)).with_feature_type(oid(7))],
            1,
        );
        let stored = tree.to_stored_object().unwrap();
        let decoded = RevTree::from_stored_object(&stored).unwrap();
        assert_eq!(tree, decoded);
    }

    #[test]
    fn roundtrip_bucketed() {
        let mut buckets = BTreeMap::new();
        buckets.insert(0, oid(1));
        buckets.insert(17, oid(2));
        let tree = RevTree::bucketed(buckets, 1000);
        let stored = tree.to_stored_object().unwrap();
        let decoded = RevTree::from_stored_object(&stored).unwrap();
        assert!(decoded.is_bucketed());
        assert_eq!(decoded.size, 1000);
        assert_eq!(tree.id().unwrap(), decoded.id().unwrap());
    }

    #[test]
    fn mixed_shape_rejected_on_decode() {
        let mut buckets = BTreeMap::new();
        buckets.insert(3, oid(1));
        let bad = RevTree {
            size: 2,
            entries: vec![TreeEntry::feature("x", oid(2))],
            buckets,
        };
        let stored = bad.to_stored_object().unwrap();
        let err = RevTree::from_stored_object(&stored).unwrap_err();
        assert!(matches!(err, StoreError::CorruptObject { .. }));
    }

    #[test]
    fn get_uses_binary_search_over_sorted_names() {
        let tree = RevTree::direct(
            (0..50)
                .map(|i| TreeEntry::feature(format!("node/{i:03}"), oid(i as u8)))
                .collect(),
            50,
        );
        assert!(tree.get("node/027").is_some());
        assert!(tree.get("node/050").is_none());
    }

    #[test]
    fn empty_tree_has_stable_id() {
        assert_eq!(RevTree::empty().id().unwrap(), RevTree::empty().id().unwrap());
        assert!(RevTree::empty().is_empty());
    }
}
