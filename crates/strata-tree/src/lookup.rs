//! Point lookups into revision trees.

use strata_store::{EntryKind, ObjectStore, RevTree, TreeEntry};

use crate::builder::bucket_index;
use crate::error::{TreeError, TreeResult};

/// Find a direct child entry by name, descending through buckets.
///
/// Cost is proportional to sharding depth, not collection size.
pub fn find_entry(
    store: &dyn ObjectStore,
    tree: &RevTree,
    name: &str,
) -> TreeResult<Option<TreeEntry>> {
    find_at_depth(store, tree, name, 0)
}

fn find_at_depth(
    store: &dyn ObjectStore,
    tree: &RevTree,
    name: &str,
    depth: u32,
) -> TreeResult<Option<TreeEntry>> {
    if !tree.is_bucketed() {
        return Ok(tree.get(name).cloned());
    }
    let index = bucket_index(name, depth);
    let Some(child_id) = tree.buckets.get(&index) else {
        return Ok(None);
    };
    let stored = store.get(child_id)?;
    let child = RevTree::from_stored_object(&stored)?;
    find_at_depth(store, &child, name, depth + 1)
}

/// Resolve a slash-separated path (e.g. `"way/101"`) from a root tree,
/// descending named subtrees segment by segment.
pub fn find_path(
    store: &dyn ObjectStore,
    root: &RevTree,
    path: &str,
) -> TreeResult<Option<TreeEntry>> {
    let mut current = root.clone();
    let mut segments = path.split('/').filter(|s| !s.is_empty()).peekable();

    while let Some(segment) = segments.next() {
        let Some(entry) = find_entry(store, &current, segment)? else {
            return Ok(None);
        };
        if segments.peek().is_none() {
            return Ok(Some(entry));
        }
        if entry.kind != EntryKind::Tree {
            // A feature cannot have children.
            return Ok(None);
        }
        let stored = store.get(&entry.target)?;
        current = RevTree::from_stored_object(&stored)
            .map_err(|_| TreeError::NotATree(entry.target))?;
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{TreeBuilder, NODE_LIMIT};
    use strata_store::InMemoryObjectStore;
    use strata_types::ObjectId;

    fn oid(n: u64) -> ObjectId {
        ObjectId::hash_of(&n.to_be_bytes())
    }

    #[test]
    fn find_in_direct_tree() {
        let store = InMemoryObjectStore::new();
        let mut builder = TreeBuilder::new(&store);
        builder.put(TreeEntry::feature("a", oid(1))).unwrap();
        builder.put(TreeEntry::feature("b", oid(2))).unwrap();
        let (_, tree) = builder.build().unwrap();

        assert_eq!(find_entry(&store, &tree, "b").unwrap().unwrap().target, oid(2));
        assert!(find_entry(&store, &tree, "c").unwrap().is_none());
    }

    #[test]
    fn find_descends_buckets() {
        let store = InMemoryObjectStore::new();
        let count = NODE_LIMIT as u64 * 2;
        let mut builder = TreeBuilder::new(&store);
        for i in 0..count {
            builder.put(TreeEntry::feature(format!("f{i}"), oid(i))).unwrap();
        }
        let (_, tree) = builder.build().unwrap();
        assert!(tree.is_bucketed());

        for probe in [0, 1, count / 2, count - 1] {
            let found = find_entry(&store, &tree, &format!("f{probe}"))
                .unwrap()
                .unwrap();
            assert_eq!(found.target, oid(probe));
        }
        assert!(find_entry(&store, &tree, "f-nope").unwrap().is_none());
    }

    #[test]
    fn find_path_descends_named_subtrees() {
        let store = InMemoryObjectStore::new();

        let mut ways = TreeBuilder::new(&store);
        ways.put(TreeEntry::feature("101", oid(5))).unwrap();
        let (ways_id, _) = ways.build().unwrap();

        let mut root = TreeBuilder::new(&store);
        root.put(TreeEntry::subtree("way", ways_id)).unwrap();
        let (_, root_tree) = root.build().unwrap();

        let hit = find_path(&store, &root_tree, "way/101").unwrap().unwrap();
        assert_eq!(hit.target, oid(5));
        assert_eq!(hit.kind, EntryKind::Feature);

        let subtree = find_path(&store, &root_tree, "way").unwrap().unwrap();
        assert_eq!(subtree.kind, EntryKind::Tree);

        assert!(find_path(&store, &root_tree, "way/999").unwrap().is_none());
        assert!(find_path(&store, &root_tree, "way/101/deeper").unwrap().is_none());
        assert!(find_path(&store, &root_tree, "").unwrap().is_none());
    }
}
