//! The working tree: the live, editable view of the repository.
//!
//! "Editable" is indirect: inserts and deletes build new tree nodes
//! bottom-up, write them to the object store, and repoint `WORK_HEAD` at
//! the new root as the very last step.

use std::sync::Arc;

use strata_diff::count_changes;
use strata_refs::{Ref, RefStore, STAGE_HEAD, WORK_HEAD};
use strata_store::{Feature, ObjectKind, ObjectStore, RevTree, TreeEntry};
use strata_tree::{find_path, TreeBuilder, TreeResult};
use strata_types::ObjectId;
use tracing::debug;

use crate::error::{WorktreeError, WorktreeResult};

/// Handle over the `WORK_HEAD` pointer.
pub struct WorkingTree {
    store: Arc<dyn ObjectStore>,
    refs: Arc<dyn RefStore>,
}

impl WorkingTree {
    pub fn new(store: Arc<dyn ObjectStore>, refs: Arc<dyn RefStore>) -> Self {
        Self { store, refs }
    }

    /// Id of the current working tree.
    ///
    /// An unset `WORK_HEAD` resolves to the empty tree, which is written
    /// to the store so the id always resolves.
    pub fn tree_id(&self) -> WorktreeResult<ObjectId> {
        resolve_tree_ref(self.store.as_ref(), self.refs.as_ref(), WORK_HEAD)
    }

    /// The current working tree, loaded from the store.
    pub fn tree(&self) -> WorktreeResult<RevTree> {
        let id = self.tree_id()?;
        let stored = self.store.get(&id)?;
        Ok(RevTree::from_stored_object(&stored)?)
    }

    /// Repoint `WORK_HEAD` at a new root tree.
    ///
    /// This is how imports and mappings publish data: they build the new
    /// tree first and repoint only once every node is safely stored.
    pub fn update_work_tree(&self, new_root: ObjectId) -> WorktreeResult<()> {
        let stored = self.store.get(&new_root)?;
        if stored.kind != ObjectKind::Tree {
            return Err(WorktreeError::NotATree(new_root));
        }
        self.refs.write_ref(
            WORK_HEAD,
            &Ref::Transaction {
                name: WORK_HEAD.into(),
                target: new_root,
            },
        )?;
        debug!(root = %new_root.short_hex(), "working tree updated");
        Ok(())
    }

    /// Insert (or replace) features under a subtree path.
    ///
    /// Feature objects are written to the store; each gets an entry named
    /// by its feature id string, carrying its extent and schema reference.
    /// Returns the new root tree id.
    pub fn insert_features<I>(&self, path: &str, features: I) -> WorktreeResult<ObjectId>
    where
        I: IntoIterator<Item = (String, Feature)>,
    {
        let mut staged = Vec::new();
        for (name, feature) in features {
            let stored = feature.to_stored_object()?;
            let feature_id = self.store.write(&stored)?;
            let mut entry = TreeEntry::feature(name, feature_id)
                .with_feature_type(feature.feature_type);
            if let Some(extent) = feature.extent() {
                entry = entry.with_extent(extent);
            }
            staged.push(entry);
        }
        self.edit_subtree(path, |builder| {
            for entry in staged.drain(..) {
                builder.put(entry)?;
            }
            Ok(())
        })
    }

    /// Remove one feature by name from a subtree path.
    ///
    /// Returns the new root tree id, or `None` if the feature was absent
    /// (in which case `WORK_HEAD` is left untouched).
    pub fn delete_feature(&self, path: &str, name: &str) -> WorktreeResult<Option<ObjectId>> {
        let root = self.tree()?;
        let full_path = if path.is_empty() {
            name.to_string()
        } else {
            format!("{path}/{name}")
        };
        if find_path(self.store.as_ref(), &root, &full_path)?.is_none() {
            return Ok(None);
        }
        let new_root = self.edit_subtree(path, |builder| {
            builder.remove(name);
            Ok(())
        })?;
        Ok(Some(new_root))
    }

    /// Count of differences between the staged tree and the working tree.
    pub fn count_unstaged(&self) -> WorktreeResult<usize> {
        let stage = resolve_tree_ref(self.store.as_ref(), self.refs.as_ref(), STAGE_HEAD)?;
        let work = self.tree_id()?;
        Ok(count_changes(self.store.as_ref(), &stage, &work)?)
    }

    /// Apply an edit to the subtree at `path` (top-level when empty),
    /// rebuild every node up to the root, and repoint `WORK_HEAD`.
    fn edit_subtree<F>(&self, path: &str, edit: F) -> WorktreeResult<ObjectId>
    where
        F: FnOnce(&mut TreeBuilder<'_>) -> TreeResult<()>,
    {
        let root = self.tree()?;
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let (new_root, _) = rebuild_along(self.store.as_ref(), &root, &segments, edit)?;
        self.update_work_tree(new_root)?;
        Ok(new_root)
    }
}

/// Rebuild the chain of trees along `segments`, applying `edit` to the
/// deepest one. Missing intermediate subtrees are created; ones that end
/// up empty are dropped from their parent.
fn rebuild_along<F>(
    store: &dyn ObjectStore,
    node: &RevTree,
    segments: &[&str],
    edit: F,
) -> WorktreeResult<(ObjectId, RevTree)>
where
    F: FnOnce(&mut TreeBuilder<'_>) -> TreeResult<()>,
{
    if segments.is_empty() {
        let mut builder = TreeBuilder::from_tree(store, node)?;
        edit(&mut builder)?;
        return Ok(builder.build()?);
    }

    let name = segments[0];
    let child = match find_child(store, node, name)? {
        Some(tree) => tree,
        None => RevTree::empty(),
    };
    let (child_id, child_tree) = rebuild_along(store, &child, &segments[1..], edit)?;

    let mut builder = TreeBuilder::from_tree(store, node)?;
    if child_tree.is_empty() {
        builder.remove(name);
    } else {
        builder.put(TreeEntry::subtree(name, child_id))?;
    }
    Ok(builder.build()?)
}

fn find_child(
    store: &dyn ObjectStore,
    node: &RevTree,
    name: &str,
) -> WorktreeResult<Option<RevTree>> {
    use strata_store::EntryKind;
    use strata_tree::find_entry;

    match find_entry(store, node, name)? {
        None => Ok(None),
        Some(entry) if entry.kind == EntryKind::Tree => {
            let stored = store.get(&entry.target)?;
            Ok(Some(RevTree::from_stored_object(&stored)?))
        }
        Some(entry) => Err(WorktreeError::PathThroughFeature(entry.name)),
    }
}

/// Resolve a transaction ref to a tree id, defaulting to the (stored)
/// empty tree when the ref is unset.
pub(crate) fn resolve_tree_ref(
    store: &dyn ObjectStore,
    refs: &dyn RefStore,
    name: &str,
) -> WorktreeResult<ObjectId> {
    match refs.read_ref(name)? {
        Some(reference) => Ok(reference.target()),
        None => {
            let id = store.write(&RevTree::empty().to_stored_object()?)?;
            Ok(id)
        }
    }
}
