//! Tree-level diff: compare two revision trees and produce a change set.
//!
//! Entries are aligned by name in canonical order. Named subtrees whose
//! ids differ on both sides are recursed into with a `/`-joined path
//! prefix; bucket pairs with equal ids are skipped without being read.

use std::collections::BTreeMap;

use strata_store::{EntryKind, ObjectStore, RevTree, TreeEntry};
use strata_tree::EntryIterator;
use strata_types::ObjectId;

use crate::error::DiffResult;

/// The result of comparing two trees.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeDiff {
    /// One record per changed entry name, in traversal order.
    pub changes: Vec<TreeChange>,
}

impl TreeDiff {
    /// Returns `true` if the trees are identical.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changes.
    pub fn len(&self) -> usize {
        self.changes.len()
    }
}

/// Which side(s) of the comparison an entry appears on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

/// A single change between two trees.
#[derive(Clone, Debug, PartialEq)]
pub enum TreeChange {
    /// The entry exists only on the right side.
    Added { path: String, new_id: ObjectId },
    /// The entry exists only on the left side.
    Removed { path: String, old_id: ObjectId },
    /// The entry exists on both sides with different ids.
    Modified {
        path: String,
        old_id: ObjectId,
        new_id: ObjectId,
    },
}

impl TreeChange {
    /// The path this change applies to.
    pub fn path(&self) -> &str {
        match self {
            TreeChange::Added { path, .. }
            | TreeChange::Removed { path, .. }
            | TreeChange::Modified { path, .. } => path,
        }
    }

    /// The kind of this change.
    pub fn kind(&self) -> ChangeKind {
        match self {
            TreeChange::Added { .. } => ChangeKind::Added,
            TreeChange::Removed { .. } => ChangeKind::Removed,
            TreeChange::Modified { .. } => ChangeKind::Modified,
        }
    }
}

/// Compare the trees stored under `left` and `right`.
///
/// Equal ids short-circuit to an empty diff without reading either node.
pub fn diff_trees(
    store: &dyn ObjectStore,
    left: &ObjectId,
    right: &ObjectId,
) -> DiffResult<TreeDiff> {
    let mut changes = Vec::new();
    diff_node(store, "", left, right, &mut changes)?;
    Ok(TreeDiff { changes })
}

/// Number of changed entries between two trees.
pub fn count_changes(
    store: &dyn ObjectStore,
    left: &ObjectId,
    right: &ObjectId,
) -> DiffResult<usize> {
    Ok(diff_trees(store, left, right)?.len())
}

fn load(store: &dyn ObjectStore, id: &ObjectId) -> DiffResult<RevTree> {
    let stored = store.get(id)?;
    Ok(RevTree::from_stored_object(&stored)?)
}

fn diff_node(
    store: &dyn ObjectStore,
    prefix: &str,
    left_id: &ObjectId,
    right_id: &ObjectId,
    out: &mut Vec<TreeChange>,
) -> DiffResult<()> {
    // The structural short-circuit: unchanged subtrees cost one comparison.
    if left_id == right_id {
        return Ok(());
    }
    let left = load(store, left_id)?;
    let right = load(store, right_id)?;

    match (left.is_bucketed(), right.is_bucketed()) {
        (false, false) => diff_direct(store, prefix, &left.entries, &right.entries, out),
        (true, true) => diff_buckets(store, prefix, &left, &right, out),
        (false, true) => diff_mixed(store, prefix, &left.entries, &right, false, out),
        (true, false) => diff_mixed(store, prefix, &right.entries, &left, true, out),
    }
}

/// Merge-join two sorted entry slices by name.
fn diff_direct(
    store: &dyn ObjectStore,
    prefix: &str,
    left: &[TreeEntry],
    right: &[TreeEntry],
    out: &mut Vec<TreeChange>,
) -> DiffResult<()> {
    let mut l = left.iter().peekable();
    let mut r = right.iter().peekable();

    loop {
        match (l.peek(), r.peek()) {
            (None, None) => return Ok(()),
            (Some(le), None) => {
                emit_one(prefix, le, ChangeKind::Removed, out);
                l.next();
            }
            (None, Some(re)) => {
                emit_one(prefix, re, ChangeKind::Added, out);
                r.next();
            }
            (Some(le), Some(re)) => match le.name.cmp(&re.name) {
                std::cmp::Ordering::Less => {
                    emit_one(prefix, le, ChangeKind::Removed, out);
                    l.next();
                }
                std::cmp::Ordering::Greater => {
                    emit_one(prefix, re, ChangeKind::Added, out);
                    r.next();
                }
                std::cmp::Ordering::Equal => {
                    diff_matched(store, prefix, le, re, out)?;
                    l.next();
                    r.next();
                }
            },
        }
    }
}

/// Same name on both sides: skip, recurse, or report a modification.
fn diff_matched(
    store: &dyn ObjectStore,
    prefix: &str,
    left: &TreeEntry,
    right: &TreeEntry,
    out: &mut Vec<TreeChange>,
) -> DiffResult<()> {
    if left.target == right.target {
        return Ok(());
    }
    if left.kind == EntryKind::Tree && right.kind == EntryKind::Tree {
        let child_prefix = format!("{prefix}{}/", left.name);
        return diff_node(store, &child_prefix, &left.target, &right.target, out);
    }
    out.push(TreeChange::Modified {
        path: format!("{prefix}{}", left.name),
        old_id: left.target,
        new_id: right.target,
    });
    Ok(())
}

/// Both sides bucketed: align buckets pairwise by index. The bucket hash is
/// a function of the name alone, so a name can only ever appear in the same
/// bucket on both sides.
fn diff_buckets(
    store: &dyn ObjectStore,
    prefix: &str,
    left: &RevTree,
    right: &RevTree,
    out: &mut Vec<TreeChange>,
) -> DiffResult<()> {
    let indices: std::collections::BTreeSet<u32> = left
        .buckets
        .keys()
        .chain(right.buckets.keys())
        .copied()
        .collect();

    for index in indices {
        match (left.buckets.get(&index), right.buckets.get(&index)) {
            (Some(l), Some(r)) => diff_node(store, prefix, l, r, out)?,
            (Some(l), None) => emit_subtree(store, prefix, l, ChangeKind::Removed, out)?,
            (None, Some(r)) => emit_subtree(store, prefix, r, ChangeKind::Added, out)?,
            (None, None) => unreachable!("index came from one of the maps"),
        }
    }
    Ok(())
}

/// One side direct, one bucketed. The direct side is bounded by the node
/// limit, so it is collected into a map and the bucketed side streamed
/// against it.
fn diff_mixed(
    store: &dyn ObjectStore,
    prefix: &str,
    direct: &[TreeEntry],
    bucketed: &RevTree,
    direct_is_right: bool,
    out: &mut Vec<TreeChange>,
) -> DiffResult<()> {
    let mut pending: BTreeMap<&str, &TreeEntry> =
        direct.iter().map(|e| (e.name.as_str(), e)).collect();

    for item in EntryIterator::over(store, bucketed.clone()) {
        let streamed = item?;
        match pending.remove(streamed.name.as_str()) {
            Some(matched) => {
                let (left, right) = if direct_is_right {
                    (&streamed, matched)
                } else {
                    (matched, &streamed)
                };
                diff_matched(store, prefix, left, right, out)?;
            }
            None => {
                // Present only on the bucketed side.
                let kind = if direct_is_right {
                    ChangeKind::Removed
                } else {
                    ChangeKind::Added
                };
                emit_one(prefix, &streamed, kind, out);
            }
        }
    }

    for entry in pending.values() {
        let kind = if direct_is_right {
            ChangeKind::Added
        } else {
            ChangeKind::Removed
        };
        emit_one(prefix, entry, kind, out);
    }
    Ok(())
}

/// Every entry under an unmatched bucket subtree is added or removed.
fn emit_subtree(
    store: &dyn ObjectStore,
    prefix: &str,
    id: &ObjectId,
    kind: ChangeKind,
    out: &mut Vec<TreeChange>,
) -> DiffResult<()> {
    for item in EntryIterator::from_id(store, id)? {
        emit_one(prefix, &item?, kind, out);
    }
    Ok(())
}

fn emit_one(prefix: &str, entry: &TreeEntry, kind: ChangeKind, out: &mut Vec<TreeChange>) {
    let path = format!("{prefix}{}", entry.name);
    out.push(match kind {
        ChangeKind::Added => TreeChange::Added {
            path,
            new_id: entry.target,
        },
        ChangeKind::Removed => TreeChange::Removed {
            path,
            old_id: entry.target,
        },
        ChangeKind::Modified => unreachable!("modifications are emitted in diff_matched"),
    });
}
