//! Lazy traversal of revision trees.
//!
//! Both iterators load tree nodes from the store on demand and hold only
//! the frontier of the walk in memory, so collections of any size can be
//! streamed. The sequence is finite, single-pass, and restartable only by
//! re-resolving the source tree.
//!
//! Canonical order: direct entries by name, buckets by bucket index,
//! depth-first. The same tree always yields the same sequence.

use std::collections::VecDeque;

use strata_store::{EntryKind, ObjectStore, RevTree, TreeEntry};
use strata_types::ObjectId;

use crate::error::TreeResult;

enum Item {
    Entry(TreeEntry),
    Bucket(ObjectId),
}

fn items_of(tree: RevTree) -> VecDeque<Item> {
    if tree.is_bucketed() {
        tree.buckets.into_values().map(Item::Bucket).collect()
    } else {
        tree.entries.into_iter().map(Item::Entry).collect()
    }
}

fn load_tree(store: &dyn ObjectStore, id: &ObjectId) -> TreeResult<RevTree> {
    let stored = store.get(id)?;
    Ok(RevTree::from_stored_object(&stored)?)
}

/// Iterates the entries of a single tree level, expanding buckets.
///
/// Named subtrees are yielded as entries, not descended into — this is the
/// view the diff engine and the tree builder work with.
pub struct EntryIterator<'a> {
    store: &'a dyn ObjectStore,
    stack: Vec<VecDeque<Item>>,
    failed: bool,
}

impl<'a> EntryIterator<'a> {
    /// Iterate the given tree's entry set.
    pub fn over(store: &'a dyn ObjectStore, tree: RevTree) -> Self {
        Self {
            store,
            stack: vec![items_of(tree)],
            failed: false,
        }
    }

    /// Iterate the entry set of the tree stored under `id`.
    pub fn from_id(store: &'a dyn ObjectStore, id: &ObjectId) -> TreeResult<Self> {
        Ok(Self::over(store, load_tree(store, id)?))
    }
}

impl Iterator for EntryIterator<'_> {
    type Item = TreeResult<TreeEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let top = self.stack.last_mut()?;
            match top.pop_front() {
                None => {
                    self.stack.pop();
                }
                Some(Item::Entry(entry)) => return Some(Ok(entry)),
                Some(Item::Bucket(id)) => match load_tree(self.store, &id) {
                    Ok(child) => self.stack.push(items_of(child)),
                    Err(e) => {
                        self.failed = true;
                        return Some(Err(e));
                    }
                },
            }
        }
    }
}

struct Frame {
    prefix: String,
    items: VecDeque<Item>,
}

/// Depth-first stream of all feature entries under a tree, with paths.
///
/// Descends into named subtrees (joining path segments with `/`) and
/// through buckets; yields `(path, entry)` for feature entries only.
pub struct FeatureIterator<'a> {
    store: &'a dyn ObjectStore,
    stack: Vec<Frame>,
    failed: bool,
}

impl<'a> FeatureIterator<'a> {
    /// Stream every feature under the given tree.
    pub fn over(store: &'a dyn ObjectStore, tree: RevTree) -> Self {
        Self {
            store,
            stack: vec![Frame {
                prefix: String::new(),
                items: items_of(tree),
            }],
            failed: false,
        }
    }

    /// Stream every feature under the tree stored at `id`.
    pub fn from_id(store: &'a dyn ObjectStore, id: &ObjectId) -> TreeResult<Self> {
        Ok(Self::over(store, load_tree(store, id)?))
    }
}

impl Iterator for FeatureIterator<'_> {
    type Item = TreeResult<(String, TreeEntry)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let top = self.stack.last_mut()?;
            match top.items.pop_front() {
                None => {
                    self.stack.pop();
                }
                Some(Item::Entry(entry)) => match entry.kind {
                    EntryKind::Feature => {
                        let path = format!("{}{}", top.prefix, entry.name);
                        return Some(Ok((path, entry)));
                    }
                    EntryKind::Tree => {
                        let prefix = format!("{}{}/", top.prefix, entry.name);
                        match load_tree(self.store, &entry.target) {
                            Ok(child) => self.stack.push(Frame {
                                prefix,
                                items: items_of(child),
                            }),
                            Err(e) => {
                                self.failed = true;
                                return Some(Err(e));
                            }
                        }
                    }
                },
                Some(Item::Bucket(id)) => {
                    let prefix = top.prefix.clone();
                    match load_tree(self.store, &id) {
                        Ok(child) => self.stack.push(Frame {
                            prefix,
                            items: items_of(child),
                        }),
                        Err(e) => {
                            self.failed = true;
                            return Some(Err(e));
                        }
                    }
                }
            }
        }
    }
}
