//! History traversal.

use strata_store::{Commit, ObjectStore};
use strata_types::ObjectId;

use crate::error::RepoResult;

/// Walks commits from a starting point, following first parents.
///
/// Yields `(commit_id, commit)` pairs newest-first. Merge side branches
/// are not descended into; callers wanting full ancestry can walk each
/// parent explicitly.
pub struct HistoryWalk<'a> {
    store: &'a dyn ObjectStore,
    next: Option<ObjectId>,
    failed: bool,
}

impl<'a> HistoryWalk<'a> {
    pub fn new(store: &'a dyn ObjectStore, start: Option<ObjectId>) -> Self {
        Self {
            store,
            next: start,
            failed: false,
        }
    }
}

impl Iterator for HistoryWalk<'_> {
    type Item = RepoResult<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let id = self.next.take()?;
        let commit = match self
            .store
            .get(&id)
            .map_err(Into::into)
            .and_then(|stored| Commit::from_stored_object(&stored).map_err(Into::into))
        {
            Ok(commit) => commit,
            Err(e) => {
                self.failed = true;
                return Some(Err(e));
            }
        };
        self.next = commit.first_parent();
        Some(Ok((id, commit)))
    }
}
