//! The repository session object.

use std::sync::Arc;

use chrono::Utc;
use strata_diff::{diff_trees, TreeDiff};
use strata_refs::{Head, InMemoryRefStore, Ref, RefStore, STAGE_HEAD, WORK_HEAD};
use strata_store::{Commit, InMemoryObjectStore, ObjectStore, RevTree, Tag};
use strata_types::ObjectId;
use strata_worktree::{StagingArea, WorkingTree};
use tracing::info;

use crate::error::{RepoError, RepoResult};
use crate::history::HistoryWalk;

/// The default branch created at init.
pub const DEFAULT_BRANCH: &str = "main";

/// A live repository session over injected storage backends.
pub struct Repository {
    store: Arc<dyn ObjectStore>,
    refs: Arc<dyn RefStore>,
    work: WorkingTree,
    stage: StagingArea,
}

impl Repository {
    /// Initialize an ephemeral repository over in-memory backends.
    pub fn init() -> RepoResult<Self> {
        Self::with_backends(
            Arc::new(InMemoryObjectStore::new()),
            Arc::new(InMemoryRefStore::new()),
        )
    }

    /// Initialize a repository over the given backends.
    ///
    /// Seeds the empty tree, points `WORK_HEAD` and `STAGE_HEAD` at it,
    /// creates an unborn default branch, and points HEAD there. Opening
    /// an already-seeded ref store is a no-op for existing refs.
    pub fn with_backends(
        store: Arc<dyn ObjectStore>,
        refs: Arc<dyn RefStore>,
    ) -> RepoResult<Self> {
        let empty = store.write(&RevTree::empty().to_stored_object()?)?;

        for name in [WORK_HEAD, STAGE_HEAD] {
            if refs.read_ref(name)?.is_none() {
                refs.write_ref(
                    name,
                    &Ref::Transaction {
                        name: name.into(),
                        target: empty,
                    },
                )?;
            }
        }
        let branch_ref = format!("refs/heads/{DEFAULT_BRANCH}");
        if refs.read_ref(&branch_ref)?.is_none() {
            refs.write_ref(
                &branch_ref,
                &Ref::Branch {
                    name: DEFAULT_BRANCH.into(),
                    target: ObjectId::null(),
                },
            )?;
        }
        if refs.head()?.is_none() {
            refs.set_head(DEFAULT_BRANCH)?;
        }

        let work = WorkingTree::new(Arc::clone(&store), Arc::clone(&refs));
        let stage = StagingArea::new(Arc::clone(&store), Arc::clone(&refs));
        Ok(Self {
            store,
            refs,
            work,
            stage,
        })
    }

    // ---- Accessors ----

    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    pub fn refs(&self) -> &Arc<dyn RefStore> {
        &self.refs
    }

    pub fn work_tree(&self) -> &WorkingTree {
        &self.work
    }

    pub fn staging(&self) -> &StagingArea {
        &self.stage
    }

    // ---- Head / branch state ----

    /// Name of the branch HEAD points at.
    pub fn current_branch(&self) -> RepoResult<String> {
        match self.refs.head()? {
            Some(Head::Symbolic(name)) => Ok(name),
            Some(Head::Detached(id)) => Err(RepoError::InvalidRefSpec(format!(
                "HEAD is detached at {}",
                id.short_hex()
            ))),
            None => Err(RepoError::InvalidRefSpec("HEAD is unset".into())),
        }
    }

    /// Id of the commit at the tip of the current branch, if any.
    pub fn head_commit_id(&self) -> RepoResult<Option<ObjectId>> {
        match self.refs.head()? {
            Some(Head::Detached(id)) => Ok(Some(id)),
            Some(Head::Symbolic(branch)) => {
                let name = format!("refs/heads/{branch}");
                match self.refs.read_ref(&name)? {
                    Some(r) if !r.target().is_null() => Ok(Some(r.target())),
                    _ => Ok(None),
                }
            }
            None => Ok(None),
        }
    }

    /// The commit at the tip of the current branch, if any.
    pub fn head_commit(&self) -> RepoResult<Option<Commit>> {
        match self.head_commit_id()? {
            None => Ok(None),
            Some(id) => Ok(Some(self.read_commit(&id)?)),
        }
    }

    /// Root tree of the current commit; the empty tree on an unborn branch.
    pub fn head_tree_id(&self) -> RepoResult<ObjectId> {
        match self.head_commit()? {
            Some(commit) => Ok(commit.tree),
            None => Ok(RevTree::empty().id()?),
        }
    }

    // ---- Commit ----

    /// Commit the staged tree with the current timestamp.
    ///
    /// Fails with [`RepoError::NothingToCommit`] when the staged tree is
    /// identical to the current commit's tree — checked before anything
    /// is written.
    pub fn commit(&self, author: &str, message: &str) -> RepoResult<(ObjectId, Commit)> {
        self.commit_at(author, message, Utc::now().timestamp_millis())
    }

    /// Commit the staged tree with an explicit timestamp.
    pub fn commit_at(
        &self,
        author: &str,
        message: &str,
        timestamp_ms: i64,
    ) -> RepoResult<(ObjectId, Commit)> {
        let staged = self.stage.tree_id()?;
        if staged == self.head_tree_id()? {
            return Err(RepoError::NothingToCommit);
        }

        let parents: Vec<ObjectId> = self.head_commit_id()?.into_iter().collect();
        let commit = Commit::new(staged, parents, author, message, timestamp_ms);
        let commit_id = self.store.write(&commit.to_stored_object()?)?;

        match self.refs.head()? {
            Some(Head::Detached(_)) => self.refs.set_head_detached(commit_id)?,
            _ => {
                let branch = self.current_branch()?;
                self.refs.write_ref(
                    &format!("refs/heads/{branch}"),
                    &Ref::Branch {
                        name: branch.clone(),
                        target: commit_id,
                    },
                )?;
            }
        }

        info!(commit = %commit_id.short_hex(), message, "commit created");
        Ok((commit_id, commit))
    }

    // ---- Branches and tags ----

    /// Create a branch at the current head commit.
    pub fn create_branch(&self, name: &str) -> RepoResult<()> {
        let target = self.head_commit_id()?.unwrap_or(ObjectId::null());
        self.refs.write_ref(
            &format!("refs/heads/{name}"),
            &Ref::Branch {
                name: name.into(),
                target,
            },
        )?;
        Ok(())
    }

    /// Point HEAD at another branch and reset the work/stage pointers to
    /// its tree.
    pub fn switch_branch(&self, name: &str) -> RepoResult<()> {
        let branch_ref = format!("refs/heads/{name}");
        if self.refs.read_ref(&branch_ref)?.is_none() {
            return Err(RepoError::InvalidRefSpec(name.to_string()));
        }
        self.refs.set_head(name)?;

        let tree = self.head_tree_id()?;
        self.work.update_work_tree(tree)?;
        self.refs.write_ref(
            STAGE_HEAD,
            &Ref::Transaction {
                name: STAGE_HEAD.into(),
                target: tree,
            },
        )?;
        Ok(())
    }

    /// Create a tag object pointing at a commit, plus its ref.
    pub fn create_tag(&self, name: &str, target: ObjectId, tagger: &str, message: &str) -> RepoResult<ObjectId> {
        // Reject targets that are not commits before writing anything.
        self.read_commit(&target)?;
        let tag = Tag::new(name, target, tagger, message, Utc::now().timestamp_millis());
        let tag_id = self.store.write(&tag.to_stored_object()?)?;
        self.refs.write_ref(
            &format!("refs/tags/{name}"),
            &Ref::Tag {
                name: name.into(),
                target: tag_id,
            },
        )?;
        Ok(tag_id)
    }

    // ---- History and diff ----

    /// Walk history from the current head, following first parents.
    pub fn log(&self) -> RepoResult<HistoryWalk<'_>> {
        Ok(HistoryWalk::new(
            self.store.as_ref(),
            self.head_commit_id()?,
        ))
    }

    /// Diff two trees by id.
    pub fn diff(&self, left: &ObjectId, right: &ObjectId) -> RepoResult<TreeDiff> {
        Ok(diff_trees(self.store.as_ref(), left, right)?)
    }

    pub(crate) fn read_commit(&self, id: &ObjectId) -> RepoResult<Commit> {
        let stored = self.store.get(id)?;
        Commit::from_stored_object(&stored).map_err(|_| RepoError::WrongKind {
            id: *id,
            expected: "commit",
            actual: stored.kind.to_string(),
        })
    }
}
