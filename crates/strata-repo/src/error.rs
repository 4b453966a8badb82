use strata_diff::DiffError;
use strata_refs::RefError;
use strata_store::StoreError;
use strata_tree::TreeError;
use strata_types::ObjectId;
use strata_worktree::WorktreeError;

/// Errors from repository-level operations.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Diff(#[from] DiffError),

    #[error(transparent)]
    Ref(#[from] RefError),

    #[error(transparent)]
    Worktree(#[from] WorktreeError),

    /// The staged tree equals the current commit's tree.
    #[error("nothing to commit: staged tree matches the current commit")]
    NothingToCommit,

    /// An operation required a commit but the branch has none yet.
    #[error("branch {0:?} has no commits yet")]
    UnbornBranch(String),

    /// A refspec could not be parsed or resolved.
    #[error("cannot resolve refspec {0:?}")]
    InvalidRefSpec(String),

    /// An id resolved to an object of the wrong kind.
    #[error("{id} is a {actual}, expected {expected}")]
    WrongKind {
        id: ObjectId,
        expected: &'static str,
        actual: String,
    },
}

/// Result alias for repository operations.
pub type RepoResult<T> = Result<T, RepoError>;
