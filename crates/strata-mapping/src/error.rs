use strata_repo::RepoError;
use strata_store::StoreError;
use strata_tree::TreeError;
use strata_worktree::WorktreeError;

/// Errors from mapping operations.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    /// The clean-tree precondition failed. Checked before any write.
    #[error(
        "a clean working tree and index are required to run a mapping \
         ({staged} staged, {unstaged} unstaged)"
    )]
    DirtyWorkTree { staged: usize, unstaged: usize },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Worktree(#[from] WorktreeError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Result alias for mapping operations.
pub type MappingResult<T> = Result<T, MappingError>;
