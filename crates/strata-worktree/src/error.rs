use strata_diff::DiffError;
use strata_refs::RefError;
use strata_store::StoreError;
use strata_tree::TreeError;
use strata_types::ObjectId;

/// Errors from working-tree and staging operations.
#[derive(Debug, thiserror::Error)]
pub enum WorktreeError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Diff(#[from] DiffError),

    #[error(transparent)]
    Ref(#[from] RefError),

    /// Tried to repoint a tree ref at an id that is not a stored tree.
    #[error("{0} is not a stored tree")]
    NotATree(ObjectId),

    /// A path addressed through a feature entry, which has no children.
    #[error("path {0:?} passes through a feature")]
    PathThroughFeature(String),
}

/// Result alias for working-tree operations.
pub type WorktreeResult<T> = Result<T, WorktreeError>;
