use strata_store::StoreError;
use strata_tree::TreeError;

/// Errors from diff operations.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// Failure from the underlying object store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Failure while traversing a tree.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Result alias for diff operations.
pub type DiffResult<T> = Result<T, DiffError>;
