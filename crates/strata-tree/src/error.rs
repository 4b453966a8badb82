use strata_store::StoreError;
use strata_types::ObjectId;

/// Errors from tree construction and traversal.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// Failure from the underlying object store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The id resolved to an object that is not a tree.
    #[error("not a tree: {0}")]
    NotATree(ObjectId),

    /// An entry name contained a path separator or was empty.
    #[error("invalid entry name: {0:?}")]
    InvalidEntryName(String),
}

/// Result alias for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
