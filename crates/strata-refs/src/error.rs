/// Errors from reference operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RefError {
    /// The ref name violates the naming rules.
    #[error("invalid ref name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// Tags are immutable; delete and recreate to replace one.
    #[error("tag {name:?} already exists")]
    TagImmutable { name: String },

    /// The branch HEAD points at cannot be deleted.
    #[error("cannot delete the current branch {name:?}")]
    DeleteCurrentBranch { name: String },
}

/// Result alias for reference operations.
pub type RefResult<T> = Result<T, RefError>;
