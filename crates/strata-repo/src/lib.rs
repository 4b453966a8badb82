//! Repository session API for Strata.
//!
//! A [`Repository`] ties the pluggable backends together: an object store,
//! a ref store, and the working-tree/staging handles over them. It is an
//! explicit context object — created at startup, passed where needed,
//! discarded at shutdown — with no ambient global state.
//!
//! One mutator at a time: the repository performs no internal locking for
//! ref repointing, so callers serialize mutating operations externally.

pub mod error;
pub mod history;
pub mod repository;
pub mod revparse;

pub use error::{RepoError, RepoResult};
pub use history::HistoryWalk;
pub use repository::{Repository, DEFAULT_BRANCH};
pub use revparse::resolve;
