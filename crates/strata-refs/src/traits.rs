//! The [`RefStore`] trait defining the reference storage interface.
//!
//! Any backend (in-memory, filesystem, database) implements this trait to
//! provide named reference management. The namespace is hierarchical:
//!
//! - `refs/heads/*` for branches
//! - `refs/tags/*` for tags
//! - bare names (`WORK_HEAD`, `STAGE_HEAD`) for transaction refs

use strata_types::ObjectId;

use crate::error::RefResult;
use crate::types::{Head, Ref};

/// Storage backend for named references.
///
/// Implementations must be thread-safe (`Send + Sync`) and provide atomic
/// read/write/delete of individual refs. Refs are the only mutable state
/// in a repository; callers serialize mutating operations externally.
pub trait RefStore: Send + Sync {
    /// Read a ref by its canonical name (e.g. `"refs/heads/main"`).
    ///
    /// Returns `Ok(None)` if the ref does not exist.
    fn read_ref(&self, name: &str) -> RefResult<Option<Ref>>;

    /// Write (create or update) a ref at the given canonical name.
    ///
    /// Fails if a tag already exists at the name (tags are immutable;
    /// delete and recreate to replace one).
    fn write_ref(&self, name: &str, reference: &Ref) -> RefResult<()>;

    /// Delete a ref by canonical name.
    ///
    /// Returns `Ok(true)` if the ref existed, `Ok(false)` otherwise.
    fn delete_ref(&self, name: &str) -> RefResult<bool>;

    /// List all refs whose canonical name starts with `prefix`, sorted.
    ///
    /// Pass `""` to list everything, `"refs/heads/"` for branches only.
    fn list_refs(&self, prefix: &str) -> RefResult<Vec<(String, Ref)>>;

    /// Read the current HEAD state. `Ok(None)` if HEAD has not been set.
    fn head(&self) -> RefResult<Option<Head>>;

    /// Point HEAD at a branch (symbolic ref).
    fn set_head(&self, branch: &str) -> RefResult<()>;

    /// Detach HEAD, pointing it directly at a commit id.
    fn set_head_detached(&self, commit: ObjectId) -> RefResult<()>;

    /// List all branch refs.
    fn branches(&self) -> RefResult<Vec<(String, Ref)>> {
        self.list_refs("refs/heads/")
    }

    /// List all tag refs.
    fn tags(&self) -> RefResult<Vec<(String, Ref)>> {
        self.list_refs("refs/tags/")
    }
}
