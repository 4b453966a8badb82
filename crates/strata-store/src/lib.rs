//! Revision object model and content-addressed storage for Strata.
//!
//! Everything a repository remembers is an immutable *revision object*:
//! a [`Feature`], [`FeatureType`], [`RevTree`] node, [`Commit`], or [`Tag`].
//! Objects are serialized to canonical bytes, identified by a
//! domain-separated BLAKE3 hash, and stored behind the [`ObjectStore`]
//! backend contract. "Editing" always means writing new objects and
//! repointing a named reference — stored bytes never change.
//!
//! Two backends ship with the crate:
//!
//! - [`InMemoryObjectStore`] — HashMap behind a RwLock, for tests and
//!   ephemeral repositories
//! - [`FileObjectStore`] — loose-object directory layout with hash
//!   verification on read

pub mod commit;
pub mod error;
pub mod feature;
pub mod file;
pub mod memory;
pub mod object;
pub mod traits;
pub mod tree;

pub use commit::{Commit, Tag};
pub use error::{StoreError, StoreResult};
pub use feature::{Feature, FeatureType, FieldDescriptor};
pub use file::FileObjectStore;
pub use memory::InMemoryObjectStore;
pub use object::{ObjectKind, RevObject, StoredObject};
pub use traits::ObjectStore;
pub use tree::{EntryKind, RevTree, TreeEntry};
