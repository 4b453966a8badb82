//! Commit and tag revision objects.
//!
//! A [`Commit`] wraps a root tree id with its parent links, author, message,
//! and timestamp. Commits form a DAG through parent ids and are only ever
//! referenced by mutable refs — the objects themselves never change.

use serde::{Deserialize, Serialize};
use strata_types::ObjectId;

use crate::error::StoreResult;
use crate::object::{decode_payload, encode_payload, ObjectKind, StoredObject};

/// An immutable commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Root revision tree of the committed state.
    pub tree: ObjectId,
    /// Parent commit ids. Empty for the initial commit, two or more for merges.
    pub parents: Vec<ObjectId>,
    /// Author identification (name and address, free form).
    pub author: String,
    /// Commit message.
    pub message: String,
    /// Author timestamp, UTC milliseconds since the epoch.
    pub timestamp_ms: i64,
}

impl Commit {
    pub fn new(
        tree: ObjectId,
        parents: Vec<ObjectId>,
        author: impl Into<String>,
        message: impl Into<String>,
        timestamp_ms: i64,
    ) -> Self {
        Self {
            tree,
            parents,
            author: author.into(),
            message: message.into(),
            timestamp_ms,
        }
    }

    /// Returns `true` if this commit has no parents.
    pub fn is_initial(&self) -> bool {
        self.parents.is_empty()
    }

    /// First parent, if any. History walks follow this edge.
    pub fn first_parent(&self) -> Option<ObjectId> {
        self.parents.first().copied()
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoreResult<StoredObject> {
        encode_payload(ObjectKind::Commit, self)
    }

    /// Decode from a `StoredObject`, checking the kind tag.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        decode_payload(ObjectKind::Commit, obj)
    }

    /// The content-addressed id of this commit.
    pub fn id(&self) -> StoreResult<ObjectId> {
        Ok(self.to_stored_object()?.compute_id())
    }
}

/// A named, immutable pointer to a commit, with its own message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub target: ObjectId,
    pub tagger: String,
    pub message: String,
    pub timestamp_ms: i64,
}

impl Tag {
    pub fn new(
        name: impl Into<String>,
        target: ObjectId,
        tagger: impl Into<String>,
        message: impl Into<String>,
        timestamp_ms: i64,
    ) -> Self {
        Self {
            name: name.into(),
            target,
            tagger: tagger.into(),
            message: message.into(),
            timestamp_ms,
        }
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoreResult<StoredObject> {
        encode_payload(ObjectKind::Tag, self)
    }

    /// Decode from a `StoredObject`, checking the kind tag.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        decode_payload(ObjectKind::Tag, obj)
    }
}
