//! Core reference types.
//!
//! A [`Ref`] is a named pointer to an immutable object. Branches point at
//! commits and move forward on every commit; tags point at commits and
//! never move; transaction refs point at revision trees and are repointed
//! by the working-tree machinery on every mutation.

use serde::{Deserialize, Serialize};
use strata_types::ObjectId;

/// Canonical name of the working-tree pointer.
pub const WORK_HEAD: &str = "WORK_HEAD";

/// Canonical name of the staging-index pointer.
pub const STAGE_HEAD: &str = "STAGE_HEAD";

/// A named reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ref {
    /// Mutable pointer to the tip commit of a line of history.
    Branch { name: String, target: ObjectId },

    /// Immutable pointer to a commit. Delete and recreate to replace.
    Tag { name: String, target: ObjectId },

    /// Repository-internal pointer to a revision tree
    /// (e.g. `WORK_HEAD`, `STAGE_HEAD`).
    Transaction { name: String, target: ObjectId },
}

impl Ref {
    /// The canonical name this ref is stored under
    /// (e.g. `"refs/heads/main"`, `"WORK_HEAD"`).
    pub fn canonical_name(&self) -> String {
        match self {
            Ref::Branch { name, .. } => format!("refs/heads/{name}"),
            Ref::Tag { name, .. } => format!("refs/tags/{name}"),
            Ref::Transaction { name, .. } => name.clone(),
        }
    }

    /// The short name, without any `refs/` prefix.
    pub fn short_name(&self) -> &str {
        match self {
            Ref::Branch { name, .. } | Ref::Tag { name, .. } | Ref::Transaction { name, .. } => {
                name
            }
        }
    }

    /// The object id this ref points to.
    pub fn target(&self) -> ObjectId {
        match self {
            Ref::Branch { target, .. }
            | Ref::Tag { target, .. }
            | Ref::Transaction { target, .. } => *target,
        }
    }

    pub fn is_branch(&self) -> bool {
        matches!(self, Ref::Branch { .. })
    }

    pub fn is_tag(&self) -> bool {
        matches!(self, Ref::Tag { .. })
    }
}

/// The state of HEAD: symbolic (a branch name) or detached (a commit id).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Head {
    Symbolic(String),
    Detached(ObjectId),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(b: u8) -> ObjectId {
        ObjectId::from_raw([b; 32])
    }

    #[test]
    fn canonical_names() {
        let branch = Ref::Branch {
            name: "main".into(),
            target: oid(1),
        };
        assert_eq!(branch.canonical_name(), "refs/heads/main");

        let tag = Ref::Tag {
            name: "v1.0".into(),
            target: oid(2),
        };
        assert_eq!(tag.canonical_name(), "refs/tags/v1.0");

        let work = Ref::Transaction {
            name: WORK_HEAD.into(),
            target: oid(3),
        };
        assert_eq!(work.canonical_name(), "WORK_HEAD");
    }

    #[test]
    fn short_name_and_target() {
        let branch = Ref::Branch {
            name: "import/osm".into(),
            target: oid(9),
        };
        assert_eq!(branch.short_name(), "import/osm");
        assert_eq!(branch.target(), oid(9));
        assert!(branch.is_branch());
        assert!(!branch.is_tag());
    }

    #[test]
    fn head_serde_roundtrip() {
        for head in [Head::Symbolic("main".into()), Head::Detached(oid(4))] {
            let json = serde_json::to_string(&head).unwrap();
            let parsed: Head = serde_json::from_str(&json).unwrap();
            assert_eq!(head, parsed);
        }
    }
}
