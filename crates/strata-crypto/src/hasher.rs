use strata_types::ObjectId;

/// Domain-separated BLAKE3 content hasher.
///
/// Each hasher carries a domain tag (e.g., `"strata-feature-v1"`,
/// `"strata-tree-v1"`) that is prepended to every hash computation. This
/// prevents cross-kind collisions: a feature and a tree with identical
/// serialized bytes produce different ids.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for feature objects.
    pub const FEATURE: Self = Self {
        domain: "strata-feature-v1",
    };
    /// Hasher for feature-type (schema) objects.
    pub const FEATURE_TYPE: Self = Self {
        domain: "strata-featuretype-v1",
    };
    /// Hasher for revision-tree nodes.
    pub const TREE: Self = Self {
        domain: "strata-tree-v1",
    };
    /// Hasher for commit objects.
    pub const COMMIT: Self = Self {
        domain: "strata-commit-v1",
    };
    /// Hasher for tag objects.
    pub const TAG: Self = Self {
        domain: "strata-tag-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> ObjectId {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        ObjectId::from_raw(*hasher.finalize().as_bytes())
    }

    /// Hash a serializable value via its canonical JSON form.
    ///
    /// Callers must ensure the value serializes deterministically (sorted
    /// collections, fixed struct field order) — this is the precondition
    /// for correct content addressing.
    pub fn hash_canonical<T: serde::Serialize>(&self, value: &T) -> Result<ObjectId, HasherError> {
        let data =
            serde_json::to_vec(value).map_err(|e| HasherError::Serialization(e.to_string()))?;
        Ok(self.hash(&data))
    }

    /// Verify that data produces the expected object id.
    pub fn verify(&self, data: &[u8], expected: &ObjectId) -> bool {
        self.hash(data) == *expected
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("serialization error: {0}")]
    Serialization(String),
}
