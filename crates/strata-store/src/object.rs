use serde::{Deserialize, Serialize};
use strata_crypto::ContentHasher;
use strata_types::ObjectId;

use crate::commit::{Commit, Tag};
use crate::error::{StoreError, StoreResult};
use crate::feature::{Feature, FeatureType};
use crate::tree::RevTree;

/// The kind of revision object stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// A typed record with attribute values and optional geometry.
    Feature,
    /// A feature schema: ordered (name, type) descriptors.
    FeatureType,
    /// A revision-tree node: direct entries or hash buckets.
    Tree,
    /// An immutable commit linking a root tree to its history.
    Commit,
    /// A named, immutable pointer to a commit.
    Tag,
}

impl ObjectKind {
    /// Stable lowercase tag used in the loose-object file header.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feature => "feature",
            Self::FeatureType => "featuretype",
            Self::Tree => "tree",
            Self::Commit => "commit",
            Self::Tag => "tag",
        }
    }

    /// Parse the loose-object header tag.
    pub fn from_str_tag(s: &str) -> Option<Self> {
        match s {
            "feature" => Some(Self::Feature),
            "featuretype" => Some(Self::FeatureType),
            "tree" => Some(Self::Tree),
            "commit" => Some(Self::Commit),
            "tag" => Some(Self::Tag),
            _ => None,
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored object: kind tag + canonical serialized bytes + cached size.
///
/// `StoredObject` is the unit of storage. Backends never interpret the
/// data — they are pure key-value stores keyed by content hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    /// The kind of this object.
    pub kind: ObjectKind,
    /// The canonical serialized bytes.
    pub data: Vec<u8>,
    /// The size of `data` in bytes.
    pub size: u64,
}

impl StoredObject {
    /// Create a stored object from kind and canonical bytes.
    pub fn new(kind: ObjectKind, data: Vec<u8>) -> Self {
        let size = data.len() as u64;
        Self { kind, data, size }
    }

    /// Compute the content-addressed id for this object.
    ///
    /// Each kind hashes under its own domain, so identical bytes of
    /// different kinds never collide.
    pub fn compute_id(&self) -> ObjectId {
        let hasher = match self.kind {
            ObjectKind::Feature => &ContentHasher::FEATURE,
            ObjectKind::FeatureType => &ContentHasher::FEATURE_TYPE,
            ObjectKind::Tree => &ContentHasher::TREE,
            ObjectKind::Commit => &ContentHasher::COMMIT,
            ObjectKind::Tag => &ContentHasher::TAG,
        };
        hasher.hash(&self.data)
    }
}

/// A fully decoded revision object.
///
/// The closed set of everything the object store can hold. Serialization
/// and diff sites match exhaustively over this enum; adding a variant is a
/// reviewed change here, not a scattered one.
#[derive(Clone, Debug, PartialEq)]
pub enum RevObject {
    Feature(Feature),
    FeatureType(FeatureType),
    Tree(RevTree),
    Commit(Commit),
    Tag(Tag),
}

impl RevObject {
    /// Decode a stored object into its typed form.
    pub fn decode(obj: &StoredObject) -> StoreResult<Self> {
        Ok(match obj.kind {
            ObjectKind::Feature => RevObject::Feature(Feature::from_stored_object(obj)?),
            ObjectKind::FeatureType => {
                RevObject::FeatureType(FeatureType::from_stored_object(obj)?)
            }
            ObjectKind::Tree => RevObject::Tree(RevTree::from_stored_object(obj)?),
            ObjectKind::Commit => RevObject::Commit(Commit::from_stored_object(obj)?),
            ObjectKind::Tag => RevObject::Tag(Tag::from_stored_object(obj)?),
        })
    }

    /// Encode back into storable form.
    pub fn encode(&self) -> StoreResult<StoredObject> {
        match self {
            RevObject::Feature(f) => f.to_stored_object(),
            RevObject::FeatureType(t) => t.to_stored_object(),
            RevObject::Tree(t) => t.to_stored_object(),
            RevObject::Commit(c) => c.to_stored_object(),
            RevObject::Tag(t) => t.to_stored_object(),
        }
    }

    /// The kind of this object.
    pub fn kind(&self) -> ObjectKind {
        match self {
            RevObject::Feature(_) => ObjectKind::Feature,
            RevObject::FeatureType(_) => ObjectKind::FeatureType,
            RevObject::Tree(_) => ObjectKind::Tree,
            RevObject::Commit(_) => ObjectKind::Commit,
            RevObject::Tag(_) => ObjectKind::Tag,
        }
    }

    /// The content-addressed id of this object.
    pub fn id(&self) -> StoreResult<ObjectId> {
        Ok(self.encode()?.compute_id())
    }
}

/// Serialize a revision object payload to canonical JSON bytes.
pub(crate) fn encode_payload<T: Serialize>(
    kind: ObjectKind,
    payload: &T,
) -> StoreResult<StoredObject> {
    let data = serde_json::to_vec(payload).map_err(|e| StoreError::Serialization(e.to_string()))?;
    Ok(StoredObject::new(kind, data))
}

/// Decode a revision object payload, checking the kind tag first.
pub(crate) fn decode_payload<T: for<'de> Deserialize<'de>>(
    expected: ObjectKind,
    obj: &StoredObject,
) -> StoreResult<T> {
    if obj.kind != expected {
        return Err(StoreError::CorruptObject {
            id: obj.compute_id(),
            reason: format!("expected {expected}, got {}", obj.kind),
        });
    }
    serde_json::from_slice(&obj.data).map_err(|e| StoreError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_object_id_deterministic() {
        let obj = StoredObject::new(ObjectKind::Feature, b"payload".to_vec());
        assert_eq!(obj.compute_id(), obj.compute_id());
    }

    #[test]
    fn different_kinds_produce_different_ids() {
        let data = b"same bytes".to_vec();
        let feature = StoredObject::new(ObjectKind::Feature, data.clone());
        let tree = StoredObject::new(ObjectKind::Tree, data.clone());
        let commit = StoredObject::new(ObjectKind::Commit, data);
        assert_ne!(feature.compute_id(), tree.compute_id());
        assert_ne!(feature.compute_id(), commit.compute_id());
        assert_ne!(tree.compute_id(), commit.compute_id());
    }

    #[test]
    fn kind_tag_roundtrip() {
        for kind in [
            ObjectKind::Feature,
            ObjectKind::FeatureType,
            ObjectKind::Tree,
            ObjectKind::Commit,
            ObjectKind::Tag,
        ] {
            assert_eq!(ObjectKind::from_str_tag(kind.as_str()), Some(kind));
        }
        assert_eq!(ObjectKind::from_str_tag("blob"), None);
    }

    #[test]
    fn kind_display() {
        assert_eq!(format!("{}", ObjectKind::Feature), "feature");
        assert_eq!(format!("{}", ObjectKind::FeatureType), "featuretype");
        assert_eq!(format!("{}", ObjectKind::Tree), "tree");
    }

    #[test]
    fn decode_rejects_kind_mismatch() {
        let obj = StoredObject::new(ObjectKind::Commit, b"{}".to_vec());
        let err = crate::feature::Feature::from_stored_object(&obj).unwrap_err();
        assert!(matches!(err, StoreError::CorruptObject { .. }));
    }

    #[test]
    fn rev_object_roundtrips_every_variant() {
        use crate::commit::{Commit, Tag};
        use crate::feature::{Feature, FeatureType, FieldDescriptor};
        use crate::tree::{RevTree, TreeEntry};
        use strata_types::{FieldType, ObjectId, Value};

        let schema = FeatureType::new(
            "node",
            vec![FieldDescriptor::new("tags", FieldType::Text)],
        );
        let feature = Feature::new(schema.id().unwrap(), vec![Value::Text("x".into())]);
        let tree = RevTree::direct(vec![TreeEntry::feature("1", ObjectId::hash_of(b"f"))], 1);
        let commit = Commit::new(tree.id().unwrap(), vec![], "a", "m", 0);
        let tag = Tag::new("v1", commit.id().unwrap(), "a", "t", 0);

        let objects = [
            RevObject::Feature(feature),
            RevObject::FeatureType(schema),
            RevObject::Tree(tree),
            RevObject::Commit(commit),
            RevObject::Tag(tag),
        ];
        for object in objects {
            let stored = object.encode().unwrap();
            assert_eq!(stored.kind, object.kind());
            let decoded = RevObject::decode(&stored).unwrap();
            assert_eq!(decoded, object);
            assert_eq!(decoded.id().unwrap(), stored.compute_id());
        }
    }
}
