use std::collections::HashMap;
use std::sync::RwLock;

use strata_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;
use crate::traits::ObjectStore;

/// In-memory, HashMap-based object store.
///
/// Intended for tests and ephemeral repositories. All objects are held in
/// memory behind a `RwLock`; objects are cloned on read and write.
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<ObjectId, StoredObject>>,
}

impl InMemoryObjectStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all stored objects.
    pub fn total_bytes(&self) -> u64 {
        self.objects
            .read()
            .expect("lock poisoned")
            .values()
            .map(|obj| obj.size)
            .sum()
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>> {
        let map = self.objects.read().expect("lock poisoned");
        Ok(map.get(id).cloned())
    }

    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId> {
        let id = object.compute_id();
        if id.is_null() {
            return Err(StoreError::NullObjectId);
        }
        let mut map = self.objects.write().expect("lock poisoned");
        // Idempotent: same id always maps to the same content.
        map.entry(id).or_insert_with(|| object.clone());
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        let map = self.objects.read().expect("lock poisoned");
        Ok(map.contains_key(id))
    }

    fn delete(&self, id: &ObjectId) -> StoreResult<bool> {
        let mut map = self.objects.write().expect("lock poisoned");
        Ok(map.remove(id).is_some())
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("object_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::Feature;
    use crate::object::ObjectKind;
    use crate::tree::{RevTree, TreeEntry};
    use strata_types::Value;

    fn make_feature(tag: &str) -> StoredObject {
        Feature::new(ObjectId::null(), vec![Value::Text(tag.into())])
            .to_stored_object()
            .unwrap()
    }

    #[test]
    fn write_and_read_feature() {
        let store = InMemoryObjectStore::new();
        let obj = make_feature("highway=primary");
        let id = store.write(&obj).unwrap();
        assert!(!id.is_null());

        let read_back = store.read(&id).unwrap().expect("should exist");
        assert_eq!(read_back, obj);
    }

    #[test]
    fn write_and_read_tree() {
        let store = InMemoryObjectStore::new();
        let tree = RevTree::direct(
            vec![
                TreeEntry::feature("node/1", ObjectId::hash_of(b"n1")),
                TreeEntry::subtree("way", ObjectId::hash_of(b"w")),
            ],
            1,
        );
        let id = store.write(&tree.to_stored_object().unwrap()).unwrap();

        let read_back = store.read(&id).unwrap().expect("should exist");
        assert_eq!(read_back.kind, ObjectKind::Tree);
        let decoded = RevTree::from_stored_object(&read_back).unwrap();
        assert!(decoded.get("node/1").is_some());
    }

    #[test]
    fn same_content_is_stored_once() {
        let store = InMemoryObjectStore::new();
        let id1 = store.write(&make_feature("same")).unwrap();
        let id2 = store.write(&make_feature("same")).unwrap();
        assert_eq!(id1, id2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn different_content_produces_different_ids() {
        let store = InMemoryObjectStore::new();
        let id1 = store.write(&make_feature("aaa")).unwrap();
        let id2 = store.write(&make_feature("bbb")).unwrap();
        assert_ne!(id1, id2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn write_is_idempotent() {
        let store = InMemoryObjectStore::new();
        let obj = make_feature("idempotent");
        let id1 = store.write(&obj).unwrap();
        let id2 = store.write(&obj).unwrap();
        assert_eq!(id1, id2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.read(&id1).unwrap().unwrap(), obj);
    }

    #[test]
    fn get_missing_is_not_found() {
        let store = InMemoryObjectStore::new();
        let id = ObjectId::hash_of(b"missing");
        assert!(store.read(&id).unwrap().is_none());
        assert!(matches!(
            store.get(&id).unwrap_err(),
            StoreError::NotFound(missing) if missing == id
        ));
    }

    #[test]
    fn exists_and_delete() {
        let store = InMemoryObjectStore::new();
        let id = store.write(&make_feature("to-delete")).unwrap();
        assert!(store.exists(&id).unwrap());
        assert!(store.delete(&id).unwrap());
        assert!(!store.exists(&id).unwrap());
        assert!(!store.delete(&id).unwrap());
    }

    #[test]
    fn batch_roundtrip_with_missing() {
        let store = InMemoryObjectStore::new();
        let objects = vec![make_feature("a"), make_feature("b")];
        let ids = store.write_batch(&objects).unwrap();
        assert_eq!(ids.len(), 2);

        let mut request = ids.clone();
        request.push(ObjectId::hash_of(b"absent"));
        let results = store.read_batch(&request).unwrap();
        assert!(results[0].is_some());
        assert!(results[1].is_some());
        assert!(results[2].is_none());
    }

    #[test]
    fn total_bytes_sums_object_sizes() {
        let store = InMemoryObjectStore::new();
        let a = make_feature("a");
        let b = make_feature("bb");
        let expected = a.size + b.size;
        store.write(&a).unwrap();
        store.write(&b).unwrap();
        assert_eq!(store.total_bytes(), expected);
    }

    #[test]
    fn concurrent_reads_are_safe() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(InMemoryObjectStore::new());
        let id = store.write(&make_feature("shared")).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let obj = store.read(&id).unwrap().expect("present");
                    assert_eq!(obj.compute_id(), id);
                })
            })
            .collect();

        for h in handles {
            h.join().expect("thread should not panic");
        }
    }
}
