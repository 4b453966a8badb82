use strata_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;

/// Content-addressed object store.
///
/// All implementations must satisfy these invariants:
/// - Objects are immutable once written; the same bytes always produce the
///   same id, so a duplicate `write` is a no-op and never an error.
/// - Concurrent reads are always safe. Concurrent writes to different ids
///   must not corrupt state; writes to the same id are idempotent, so that
///   case needs no locking.
/// - The store never interprets object contents — it is a pure key-value
///   store keyed by content hash.
/// - I/O failures are propagated unchanged; the core performs no retries.
pub trait ObjectStore: Send + Sync {
    /// Read an object by its content-addressed id.
    ///
    /// Returns `Ok(None)` if the object does not exist; `Err` on I/O
    /// failure or corruption.
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>>;

    /// Write an object and return its content-addressed id.
    ///
    /// If the object already exists, this is a no-op.
    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId>;

    /// Check whether an object exists in the store.
    fn exists(&self, id: &ObjectId) -> StoreResult<bool>;

    /// Delete an object by id. Returns `true` if the object existed.
    ///
    /// Intended for garbage collection only; deleting a referenced object
    /// corrupts the repository.
    fn delete(&self, id: &ObjectId) -> StoreResult<bool>;

    /// Read an object that must exist.
    ///
    /// Absence is an error (`StoreError::NotFound`), never an empty value.
    fn get(&self, id: &ObjectId) -> StoreResult<StoredObject> {
        self.read(id)?.ok_or(StoreError::NotFound(*id))
    }

    /// Read multiple objects in a batch.
    ///
    /// The result mirrors the request order; missing objects are `None`.
    /// Backends may override for fewer I/O round-trips.
    fn read_batch(&self, ids: &[ObjectId]) -> StoreResult<Vec<Option<StoredObject>>> {
        ids.iter().map(|id| self.read(id)).collect()
    }

    /// Write multiple objects in a batch and return their ids.
    ///
    /// Backends may override for better performance (e.g., a single fsync).
    fn write_batch(&self, objects: &[StoredObject]) -> StoreResult<Vec<ObjectId>> {
        objects.iter().map(|obj| self.write(obj)).collect()
    }
}
