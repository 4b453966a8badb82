//! Mapping: derived datasets computed from source features.
//!
//! A mapping reads features from source subtrees of the working tree,
//! transforms each into zero or more derived features, and writes the
//! results back under destination paths — batched, committed once, and
//! recorded in a provenance log so re-running an already-applied mapping
//! is a cheap no-op.
//!
//! The transform itself is caller-supplied via the [`Mapping`] trait; this
//! crate owns the orchestration: the clean-tree precondition, lazy source
//! iteration, batched tree construction, the unchanged-tree short-circuit,
//! and the log append.

pub mod error;
pub mod flusher;
pub mod log;
pub mod mapping;
pub mod report;

pub use error::{MappingError, MappingResult};
pub use flusher::{FeatureFlusher, FLUSH_LIMIT};
pub use log::{InMemoryMappingLog, MappingLog, MappingLogEntry};
pub use mapping::{MapOp, MapOutcome, MappedFeature, Mapping};
pub use report::MappingReport;
