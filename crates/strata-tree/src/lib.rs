//! Revision-tree construction and traversal for Strata.
//!
//! A revision tree maps entry names to features and named subtrees. Small
//! collections are a single direct node; once a node would exceed
//! [`NODE_LIMIT`] entries it fans out into [`BUCKET_COUNT`] hash-selected
//! buckets, recursively, forming a balanced Merkle structure over
//! collections of arbitrary size.
//!
//! # Compatibility parameters
//!
//! [`NODE_LIMIT`], [`BUCKET_COUNT`], and the bucket hash in
//! [`builder::bucket_index`] fix the physical shape of every tree, and the
//! shape is covered by the node hash. Changing any of them changes the
//! ObjectId of every tree past the threshold — they are part of the
//! repository format.

pub mod builder;
pub mod error;
pub mod iter;
pub mod lookup;

pub use builder::{TreeBuilder, BUCKET_COUNT, NODE_LIMIT};
pub use error::{TreeError, TreeResult};
pub use iter::{EntryIterator, FeatureIterator};
pub use lookup::{find_entry, find_path};
