//! Content hashing for Strata.
//!
//! Provides domain-separated BLAKE3 hashing over canonical object bytes.
//! Object identity is a pure function of serialized content — the hasher is
//! the only component allowed to mint an [`strata_types::ObjectId`] for a
//! revision object.
//!
//! All hashing wraps `blake3` — no custom cryptography.

pub mod hasher;

pub use hasher::{ContentHasher, HasherError};
