//! Foundation types for Strata.
//!
//! This crate provides the identity and attribute types used throughout the
//! Strata version-control engine. Every other Strata crate depends on
//! `strata-types`.
//!
//! # Key Types
//!
//! - [`ObjectId`] — Content-addressed identifier (BLAKE3 hash)
//! - [`Extent`] — Axis-aligned bounding box over feature geometries
//! - [`Geometry`] — Point, line, and polygon coordinate data
//! - [`Value`] — A single feature attribute value
//! - [`FieldType`] — The semantic type of a feature attribute

pub mod error;
pub mod geom;
pub mod object;
pub mod value;

pub use error::TypeError;
pub use geom::{Coord, Extent, Geometry};
pub use object::ObjectId;
pub use value::{FieldType, Value};
