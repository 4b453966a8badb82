//! Feature attribute values and their semantic types.
//!
//! A feature is an ordered list of [`Value`]s conforming to a schema of
//! [`FieldType`]s. The pairing is closed: adding a variant means revisiting
//! every match over these enums.

use serde::{Deserialize, Serialize};

use crate::geom::Geometry;

/// The semantic type of one attribute slot in a feature schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    Bool,
    Int,
    Long,
    Double,
    Text,
    Geometry,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Long => write!(f, "long"),
            Self::Double => write!(f, "double"),
            Self::Text => write!(f, "text"),
            Self::Geometry => write!(f, "geometry"),
        }
    }
}

/// A single attribute value.
///
/// `Null` is permitted in any slot; a non-null value must match the slot's
/// declared [`FieldType`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    Text(String),
    Geometry(Geometry),
}

impl Value {
    /// The field type this value satisfies, or `None` for `Null`.
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(FieldType::Bool),
            Value::Int(_) => Some(FieldType::Int),
            Value::Long(_) => Some(FieldType::Long),
            Value::Double(_) => Some(FieldType::Double),
            Value::Text(_) => Some(FieldType::Text),
            Value::Geometry(_) => Some(FieldType::Geometry),
        }
    }

    /// Returns `true` if this value is acceptable in a slot of `ty`.
    pub fn conforms_to(&self, ty: FieldType) -> bool {
        match self.field_type() {
            None => true,
            Some(actual) => actual == ty,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The geometry payload, if this is a geometry value.
    pub fn as_geometry(&self) -> Option<&Geometry> {
        match self {
            Value::Geometry(g) => Some(g),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<Geometry> for Value {
    fn from(g: Geometry) -> Self {
        Value::Geometry(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Coord;

    #[test]
    fn field_type_of_each_variant() {
        assert_eq!(Value::Null.field_type(), None);
        assert_eq!(Value::Bool(true).field_type(), Some(FieldType::Bool));
        assert_eq!(Value::Int(7).field_type(), Some(FieldType::Int));
        assert_eq!(Value::Long(7).field_type(), Some(FieldType::Long));
        assert_eq!(Value::Double(1.5).field_type(), Some(FieldType::Double));
        assert_eq!(
            Value::Text("highway".into()).field_type(),
            Some(FieldType::Text)
        );
        assert_eq!(
            Value::Geometry(Geometry::Point(Coord::new(0.0, 0.0))).field_type(),
            Some(FieldType::Geometry)
        );
    }

    #[test]
    fn null_conforms_to_anything() {
        for ty in [
            FieldType::Bool,
            FieldType::Int,
            FieldType::Long,
            FieldType::Double,
            FieldType::Text,
            FieldType::Geometry,
        ] {
            assert!(Value::Null.conforms_to(ty));
        }
    }

    #[test]
    fn mismatched_value_does_not_conform() {
        assert!(Value::Long(1).conforms_to(FieldType::Long));
        assert!(!Value::Long(1).conforms_to(FieldType::Text));
        assert!(!Value::Text("x".into()).conforms_to(FieldType::Geometry));
    }

    #[test]
    fn conversions() {
        assert_eq!(Value::from("name"), Value::Text("name".into()));
        assert_eq!(Value::from(9i64), Value::Long(9));
        assert_eq!(Value::from(2.5f64), Value::Double(2.5));
    }

    #[test]
    fn value_serde_roundtrip() {
        let values = vec![
            Value::Null,
            Value::Bool(false),
            Value::Long(123),
            Value::Text("residential".into()),
            Value::Geometry(Geometry::Point(Coord::new(1.0, 2.0))),
        ];
        let json = serde_json::to_string(&values).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(values, parsed);
    }
}
