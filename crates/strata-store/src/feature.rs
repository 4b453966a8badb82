//! Feature and feature-type revision objects.
//!
//! A [`Feature`] is an ordered list of attribute values conforming to a
//! [`FeatureType`] referenced by id, so many features share one schema
//! object without duplication. Content, not location, defines identity:
//! the same feature bytes may be referenced from any number of trees.

use serde::{Deserialize, Serialize};
use strata_types::{Extent, FieldType, Geometry, ObjectId, Value};

use crate::error::StoreResult;
use crate::object::{decode_payload, encode_payload, ObjectKind, StoredObject};

/// A named, typed record: attribute values plus optional geometry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Id of the [`FeatureType`] this feature conforms to.
    pub feature_type: ObjectId,
    /// Attribute values, positionally matching the schema's fields.
    pub values: Vec<Value>,
}

impl Feature {
    /// Create a feature for the given schema id.
    pub fn new(feature_type: ObjectId, values: Vec<Value>) -> Self {
        Self {
            feature_type,
            values,
        }
    }

    /// The first geometry-valued attribute, if any.
    pub fn geometry(&self) -> Option<&Geometry> {
        self.values.iter().find_map(Value::as_geometry)
    }

    /// Bounding extent over all geometry attributes.
    ///
    /// Returns `None` for features with no geometry.
    pub fn extent(&self) -> Option<Extent> {
        let mut extent = Extent::empty();
        for value in &self.values {
            if let Some(geom) = value.as_geometry() {
                extent.expand_to_include(&geom.extent());
            }
        }
        if extent.is_empty() {
            None
        } else {
            Some(extent)
        }
    }

    /// Check this feature's values against a schema.
    ///
    /// Arity must match exactly; each non-null value must match its slot's
    /// declared type.
    pub fn conforms_to(&self, schema: &FeatureType) -> bool {
        self.values.len() == schema.fields.len()
            && self
                .values
                .iter()
                .zip(&schema.fields)
                .all(|(value, field)| value.conforms_to(field.field_type))
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoreResult<StoredObject> {
        encode_payload(ObjectKind::Feature, self)
    }

    /// Decode from a `StoredObject`, checking the kind tag.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        decode_payload(ObjectKind::Feature, obj)
    }

    /// The content-addressed id of this feature.
    pub fn id(&self) -> StoreResult<ObjectId> {
        Ok(self.to_stored_object()?.compute_id())
    }
}

/// One attribute slot in a feature schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub field_type: FieldType,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// A feature schema: an ordered list of named, typed attribute slots.
///
/// Field order is significant — it fixes the positional layout of every
/// conforming feature's value list, and therefore the feature's canonical
/// bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureType {
    /// Schema name (e.g. "node", "way", "roads").
    pub name: String,
    /// Ordered attribute descriptors.
    pub fields: Vec<FieldDescriptor>,
}

impl FeatureType {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Index of the field with the given name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoreResult<StoredObject> {
        encode_payload(ObjectKind::FeatureType, self)
    }

    /// Decode from a `StoredObject`, checking the kind tag.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        decode_payload(ObjectKind::FeatureType, obj)
    }

    /// The content-addressed id of this schema.
    pub fn id(&self) -> StoreResult<ObjectId> {
        Ok(self.to_stored_object()?.compute_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_types::Coord;

    fn point_schema() -> FeatureType {
        FeatureType::new(
            "node",
            vec![
                FieldDescriptor::new("tags", FieldType::Text),
                FieldDescriptor::new("location", FieldType::Geometry),
            ],
        )
    }

    fn point_feature(schema_id: ObjectId, x: f64, y: f64) -> Feature {
        Feature::new(
            schema_id,
            vec![
                Value::Text("amenity=cafe".into()),
                Value::Geometry(Geometry::Point(Coord::new(x, y))),
            ],
        )
    }

    #[test]
    fn feature_roundtrip() {
        let schema_id = point_schema().id().unwrap();
        let feature = point_feature(schema_id, 13.4, 52.5);
        let stored = feature.to_stored_object().unwrap();
        let decoded = Feature::from_stored_object(&stored).unwrap();
        assert_eq!(feature, decoded);
    }

    #[test]
    fn feature_type_roundtrip() {
        let schema = point_schema();
        let stored = schema.to_stored_object().unwrap();
        let decoded = FeatureType::from_stored_object(&stored).unwrap();
        assert_eq!(schema, decoded);
    }

    #[test]
    fn semantically_equal_features_share_an_id() {
        let schema_id = point_schema().id().unwrap();
        let a = point_feature(schema_id, 1.0, 2.0);
        let b = point_feature(schema_id, 1.0, 2.0);
        assert_eq!(a.id().unwrap(), b.id().unwrap());
    }

    #[test]
    fn any_field_change_changes_the_id() {
        let schema_id = point_schema().id().unwrap();
        let a = point_feature(schema_id, 1.0, 2.0);
        let b = point_feature(schema_id, 1.0, 2.000001);
        assert_ne!(a.id().unwrap(), b.id().unwrap());
    }

    #[test]
    fn geometry_and_extent() {
        let schema_id = point_schema().id().unwrap();
        let feature = point_feature(schema_id, 3.0, 4.0);
        assert!(feature.geometry().is_some());
        let extent = feature.extent().unwrap();
        assert_eq!(extent.min_x, 3.0);
        assert_eq!(extent.max_y, 4.0);
    }

    #[test]
    fn feature_without_geometry_has_no_extent() {
        let feature = Feature::new(ObjectId::null(), vec![Value::Long(5)]);
        assert!(feature.geometry().is_none());
        assert!(feature.extent().is_none());
    }

    #[test]
    fn conformance_checks_arity_and_types() {
        let schema = point_schema();
        let schema_id = schema.id().unwrap();

        let ok = point_feature(schema_id, 0.0, 0.0);
        assert!(ok.conforms_to(&schema));

        let wrong_type = Feature::new(schema_id, vec![Value::Long(1), Value::Long(2)]);
        assert!(!wrong_type.conforms_to(&schema));

        let wrong_arity = Feature::new(schema_id, vec![Value::Text("x".into())]);
        assert!(!wrong_arity.conforms_to(&schema));

        let with_null = Feature::new(schema_id, vec![Value::Null, Value::Null]);
        assert!(with_null.conforms_to(&schema));
    }

    #[test]
    fn field_index_lookup() {
        let schema = point_schema();
        assert_eq!(schema.field_index("location"), Some(1));
        assert_eq!(schema.field_index("missing"), None);
    }

    #[test]
    fn schema_ids_differ_when_field_order_differs() {
        let a = FeatureType::new(
            "t",
            vec![
                FieldDescriptor::new("x", FieldType::Long),
                FieldDescriptor::new("y", FieldType::Text),
            ],
        );
        let b = FeatureType::new(
            "t",
            vec![
                FieldDescriptor::new("y", FieldType::Text),
                FieldDescriptor::new("x", FieldType::Long),
            ],
        );
        assert_ne!(a.id().unwrap(), b.id().unwrap());
    }
}
