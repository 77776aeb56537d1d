//! Typed reads from an attribute tree, guided by its schema.

use crate::error::{ValidationError, ValidationResult};
use crate::resource::tree::{AttributeTree, AttributeValue};
use crate::schema::Schema;

/// Reads attributes from a tree, applying schema defaults for absent keys.
///
/// Values pass through with their declared type; there is no coercion
/// between strings and numbers.
pub(crate) struct FieldReader<'a> {
    tree: &'a AttributeTree,
    schema: &'a Schema,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(tree: &'a AttributeTree, schema: &'a Schema) -> Self {
        Self { tree, schema }
    }

    fn value(&self, key: &str) -> Option<&'a AttributeValue> {
        self.tree
            .get(key)
            .or_else(|| self.schema.get(key).and_then(|d| d.default.as_ref()))
    }

    pub(crate) fn string(&self, key: &str) -> ValidationResult<Option<String>> {
        match self.value(key) {
            None => Ok(None),
            Some(AttributeValue::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(ValidationError::invalid_type(key, "string", other.type_name())),
        }
    }

    pub(crate) fn bool(&self, key: &str) -> ValidationResult<Option<bool>> {
        match self.value(key) {
            None => Ok(None),
            Some(AttributeValue::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(ValidationError::invalid_type(key, "boolean", other.type_name())),
        }
    }

    pub(crate) fn int(&self, key: &str) -> ValidationResult<Option<i32>> {
        match self.value(key) {
            None => Ok(None),
            Some(AttributeValue::Int(i)) => i32::try_from(*i).map(Some).map_err(|_| {
                ValidationError::InvalidIntegerValue {
                    attribute: key.to_string(),
                    value: *i,
                }
            }),
            Some(other) => Err(ValidationError::invalid_type(key, "integer", other.type_name())),
        }
    }

    pub(crate) fn required_string(&self, key: &str) -> ValidationResult<String> {
        self.string(key)?
            .ok_or_else(|| ValidationError::missing_required(key))
    }

    pub(crate) fn required_int(&self, key: &str) -> ValidationResult<i32> {
        self.int(key)?
            .ok_or_else(|| ValidationError::missing_required(key))
    }

    pub(crate) fn required_bool(&self, key: &str) -> ValidationResult<bool> {
        self.bool(key)?
            .ok_or_else(|| ValidationError::missing_required(key))
    }

    /// Bool with `false` standing in for an absent value and no default.
    pub(crate) fn flag(&self, key: &str) -> ValidationResult<bool> {
        Ok(self.bool(key)?.unwrap_or(false))
    }

    /// Items of a sub-resource collection.
    pub(crate) fn items(&self, key: &str) -> ValidationResult<&'a [AttributeTree]> {
        match self.tree.get(key) {
            None => Ok(&[]),
            Some(AttributeValue::Set(items)) => Ok(items.as_slice()),
            Some(other) => Err(ValidationError::invalid_type(key, "set", other.type_name())),
        }
    }

    /// Nested schema of a sub-resource, if this schema attaches one under `key`.
    pub(crate) fn elem(&self, key: &str) -> Option<&'a Schema> {
        self.schema.get(key).and_then(|d| d.elem.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDescriptor, FieldType};
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new()
            .with_field("name", FieldDescriptor::required(FieldType::String))
            .with_field(
                "visible",
                FieldDescriptor::optional(FieldType::Bool).with_default(true),
            )
            .with_field("connector_id", FieldDescriptor::required(FieldType::Int))
    }

    #[test]
    fn test_default_applies_when_absent() {
        let schema = schema();
        let tree = AttributeTree::new();
        let reader = FieldReader::new(&tree, &schema);
        assert_eq!(reader.bool("visible").unwrap(), Some(true));
    }

    #[test]
    fn test_present_value_wins_over_default() {
        let schema = schema();
        let tree = AttributeTree::from_json(json!({"visible": false})).unwrap();
        let reader = FieldReader::new(&tree, &schema);
        assert_eq!(reader.bool("visible").unwrap(), Some(false));
    }

    #[test]
    fn test_no_numeric_to_string_coercion() {
        let schema = schema();
        let tree = AttributeTree::from_json(json!({"name": 7})).unwrap();
        let reader = FieldReader::new(&tree, &schema);
        assert!(matches!(
            reader.string("name"),
            Err(ValidationError::InvalidAttributeType { .. })
        ));
    }

    #[test]
    fn test_int_out_of_range() {
        let schema = schema();
        let tree = AttributeTree::from_json(json!({"connector_id": 5_000_000_000i64})).unwrap();
        let reader = FieldReader::new(&tree, &schema);
        assert!(matches!(
            reader.required_int("connector_id"),
            Err(ValidationError::InvalidIntegerValue { .. })
        ));
    }

    #[test]
    fn test_missing_required() {
        let schema = schema();
        let tree = AttributeTree::new();
        let reader = FieldReader::new(&tree, &schema);
        assert_eq!(
            reader.required_string("name"),
            Err(ValidationError::missing_required("name"))
        );
    }
}
