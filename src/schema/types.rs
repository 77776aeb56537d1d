//! Core schema type definitions for application attribute trees.
//!
//! A [`Schema`] maps attribute names to [`FieldDescriptor`]s. Set-valued
//! descriptors carry the nested schema of a sub-resource together with the
//! maximum number of items it may hold.

use crate::resource::tree::{AttributeTree, AttributeValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Declared type of an attribute.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Bool,
    Int,
    /// Collection of nested attribute trees
    Set,
}

impl FieldType {
    /// Type name used in validation messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "boolean",
            Self::Int => "integer",
            Self::Set => "set",
        }
    }

    /// Whether a tree value has this type.
    pub fn accepts(&self, value: &AttributeValue) -> bool {
        matches!(
            (self, value),
            (Self::String, AttributeValue::String(_))
                | (Self::Bool, AttributeValue::Bool(_))
                | (Self::Int, AttributeValue::Int(_))
                | (Self::Set, AttributeValue::Set(_))
        )
    }
}

/// Who owns an attribute's value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldMode {
    /// Must be supplied by configuration
    Required,
    /// May be supplied; the remote service or a declared default fills it otherwise
    Optional,
    /// Assigned by the remote service, never written
    Computed,
}

/// How many items a sub-resource collection may hold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    /// Zero or one item
    Singleton,
    /// Any number of items
    Repeatable,
}

impl Cardinality {
    pub fn max_items(&self) -> Option<usize> {
        match self {
            Self::Singleton => Some(1),
            Self::Repeatable => None,
        }
    }
}

/// Definition of a single attribute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDescriptor {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub mode: FieldMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<AttributeValue>,
    /// Allowed values for string attributes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub canonical_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardinality: Option<Cardinality>,
    /// Nested schema for set-valued attributes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elem: Option<Schema>,
}

impl FieldDescriptor {
    fn scalar(field_type: FieldType, mode: FieldMode) -> Self {
        Self {
            field_type,
            mode,
            default: None,
            canonical_values: Vec::new(),
            cardinality: None,
            elem: None,
        }
    }

    pub fn required(field_type: FieldType) -> Self {
        Self::scalar(field_type, FieldMode::Required)
    }

    pub fn optional(field_type: FieldType) -> Self {
        Self::scalar(field_type, FieldMode::Optional)
    }

    pub fn computed(field_type: FieldType) -> Self {
        Self::scalar(field_type, FieldMode::Computed)
    }

    /// A set-valued attribute holding items of `elem`.
    pub fn nested(cardinality: Cardinality, elem: Schema) -> Self {
        Self {
            field_type: FieldType::Set,
            mode: FieldMode::Optional,
            default: None,
            canonical_values: Vec::new(),
            cardinality: Some(cardinality),
            elem: Some(elem),
        }
    }

    pub fn with_default(mut self, default: impl Into<AttributeValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_canonical_values(mut self, values: &[&str]) -> Self {
        self.canonical_values = values.iter().map(|v| v.to_string()).collect();
        self
    }

    pub fn is_required(&self) -> bool {
        self.mode == FieldMode::Required
    }

    pub fn is_computed(&self) -> bool {
        self.mode == FieldMode::Computed
    }

    pub fn max_items(&self) -> Option<usize> {
        self.cardinality.and_then(|c| c.max_items())
    }

    /// Whether this attribute is ever sent to the remote service.
    ///
    /// A set is writable only if its nested schema has a writable attribute.
    pub fn is_writable(&self) -> bool {
        if self.is_computed() {
            return false;
        }
        match &self.elem {
            Some(elem) => elem.fields().any(|(_, d)| d.is_writable()),
            None => true,
        }
    }
}

/// Attribute schema of an application variant or a sub-resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Schema {
    fields: BTreeMap<String, FieldDescriptor>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion used by schema factories.
    pub fn with_field(mut self, key: impl Into<String>, descriptor: FieldDescriptor) -> Self {
        self.fields.insert(key.into(), descriptor);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.fields.iter().map(|(k, d)| (k.as_str(), d))
    }

    /// Keys that make up the write mask.
    pub fn writable_keys(&self) -> impl Iterator<Item = &str> {
        self.fields()
            .filter(|(_, d)| d.is_writable())
            .map(|(k, _)| k)
    }

    /// Copy of `tree` restricted to writable attributes.
    pub fn write_mask(&self, tree: &AttributeTree) -> AttributeTree {
        let mut masked = tree.clone();
        masked.retain(|key, _| self.get(key).is_some_and(FieldDescriptor::is_writable));
        masked
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn insert(&mut self, key: String, descriptor: FieldDescriptor) {
        self.fields.insert(key, descriptor);
    }
}
