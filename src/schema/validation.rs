//! Validation of declarative trees against a composite schema.
//!
//! This runs before inflate. It covers top-level scalars and the contents of
//! singleton sub-resources; members of repeatable sub-resources are checked
//! by inflate, where the member failure policy decides whether a bad member
//! is skipped or fails the operation.

use super::types::{FieldDescriptor, Schema};
use crate::error::{ValidationError, ValidationResult};
use crate::resource::tree::{AttributeTree, AttributeValue};

impl Schema {
    /// Validate a tree against this schema.
    pub fn validate(&self, tree: &AttributeTree) -> ValidationResult<()> {
        for (key, descriptor) in self.fields() {
            validate_attribute(key, descriptor, tree.get(key))?;
        }

        if let Some(unknown) = tree.keys().find(|key| !self.contains_key(key)) {
            return Err(ValidationError::UnknownAttribute {
                attribute: unknown.to_string(),
            });
        }

        Ok(())
    }
}

/// Validate a single attribute against its descriptor.
fn validate_attribute(
    key: &str,
    descriptor: &FieldDescriptor,
    value: Option<&AttributeValue>,
) -> ValidationResult<()> {
    let Some(value) = value else {
        if descriptor.is_required() {
            return Err(ValidationError::missing_required(key));
        }
        return Ok(());
    };

    if !descriptor.field_type.accepts(value) {
        return Err(ValidationError::invalid_type(
            key,
            descriptor.field_type.type_name(),
            value.type_name(),
        ));
    }

    match value {
        AttributeValue::String(s) if !descriptor.canonical_values.is_empty() => {
            if !descriptor.canonical_values.iter().any(|allowed| allowed == s) {
                return Err(ValidationError::InvalidCanonicalValue {
                    attribute: key.to_string(),
                    value: s.clone(),
                    allowed: descriptor.canonical_values.clone(),
                });
            }
        }
        AttributeValue::Set(items) => {
            if let Some(max_items) = descriptor.max_items() {
                if items.len() > max_items {
                    return Err(ValidationError::TooManyItems {
                        attribute: key.to_string(),
                        max_items,
                        actual: items.len(),
                    });
                }
                if let Some(elem) = &descriptor.elem {
                    for item in items {
                        elem.validate(item).map_err(|e| e.nested(key))?;
                    }
                }
            }
        }
        _ => {}
    }

    Ok(())
}

