//! Error types for schema composition, transformation and reconciliation.
//!
//! The taxonomy follows the reconciliation lifecycle: validation problems are
//! caught before any remote call, remote failures carry the operation and the
//! identity they were issued against, and "not found" is never an error here
//! (see [`crate::providers::Lookup`]).

use std::fmt;

/// Main error type for reconciliation operations.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// The declarative tree does not conform to the composite schema
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Transport, auth or server failure reported by the remote service
    #[error("Remote {operation} failed for app {target}: {source}")]
    Remote {
        operation: RemoteOperation,
        target: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The remote service accepted a write but returned no identity
    #[error("Remote {operation} returned an app without an id")]
    MissingIdentity { operation: RemoteOperation },

    /// A lifecycle call that needs an identity was invoked with an empty slot
    #[error("Cannot {operation} app: no identity assigned")]
    NoIdentity { operation: RemoteOperation },
}

/// The four outbound operations, used for error and log context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOperation {
    Create,
    Read,
    Update,
    Delete,
}

impl fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Validation errors for declarative trees.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Required attribute is missing
    #[error("Required attribute '{attribute}' is missing")]
    MissingRequiredAttribute { attribute: String },

    /// Attribute value doesn't match the declared type
    #[error("Attribute '{attribute}' has invalid type, expected {expected}, got {actual}")]
    InvalidAttributeType {
        attribute: String,
        expected: String,
        actual: String,
    },

    /// Integer does not fit the width the remote service accepts
    #[error("Attribute '{attribute}' has invalid integer value: {value}")]
    InvalidIntegerValue { attribute: String, value: i64 },

    /// Value outside the declared canonical set
    #[error("Attribute '{attribute}' has invalid value '{value}', allowed values: {allowed:?}")]
    InvalidCanonicalValue {
        attribute: String,
        value: String,
        allowed: Vec<String>,
    },

    /// Bounded collection holds more items than its schema allows
    #[error("Attribute '{attribute}' allows at most {max_items} item(s), got {actual}")]
    TooManyItems {
        attribute: String,
        max_items: usize,
        actual: usize,
    },

    /// Unknown attribute in the tree
    #[error("Unknown attribute '{attribute}'")]
    UnknownAttribute { attribute: String },

    /// Two parameter mappings share a name
    #[error("Duplicate parameter '{name}'")]
    DuplicateParameter { name: String },
}

impl ValidationError {
    /// Create a missing required attribute error
    pub fn missing_required(attribute: impl Into<String>) -> Self {
        Self::MissingRequiredAttribute {
            attribute: attribute.into(),
        }
    }

    /// Create an invalid type error
    pub fn invalid_type(
        attribute: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidAttributeType {
            attribute: attribute.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Prefix the attribute path with the enclosing sub-resource key.
    pub(crate) fn nested(self, parent: &str) -> Self {
        let join = |attribute: String| format!("{}.{}", parent, attribute);
        match self {
            Self::MissingRequiredAttribute { attribute } => Self::MissingRequiredAttribute {
                attribute: join(attribute),
            },
            Self::InvalidAttributeType {
                attribute,
                expected,
                actual,
            } => Self::InvalidAttributeType {
                attribute: join(attribute),
                expected,
                actual,
            },
            Self::InvalidIntegerValue { attribute, value } => Self::InvalidIntegerValue {
                attribute: join(attribute),
                value,
            },
            Self::InvalidCanonicalValue {
                attribute,
                value,
                allowed,
            } => Self::InvalidCanonicalValue {
                attribute: join(attribute),
                value,
                allowed,
            },
            Self::TooManyItems {
                attribute,
                max_items,
                actual,
            } => Self::TooManyItems {
                attribute: join(attribute),
                max_items,
                actual,
            },
            Self::UnknownAttribute { attribute } => Self::UnknownAttribute {
                attribute: join(attribute),
            },
            other => other,
        }
    }
}

/// Errors raised while composing schemas.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Attaching a sub-schema under a key that already exists
    #[error("Schema already defines attribute '{key}'")]
    DuplicateKey { key: String },

    /// The registry has no composition for the requested variant
    #[error("No schema registered for variant '{variant}'")]
    UnknownVariant { variant: String },
}

/// A repeatable sub-resource member that was skipped during inflate.
///
/// Diagnostics are warnings: the rest of the tree was inflated and the
/// operation continued without the member.
#[derive(Debug, Clone, PartialEq)]
pub struct InflateDiagnostic {
    /// Sub-resource key the member belongs to
    pub key: String,
    /// Position of the member in the collection
    pub index: usize,
    /// Why the member was rejected
    pub cause: ValidationError,
}

impl fmt::Display for InflateDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "skipped {}[{}]: {}", self.key, self.index, self.cause)
    }
}

pub type ReconcileResult<T> = Result<T, ReconcileError>;
pub type ValidationResult<T> = Result<T, ValidationError>;
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_creation() {
        let error = ValidationError::missing_required("name");
        assert!(error.to_string().contains("name"));
    }

    #[test]
    fn test_error_chain() {
        let validation_error = ValidationError::missing_required("connector_id");
        let error = ReconcileError::from(validation_error);
        assert!(error.to_string().contains("Validation error"));
        assert!(error.to_string().contains("connector_id"));
    }

    #[test]
    fn test_nested_prefixes_attribute_path() {
        let error = ValidationError::missing_required("enabled").nested("provisioning");
        assert_eq!(
            error,
            ValidationError::MissingRequiredAttribute {
                attribute: "provisioning.enabled".to_string()
            }
        );
    }

    #[test]
    fn test_remote_error_carries_context() {
        let source: Box<dyn std::error::Error + Send + Sync> = "connection reset".into();
        let error = ReconcileError::Remote {
            operation: RemoteOperation::Delete,
            target: "42".to_string(),
            source,
        };
        let message = error.to_string();
        assert!(message.contains("delete"));
        assert!(message.contains("42"));
        assert!(message.contains("connection reset"));
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = InflateDiagnostic {
            key: "parameters".to_string(),
            index: 1,
            cause: ValidationError::missing_required("param_key_name"),
        };
        assert!(diagnostic.to_string().starts_with("skipped parameters[1]"));
    }
}
