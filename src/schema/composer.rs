//! Sub-schema composition.
//!
//! Composition is pure: [`Schema::attach`] consumes a schema and returns an
//! augmented one, and [`compose`] folds a list of [`Attachment`]s over a base
//! schema. Because keys are unique and stored in a map, the order in which
//! attachments are applied does not change the result.

use super::types::{Cardinality, FieldDescriptor, Schema};
use crate::error::{SchemaError, SchemaResult};

/// Produces the attribute schema of a sub-resource.
pub type SubSchemaFactory = fn() -> Schema;

/// A sub-resource to attach under `key`.
#[derive(Debug, Clone, Copy)]
pub struct Attachment {
    pub key: &'static str,
    pub cardinality: Cardinality,
    pub factory: SubSchemaFactory,
}

impl Attachment {
    pub const fn new(key: &'static str, cardinality: Cardinality, factory: SubSchemaFactory) -> Self {
        Self {
            key,
            cardinality,
            factory,
        }
    }
}

impl Schema {
    /// Attach a sub-resource schema under `key`.
    ///
    /// Fails with [`SchemaError::DuplicateKey`] if `key` already exists.
    pub fn attach(
        mut self,
        key: &str,
        cardinality: Cardinality,
        factory: SubSchemaFactory,
    ) -> SchemaResult<Self> {
        if self.contains_key(key) {
            return Err(SchemaError::DuplicateKey {
                key: key.to_string(),
            });
        }
        self.insert(key.to_string(), FieldDescriptor::nested(cardinality, factory()));
        Ok(self)
    }
}

/// Fold `attachments` over `base`.
pub fn compose(base: Schema, attachments: &[Attachment]) -> SchemaResult<Schema> {
    attachments.iter().try_fold(base, |schema, attachment| {
        schema.attach(attachment.key, attachment.cardinality, attachment.factory)
    })
}
