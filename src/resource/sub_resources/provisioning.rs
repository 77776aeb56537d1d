//! Provisioning policy sub-resource.

use crate::error::ValidationResult;
use crate::resource::reader::FieldReader;
use crate::resource::tree::AttributeTree;
use crate::schema::{FieldDescriptor, FieldType, Schema};
use serde::{Deserialize, Serialize};

pub const KEY: &str = "provisioning";

/// Whether user provisioning is enabled for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provisioning {
    pub enabled: bool,
}

pub fn schema() -> Schema {
    Schema::new().with_field("enabled", FieldDescriptor::required(FieldType::Bool))
}

pub fn inflate(item: &AttributeTree, schema: &Schema) -> ValidationResult<Provisioning> {
    let reader = FieldReader::new(item, schema);
    Ok(Provisioning {
        enabled: reader.required_bool("enabled")?,
    })
}

pub fn flatten(provisioning: &Provisioning) -> AttributeTree {
    let mut item = AttributeTree::new();
    item.insert("enabled", provisioning.enabled);
    item
}
