//! Parameter mapping sub-resource.
//!
//! Parameters map local claims onto attributes the identity service sends to
//! the application. They are repeatable and keyed by `param_key_name`; each
//! member is inflated independently so that one malformed mapping does not
//! have to take the rest of the set down with it.

use crate::config::MemberFailurePolicy;
use crate::error::{InflateDiagnostic, ValidationError, ValidationResult};
use crate::resource::reader::FieldReader;
use crate::resource::tree::AttributeTree;
use crate::schema::{FieldDescriptor, FieldType, Schema};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const KEY: &str = "parameters";

const NAME: &str = "param_key_name";

/// A single parameter mapping. Its name is the key it is stored under.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Assigned by the remote service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_attribute_mappings: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_attribute_macros: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes_transformations: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_values: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<String>,
    #[serde(default)]
    pub skip_if_blank: bool,
    #[serde(default)]
    pub provisioned_entitlements: bool,
    #[serde(default)]
    pub safe_entitlements_enabled: bool,
    #[serde(default)]
    pub include_in_saml_assertion: bool,
}

/// Named parameter mappings, ordered by name.
pub type Parameters = BTreeMap<String, Parameter>;

pub fn schema() -> Schema {
    let optional_flag = || FieldDescriptor::optional(FieldType::Bool).with_default(false);
    Schema::new()
        .with_field(NAME, FieldDescriptor::required(FieldType::String))
        .with_field("param_id", FieldDescriptor::computed(FieldType::Int))
        .with_field("label", FieldDescriptor::optional(FieldType::String))
        .with_field(
            "user_attribute_mappings",
            FieldDescriptor::optional(FieldType::String),
        )
        .with_field(
            "user_attribute_macros",
            FieldDescriptor::optional(FieldType::String),
        )
        .with_field(
            "attributes_transformations",
            FieldDescriptor::optional(FieldType::String),
        )
        .with_field("default_values", FieldDescriptor::optional(FieldType::String))
        .with_field("values", FieldDescriptor::optional(FieldType::String))
        .with_field("skip_if_blank", optional_flag())
        .with_field("provisioned_entitlements", optional_flag())
        .with_field("safe_entitlements_enabled", optional_flag())
        .with_field("include_in_saml_assertion", optional_flag())
}

/// Inflate one member into its name and mapping.
pub fn inflate_member(item: &AttributeTree, schema: &Schema) -> ValidationResult<(String, Parameter)> {
    schema.validate(item)?;
    let reader = FieldReader::new(item, schema);
    let name = reader.required_string(NAME)?;
    let parameter = Parameter {
        param_id: None,
        label: reader.string("label")?,
        user_attribute_mappings: reader.string("user_attribute_mappings")?,
        user_attribute_macros: reader.string("user_attribute_macros")?,
        attributes_transformations: reader.string("attributes_transformations")?,
        default_values: reader.string("default_values")?,
        values: reader.string("values")?,
        skip_if_blank: reader.flag("skip_if_blank")?,
        provisioned_entitlements: reader.flag("provisioned_entitlements")?,
        safe_entitlements_enabled: reader.flag("safe_entitlements_enabled")?,
        include_in_saml_assertion: reader.flag("include_in_saml_assertion")?,
    };
    Ok((name, parameter))
}

/// Inflate every member, applying `policy` to members that fail.
///
/// Under [`MemberFailurePolicy::SkipAndDiagnose`] a failing member is left out
/// and reported in the returned diagnostics. A second member with an already
/// used name counts as a failing member.
pub fn inflate_all(
    items: &[AttributeTree],
    schema: &Schema,
    policy: MemberFailurePolicy,
) -> ValidationResult<(Parameters, Vec<InflateDiagnostic>)> {
    let mut parameters = Parameters::new();
    let mut diagnostics = Vec::new();

    for (index, item) in items.iter().enumerate() {
        let outcome = inflate_member(item, schema).and_then(|(name, parameter)| {
            if parameters.contains_key(&name) {
                Err(ValidationError::DuplicateParameter { name })
            } else {
                Ok((name, parameter))
            }
        });

        match outcome {
            Ok((name, parameter)) => {
                parameters.insert(name, parameter);
            }
            Err(cause) => match policy {
                MemberFailurePolicy::FailWhole => return Err(cause.nested(KEY)),
                MemberFailurePolicy::SkipAndDiagnose => {
                    let diagnostic = InflateDiagnostic {
                        key: KEY.to_string(),
                        index,
                        cause,
                    };
                    warn!("Skipping malformed parameter: {}", diagnostic);
                    diagnostics.push(diagnostic);
                }
            },
        }
    }

    Ok((parameters, diagnostics))
}

pub fn flatten(parameters: &Parameters) -> Vec<AttributeTree> {
    parameters
        .iter()
        .map(|(name, parameter)| {
            let mut item = AttributeTree::new();
            item.insert(NAME, name.as_str());
            item.insert_opt("param_id", parameter.param_id);
            item.insert_opt("label", parameter.label.clone());
            item.insert_opt(
                "user_attribute_mappings",
                parameter.user_attribute_mappings.clone(),
            );
            item.insert_opt(
                "user_attribute_macros",
                parameter.user_attribute_macros.clone(),
            );
            item.insert_opt(
                "attributes_transformations",
                parameter.attributes_transformations.clone(),
            );
            item.insert_opt("default_values", parameter.default_values.clone());
            item.insert_opt("values", parameter.values.clone());
            item.insert("skip_if_blank", parameter.skip_if_blank);
            item.insert("provisioned_entitlements", parameter.provisioned_entitlements);
            item.insert("safe_entitlements_enabled", parameter.safe_entitlements_enabled);
            item.insert("include_in_saml_assertion", parameter.include_in_saml_assertion);
            item
        })
        .collect()
}
