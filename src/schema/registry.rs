//! Schema registry for application variants.
//!
//! The registry owns the base scalar schema and, per [`AppVariant`], the ordered
//! list of sub-resources attached on top of it. It is built once and handed
//! by reference to whatever needs a composite schema; composing is pure, so
//! the same variant always yields the same schema.

use super::composer::{Attachment, SubSchemaFactory, compose};
use super::types::{Cardinality, FieldDescriptor, FieldType, Schema};
use crate::error::{SchemaError, SchemaResult};
use crate::resource::sub_resources::{configuration, parameters, provisioning, sso};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Application protocol variant.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AppVariant {
    #[default]
    Saml,
    Oidc,
}

impl fmt::Display for AppVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Saml => f.write_str("saml"),
            Self::Oidc => f.write_str("oidc"),
        }
    }
}

impl FromStr for AppVariant {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "saml" => Ok(Self::Saml),
            "oidc" => Ok(Self::Oidc),
            _ => Err(SchemaError::UnknownVariant {
                variant: s.to_string(),
            }),
        }
    }
}

/// Scalar attributes shared by every application variant.
pub fn app_schema() -> Schema {
    Schema::new()
        .with_field("name", FieldDescriptor::required(FieldType::String))
        .with_field("connector_id", FieldDescriptor::required(FieldType::Int))
        .with_field("description", FieldDescriptor::optional(FieldType::String))
        .with_field(
            "notes",
            FieldDescriptor::optional(FieldType::String).with_default(""),
        )
        .with_field(
            "visible",
            FieldDescriptor::optional(FieldType::Bool).with_default(true),
        )
        .with_field(
            "allow_assumed_signin",
            FieldDescriptor::optional(FieldType::Bool).with_default(false),
        )
        .with_field("icon_url", FieldDescriptor::computed(FieldType::String))
        .with_field("auth_method", FieldDescriptor::computed(FieldType::Int))
        .with_field("policy_id", FieldDescriptor::computed(FieldType::Int))
        .with_field("tab_id", FieldDescriptor::computed(FieldType::Int))
        .with_field("created_at", FieldDescriptor::computed(FieldType::String))
        .with_field("updated_at", FieldDescriptor::computed(FieldType::String))
}

const SHARED: [Attachment; 2] = [
    Attachment::new(
        provisioning::KEY,
        Cardinality::Singleton,
        provisioning::schema,
    ),
    Attachment::new(parameters::KEY, Cardinality::Repeatable, parameters::schema),
];

/// Registry of composite schemas keyed by variant.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    base: SubSchemaFactory,
    variants: BTreeMap<AppVariant, Vec<Attachment>>,
}

impl SchemaRegistry {
    /// Registry with the SAML and OIDC compositions.
    pub fn new() -> Self {
        let mut registry = Self::empty(app_schema);
        let mut saml = SHARED.to_vec();
        saml.push(Attachment::new(
            configuration::KEY,
            Cardinality::Singleton,
            configuration::saml_schema,
        ));
        saml.push(Attachment::new(sso::KEY, Cardinality::Singleton, sso::saml_schema));
        registry.register(AppVariant::Saml, saml);

        let mut oidc = SHARED.to_vec();
        oidc.push(Attachment::new(
            configuration::KEY,
            Cardinality::Singleton,
            configuration::oidc_schema,
        ));
        oidc.push(Attachment::new(sso::KEY, Cardinality::Singleton, sso::oidc_schema));
        registry.register(AppVariant::Oidc, oidc);
        registry
    }

    /// Registry with only a base schema and no variants.
    pub fn empty(base: SubSchemaFactory) -> Self {
        Self {
            base,
            variants: BTreeMap::new(),
        }
    }

    /// Set the attachments composed for `variant`, replacing any previous list.
    pub fn register(&mut self, variant: AppVariant, attachments: Vec<Attachment>) {
        self.variants.insert(variant, attachments);
    }

    pub fn base_schema(&self) -> Schema {
        (self.base)()
    }

    pub fn variants(&self) -> impl Iterator<Item = AppVariant> + '_ {
        self.variants.keys().copied()
    }

    /// Build the composite schema for `variant`.
    pub fn compose(&self, variant: AppVariant) -> SchemaResult<Schema> {
        let attachments =
            self.variants
                .get(&variant)
                .ok_or_else(|| SchemaError::UnknownVariant {
                    variant: variant.to_string(),
                })?;
        compose(self.base_schema(), attachments)
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
