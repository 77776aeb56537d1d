//! Attribute schemas for application variants.
//!
//! This module provides the scalar schema registry, pure sub-schema
//! composition and validation of declarative trees.
//!
//! # Key Types
//!
//! - [`Schema`] - Mapping from attribute name to [`FieldDescriptor`]
//! - [`SchemaRegistry`] - Base schema plus per-variant sub-resource attachments
//! - [`Attachment`] - A sub-resource to attach under a key
//!
//! # Examples
//!
//! ```rust
//! use saml_app_provider::schema::{AppVariant, SchemaRegistry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = SchemaRegistry::new();
//! let schema = registry.compose(AppVariant::Saml)?;
//! assert!(schema.contains_key("configuration"));
//! # Ok(())
//! # }
//! ```

pub mod composer;
pub mod registry;
pub mod types;
pub mod validation;


pub use composer::{Attachment, SubSchemaFactory, compose};
pub use registry::{AppVariant, SchemaRegistry, app_schema};
pub use types::{Cardinality, FieldDescriptor, FieldMode, FieldType, Schema};
