//! Application resource model and the tree transformations.
//!
//! # Key Types
//!
//! - [`AttributeTree`] - Loosely-typed declarative tree from the configuration engine
//! - [`Application`] - Strongly-typed record sent to and returned by the remote service
//! - [`Inflater`] - Tree to application, see [`inflate`]
//! - [`flatten()`] - Application to tree
//!
//! # Examples
//!
//! ```rust
//! use saml_app_provider::resource::{AttributeTree, Inflater, flatten};
//! use saml_app_provider::schema::{AppVariant, SchemaRegistry};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = SchemaRegistry::new().compose(AppVariant::Saml)?;
//! let tree = AttributeTree::from_json(json!({"name": "App1", "connector_id": 5}))?;
//!
//! let app = Inflater::new(&schema, AppVariant::Saml).inflate(&tree)?.app;
//! assert_eq!(app.visible, Some(true));
//!
//! let flat = flatten(&app);
//! assert_eq!(flat.get("name").and_then(|v| v.as_str()), Some("App1"));
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod flatten;
pub mod inflate;
mod reader;
pub mod sub_resources;
pub mod tree;

pub use app::{AppId, Application};
pub use flatten::{flatten, format_timestamp};
pub use inflate::{Inflated, Inflater};
pub use tree::{AttributeTree, AttributeValue};
