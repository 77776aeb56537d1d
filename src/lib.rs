//! Declarative management of SAML and OIDC application resources.
//!
//! Bridges a configuration engine, which speaks loosely typed attribute
//! trees, and a remote identity service, which speaks typed application
//! objects.
//!
//! # Core Components
//!
//! - [`SchemaRegistry`] - Composes the attribute schema of each application variant
//! - [`resource::Inflater`] / [`resource::flatten`] - Tree to object conversion and back
//! - [`AppService`] - Trait for implementing the remote service client
//! - [`AppReconciler`] - Create, read, update and delete lifecycle
//!
//! # Quick Start
//!
//! ```rust
//! use saml_app_provider::{
//!     AppReconciler, AttributeTree, InMemoryAppService, ReconcilerConfig, ResourceData,
//!     SchemaRegistry,
//! };
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reconciler = AppReconciler::new(
//!     InMemoryAppService::new(),
//!     &SchemaRegistry::new(),
//!     ReconcilerConfig::default(),
//! )?;
//!
//! let mut data = ResourceData::new(AttributeTree::from_json(json!({
//!     "name": "App1",
//!     "connector_id": 5,
//!     "configuration": [{"signature_algorithm": "SHA-256"}]
//! }))?);
//! reconciler.create(&mut data).await?;
//! reconciler.read(&mut data).await?;
//! reconciler.delete(&mut data).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod providers;
pub mod reconciler;
pub mod resource;
pub mod schema;

// Re-export commonly used types for convenience
pub use config::{MemberFailurePolicy, ReconcilerConfig};
pub use error::{ReconcileError, ReconcileResult, SchemaError, ValidationError};
pub use providers::{AppService, InMemoryAppService, Lookup};
pub use reconciler::{AppReconciler, ReconcileOutcome, ResourceData};
pub use resource::{AppId, Application, AttributeTree, AttributeValue};
pub use schema::{AppVariant, Schema, SchemaRegistry};
