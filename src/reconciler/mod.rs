//! CRUD reconciliation of an application against the remote service.
//!
//! The configuration engine drives one lifecycle call at a time per resource,
//! handing over a [`ResourceData`] that holds the declarative tree and the
//! identity slot. Each call validates and inflates the tree, issues one
//! remote operation, and writes the flattened result back.
//!
//! # Vanished resources
//!
//! When Read or Update address an identity the remote service reports as not
//! found, the identity slot is cleared and the call succeeds with
//! [`ReconcileOutcome::vanished`] set; the engine will recreate the
//! application on its next apply. Delete treats not found as success.
//!
//! # Example
//!
//! ```rust
//! use saml_app_provider::config::ReconcilerConfig;
//! use saml_app_provider::providers::InMemoryAppService;
//! use saml_app_provider::reconciler::{AppReconciler, ResourceData};
//! use saml_app_provider::resource::AttributeTree;
//! use saml_app_provider::schema::SchemaRegistry;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = SchemaRegistry::new();
//! let reconciler = AppReconciler::new(
//!     InMemoryAppService::new(),
//!     &registry,
//!     ReconcilerConfig::default(),
//! )?;
//!
//! let tree = AttributeTree::from_json(json!({"name": "App1", "connector_id": 5}))?;
//! let mut data = ResourceData::new(tree);
//! reconciler.create(&mut data).await?;
//! assert!(data.id.is_some());
//! # Ok(())
//! # }
//! ```

use crate::config::ReconcilerConfig;
use crate::error::{
    InflateDiagnostic, ReconcileError, ReconcileResult, RemoteOperation, SchemaResult,
};
use crate::providers::{AppService, Lookup};
use crate::resource::{AppId, Application, AttributeTree, Inflated, Inflater, flatten};
use crate::schema::{Schema, SchemaRegistry};
use log::{debug, info, trace, warn};


/// What the configuration engine holds for one application resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceData {
    /// Identity slot; empty until the first successful create
    pub id: Option<AppId>,
    pub attributes: AttributeTree,
}

impl ResourceData {
    /// Resource not yet created remotely.
    pub fn new(attributes: AttributeTree) -> Self {
        Self {
            id: None,
            attributes,
        }
    }

    /// Resource known by a persisted identity.
    pub fn with_id(id: AppId, attributes: AttributeTree) -> Self {
        Self {
            id: Some(id),
            attributes,
        }
    }

    fn vanish(&mut self) {
        self.id = None;
        self.attributes.clear();
    }
}

/// Non-fatal results of a successful lifecycle call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileOutcome {
    /// Repeatable sub-resource members skipped during inflate
    pub diagnostics: Vec<InflateDiagnostic>,
    /// The remote entity no longer exists and the identity slot was cleared
    pub vanished: bool,
}

impl ReconcileOutcome {
    fn vanished() -> Self {
        Self {
            diagnostics: Vec::new(),
            vanished: true,
        }
    }
}

/// Drives create/read/update/delete for one application variant.
#[derive(Debug)]
pub struct AppReconciler<S> {
    service: S,
    schema: Schema,
    config: ReconcilerConfig,
}

impl<S: AppService> AppReconciler<S> {
    /// Reconciler for the variant named in `config`.
    pub fn new(
        service: S,
        registry: &SchemaRegistry,
        config: ReconcilerConfig,
    ) -> SchemaResult<Self> {
        let schema = registry.compose(config.variant)?;
        Ok(Self {
            service,
            schema,
            config,
        })
    }

    /// Composite schema the reconciler validates against.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Validate the desired tree and inflate its writable part.
    fn inflate_desired(&self, data: &ResourceData) -> ReconcileResult<Inflated> {
        self.schema.validate(&data.attributes)?;
        let writable = self.schema.write_mask(&data.attributes);
        let inflated = Inflater::new(&self.schema, self.config.variant)
            .with_policy(self.config.member_failure_policy)
            .inflate(&writable)?;
        Ok(inflated)
    }

    /// Create the application and assign its identity.
    ///
    /// On failure the identity slot is left empty.
    pub async fn create(&self, data: &mut ResourceData) -> ReconcileResult<ReconcileOutcome> {
        let Inflated { app, diagnostics } = self.inflate_desired(data)?;

        let created = self
            .service
            .create_app(&app)
            .await
            .map_err(|e| remote_error(RemoteOperation::Create, None, e))?;
        let id = created.id.ok_or(ReconcileError::MissingIdentity {
            operation: RemoteOperation::Create,
        })?;

        info!("Created app {} ({})", id, created.name);
        data.id = Some(id);

        let mut outcome = self.refresh(data, created).await?;
        outcome.diagnostics = diagnostics;
        Ok(outcome)
    }

    /// Replace the tree with the remote state of the application.
    pub async fn read(&self, data: &mut ResourceData) -> ReconcileResult<ReconcileOutcome> {
        let id = data.id.ok_or(ReconcileError::NoIdentity {
            operation: RemoteOperation::Read,
        })?;

        let lookup = self
            .service
            .get_app(id)
            .await
            .map_err(|e| remote_error(RemoteOperation::Read, Some(id), e))?;

        match lookup {
            Lookup::Found(app) => {
                debug!("Read app {}", id);
                trace!("Read app {}: {:?}", id, app);
                data.attributes = flatten(&app);
                Ok(ReconcileOutcome::default())
            }
            Lookup::NotFound => {
                warn!("App {} no longer exists remotely, clearing identity", id);
                data.vanish();
                Ok(ReconcileOutcome::vanished())
            }
        }
    }

    /// Push the desired tree to the existing application.
    pub async fn update(&self, data: &mut ResourceData) -> ReconcileResult<ReconcileOutcome> {
        let id = data.id.ok_or(ReconcileError::NoIdentity {
            operation: RemoteOperation::Update,
        })?;
        let Inflated { app, diagnostics } = self.inflate_desired(data)?;

        let lookup = self
            .service
            .update_app(id, &app)
            .await
            .map_err(|e| remote_error(RemoteOperation::Update, Some(id), e))?;

        let updated = match lookup {
            Lookup::Found(updated) => updated,
            Lookup::NotFound => {
                warn!("App {} vanished before update, clearing identity", id);
                data.vanish();
                return Ok(ReconcileOutcome {
                    diagnostics,
                    vanished: true,
                });
            }
        };

        let new_id = updated.id.ok_or(ReconcileError::MissingIdentity {
            operation: RemoteOperation::Update,
        })?;
        if new_id != id {
            info!("Updated app {} was reissued as {}", id, new_id);
        } else {
            info!("Updated app {} ({})", id, updated.name);
        }
        data.id = Some(new_id);

        let mut outcome = self.refresh(data, updated).await?;
        outcome.diagnostics = diagnostics;
        Ok(outcome)
    }

    /// Delete the application. Already-missing counts as deleted.
    ///
    /// On error the identity slot is kept so the next cycle retries.
    pub async fn delete(&self, data: &mut ResourceData) -> ReconcileResult<ReconcileOutcome> {
        let id = data.id.ok_or(ReconcileError::NoIdentity {
            operation: RemoteOperation::Delete,
        })?;

        let lookup = self
            .service
            .delete_app(id)
            .await
            .map_err(|e| remote_error(RemoteOperation::Delete, Some(id), e))?;

        match lookup {
            Lookup::Found(()) => info!("Deleted app {}", id),
            Lookup::NotFound => debug!("App {} was already gone", id),
        }
        data.vanish();
        Ok(ReconcileOutcome::default())
    }

    /// Bring computed fields into the tree after a write.
    async fn refresh(
        &self,
        data: &mut ResourceData,
        written: Application,
    ) -> ReconcileResult<ReconcileOutcome> {
        if self.config.refresh_after_write {
            return self.read(data).await;
        }
        data.attributes = flatten(&written);
        Ok(ReconcileOutcome::default())
    }
}

fn remote_error<E>(operation: RemoteOperation, id: Option<AppId>, source: E) -> ReconcileError
where
    E: std::error::Error + Send + Sync + 'static,
{
    let target = id.map_or_else(|| "<unassigned>".to_string(), |id| id.to_string());
    warn!("Remote {} failed for app {}: {}", operation, target, source);
    ReconcileError::Remote {
        operation,
        target,
        source: Box::new(source),
    }
}
