//! In-memory application service.
//!
//! Simulates the remote identity service for tests, development and dry runs.
//! It assigns identities, fills the fields the real service computes, and
//! exposes hooks for the situations a reconciler has to survive: entities
//! removed behind its back, transient failures and identities reissued on
//! update.
//!
//! # Example Usage
//!
//! ```rust
//! use saml_app_provider::providers::{AppService, InMemoryAppService, Lookup};
//! use saml_app_provider::resource::Application;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = InMemoryAppService::new();
//! let created = service.create_app(&Application::new("App1", 5)).await?;
//! let id = created.id.expect("service assigns ids");
//!
//! assert!(service.get_app(id).await?.is_found());
//! assert_eq!(service.delete_app(id).await?, Lookup::Found(()));
//! assert_eq!(service.delete_app(id).await?, Lookup::NotFound);
//! # Ok(())
//! # }
//! ```

use super::error::ServiceError;
use super::provider::{AppService, Lookup};
use crate::error::RemoteOperation;
use crate::resource::sub_resources::{
    AppConfiguration, AppSso, OidcSso, Parameters, SamlSso, SsoCertificate,
};
use crate::resource::{AppId, Application};
use crate::schema::AppVariant;
use chrono::Utc;
use log::{debug, trace};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

const DEFAULT_BASE_URL: &str = "https://idp.example.com";

/// Auth method codes reported by the service per variant.
const SAML_AUTH_METHOD: i32 = 2;
const OIDC_AUTH_METHOD: i32 = 8;

#[derive(Debug, Default)]
struct ServiceState {
    apps: HashMap<AppId, Application>,
    last_id: i32,
    last_param_id: i32,
    pending_failures: HashSet<RemoteOperation>,
    reissue_ids_on_update: bool,
    last_payload: Option<Application>,
}

impl ServiceState {
    fn take_failure(&mut self, operation: RemoteOperation) -> Result<(), ServiceError> {
        if self.pending_failures.remove(&operation) {
            debug!("Injected failure for {}", operation);
            return Err(ServiceError::Unavailable { operation });
        }
        Ok(())
    }

    fn next_id(&mut self) -> AppId {
        self.last_id += 1;
        AppId::new(self.last_id)
    }

    /// Keep parameter ids stable by name and number new parameters.
    fn assign_param_ids(&mut self, parameters: &mut Parameters, existing: Option<&Parameters>) {
        for (name, parameter) in parameters.iter_mut() {
            parameter.param_id = match existing.and_then(|e| e.get(name)).and_then(|p| p.param_id) {
                Some(id) => Some(id),
                None => {
                    self.last_param_id += 1;
                    Some(self.last_param_id)
                }
            };
        }
    }
}

/// Thread-safe in-memory stand-in for the remote application API.
#[derive(Debug, Clone)]
pub struct InMemoryAppService {
    state: Arc<RwLock<ServiceState>>,
    base_url: String,
}

impl InMemoryAppService {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Service whose generated URLs start with `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            state: Arc::new(RwLock::new(ServiceState::default())),
            base_url: base_url.into(),
        }
    }

    /// Make the next call of `operation` fail with [`ServiceError::Unavailable`].
    pub async fn fail_next(&self, operation: RemoteOperation) {
        self.state.write().await.pending_failures.insert(operation);
    }

    /// Delete an application out of band, as another administrator would.
    pub async fn remove(&self, id: AppId) -> bool {
        self.state.write().await.apps.remove(&id).is_some()
    }

    /// Assign a fresh identity on every successful update.
    pub async fn set_reissue_ids_on_update(&self, reissue: bool) {
        self.state.write().await.reissue_ids_on_update = reissue;
    }

    /// The application payload most recently received by create or update.
    pub async fn last_payload(&self) -> Option<Application> {
        self.state.read().await.last_payload.clone()
    }

    pub async fn contains(&self, id: AppId) -> bool {
        self.state.read().await.apps.contains_key(&id)
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.apps.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.apps.is_empty()
    }

    /// Build the stored record from a payload, filling computed fields.
    fn materialize(
        &self,
        state: &mut ServiceState,
        payload: &Application,
        id: AppId,
        existing: Option<&Application>,
    ) -> Application {
        let now = Utc::now();
        let mut app = payload.clone();
        app.id = Some(id);
        app.visible.get_or_insert(true);
        app.notes.get_or_insert_with(String::new);
        app.allow_assumed_signin.get_or_insert(false);

        app.icon_url = Some(format!(
            "{}/images/icons/connector_{}.png",
            self.base_url, app.connector_id
        ));
        app.auth_method = app.variant().map(|variant| match variant {
            AppVariant::Saml => SAML_AUTH_METHOD,
            AppVariant::Oidc => OIDC_AUTH_METHOD,
        });
        app.policy_id = existing.and_then(|e| e.policy_id);
        app.tab_id = existing.and_then(|e| e.tab_id);
        app.created_at = Some(existing.and_then(|e| e.created_at).unwrap_or(now));
        app.updated_at = Some(now);

        state.assign_param_ids(&mut app.parameters, existing.map(|e| &e.parameters));
        app.sso = self.sso_for(&app, id);
        app
    }

    fn sso_for(&self, app: &Application, id: AppId) -> Option<AppSso> {
        match app.configuration.as_ref()? {
            AppConfiguration::Saml(saml) => Some(AppSso::Saml(SamlSso {
                metadata_url: Some(format!("{}/saml/metadata/{}", self.base_url, id)),
                acs_url: Some(format!("{}/trust/saml2/http-post/sso/{}", self.base_url, id)),
                sls_url: Some(format!("{}/trust/saml2/http-redirect/slo/{}", self.base_url, id)),
                issuer: Some(format!("{}/saml/metadata/{}", self.base_url, id)),
                certificate: saml.certificate_id.map(|cert_id| SsoCertificate {
                    id: Some(cert_id),
                    name: Some("Standard".to_string()),
                    value: None,
                }),
            })),
            AppConfiguration::Oidc(_) => Some(AppSso::Oidc(OidcSso {
                client_id: Some(format!("app-{}-client", id)),
                client_secret: Some(format!("app-{}-secret", id)),
            })),
        }
    }
}

impl Default for InMemoryAppService {
    fn default() -> Self {
        Self::new()
    }
}

fn check_payload(app: &Application) -> Result<(), ServiceError> {
    if app.name.trim().is_empty() {
        return Err(ServiceError::invalid_data("name cannot be empty"));
    }
    Ok(())
}

impl AppService for InMemoryAppService {
    type Error = ServiceError;

    async fn create_app(&self, app: &Application) -> Result<Application, Self::Error> {
        let mut state = self.state.write().await;
        state.take_failure(RemoteOperation::Create)?;
        check_payload(app)?;
        trace!(
            "Create payload: {}",
            serde_json::to_string(app).unwrap_or_else(|_| "invalid json".to_string())
        );
        state.last_payload = Some(app.clone());

        let id = state.next_id();
        let stored = self.materialize(&mut state, app, id, None);
        state.apps.insert(id, stored.clone());
        debug!("Stored app {} ({})", id, stored.name);
        Ok(stored)
    }

    async fn get_app(&self, id: AppId) -> Result<Lookup<Application>, Self::Error> {
        let mut state = self.state.write().await;
        state.take_failure(RemoteOperation::Read)?;
        Ok(state.apps.get(&id).cloned().into())
    }

    async fn update_app(
        &self,
        id: AppId,
        app: &Application,
    ) -> Result<Lookup<Application>, Self::Error> {
        let mut state = self.state.write().await;
        state.take_failure(RemoteOperation::Update)?;
        check_payload(app)?;
        trace!(
            "Update payload for {}: {}",
            id,
            serde_json::to_string(app).unwrap_or_else(|_| "invalid json".to_string())
        );
        state.last_payload = Some(app.clone());

        let Some(existing) = state.apps.remove(&id) else {
            return Ok(Lookup::NotFound);
        };
        let new_id = if state.reissue_ids_on_update {
            state.next_id()
        } else {
            id
        };
        let stored = self.materialize(&mut state, app, new_id, Some(&existing));
        state.apps.insert(new_id, stored.clone());
        Ok(Lookup::Found(stored))
    }

    async fn delete_app(&self, id: AppId) -> Result<Lookup<()>, Self::Error> {
        let mut state = self.state.write().await;
        state.take_failure(RemoteOperation::Delete)?;
        Ok(state.apps.remove(&id).map(|_| ()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::sub_resources::{Parameter, SamlConfiguration};

    fn saml_app() -> Application {
        let mut app = Application::new("App1", 5);
        app.configuration = Some(AppConfiguration::Saml(SamlConfiguration {
            certificate_id: Some(12),
            ..SamlConfiguration::default()
        }));
        app.parameters
            .insert("email".to_string(), Parameter::default());
        app
    }

    #[tokio::test]
    async fn test_create_fills_computed_fields() {
        let service = InMemoryAppService::new();
        let created = service.create_app(&saml_app()).await.unwrap();

        assert_eq!(created.id, Some(AppId::new(1)));
        assert_eq!(created.auth_method, Some(SAML_AUTH_METHOD));
        assert!(created.icon_url.is_some());
        assert!(created.created_at.is_some());
        assert_eq!(created.visible, Some(true));
        assert_eq!(created.parameters["email"].param_id, Some(1));
        let Some(AppSso::Saml(sso)) = created.sso else {
            panic!("expected SAML sso");
        };
        assert_eq!(sso.certificate.and_then(|c| c.id), Some(12));
    }

    #[tokio::test]
    async fn test_update_keeps_created_at_and_param_ids() {
        let service = InMemoryAppService::new();
        let created = service.create_app(&saml_app()).await.unwrap();
        let id = created.id.unwrap();

        let mut changed = saml_app();
        changed.name = "Renamed".to_string();
        changed
            .parameters
            .insert("groups".to_string(), Parameter::default());
        let updated = service
            .update_app(id, &changed)
            .await
            .unwrap()
            .into_option()
            .unwrap();

        assert_eq!(updated.id, Some(id));
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.parameters["email"].param_id, Some(1));
        assert_eq!(updated.parameters["groups"].param_id, Some(2));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let service = InMemoryAppService::new();
        let outcome = service.update_app(AppId::new(99), &saml_app()).await.unwrap();
        assert_eq!(outcome, Lookup::NotFound);
    }

    #[tokio::test]
    async fn test_reissue_ids_on_update() {
        let service = InMemoryAppService::new();
        service.set_reissue_ids_on_update(true).await;
        let id = service.create_app(&saml_app()).await.unwrap().id.unwrap();
        let updated = service
            .update_app(id, &saml_app())
            .await
            .unwrap()
            .into_option()
            .unwrap();
        assert_ne!(updated.id, Some(id));
        assert!(!service.contains(id).await);
    }

    #[test]
    fn test_injected_failure_is_one_shot() {
        tokio_test::block_on(async {
            let service = InMemoryAppService::new();
            service.fail_next(RemoteOperation::Create).await;
            assert_eq!(
                service.create_app(&saml_app()).await,
                Err(ServiceError::Unavailable {
                    operation: RemoteOperation::Create
                })
            );
            assert!(service.is_empty().await);
            assert!(service.create_app(&saml_app()).await.is_ok());
        });
    }

    #[test]
    fn test_rejects_empty_name() {
        tokio_test::block_on(async {
            let service = InMemoryAppService::new();
            let result = service.create_app(&Application::new("  ", 5)).await;
            assert!(matches!(result, Err(ServiceError::InvalidData { .. })));
        });
    }
}
