//! End-to-end lifecycle tests for application reconciliation.
//!
//! These drive the reconciler the way a configuration engine does across
//! apply cycles: create, refresh, change, refresh again and destroy, with the
//! remote side occasionally changing underneath.

mod common;

use common::{full_saml_app, minimal_app, oidc_app, reconciler, tree};
use saml_app_provider::schema::AppVariant;
use saml_app_provider::{
    AppReconciler, InMemoryAppService, ReconcileError, ReconcilerConfig, ResourceData,
    SchemaRegistry,
};
use serde_json::json;

#[tokio::test]
async fn test_saml_app_full_lifecycle() {
    let reconciler = reconciler(ReconcilerConfig::default());
    let mut data = ResourceData::new(tree(full_saml_app()));

    let created = reconciler.create(&mut data).await.unwrap();
    assert!(created.diagnostics.is_empty());
    let id = data.id.expect("create assigns an identity");

    let state = data.attributes.to_json();
    assert_eq!(state["name"], "Payroll");
    assert_eq!(state["auth_method"], 2);
    assert_eq!(state["configuration"][0]["signature_algorithm"], "SHA-256");
    assert_eq!(state["parameters"].as_array().unwrap().len(), 2);
    assert!(state["sso"][0]["acs_url"].is_string());
    assert_eq!(state["sso"][0]["certificate"][0]["id"], 12);

    // A refreshed tree is accepted back as desired state
    data.attributes.insert("description", "Payroll SSO v2");
    reconciler.update(&mut data).await.unwrap();
    assert_eq!(data.id, Some(id));
    assert_eq!(data.attributes.to_json()["description"], "Payroll SSO v2");

    let read = reconciler.read(&mut data).await.unwrap();
    assert!(!read.vanished);
    assert_eq!(data.attributes.to_json()["created_at"], state["created_at"]);

    reconciler.delete(&mut data).await.unwrap();
    assert_eq!(data.id, None);
    assert!(!reconciler.service().contains(id).await);
}

#[tokio::test]
async fn test_oidc_app_lifecycle() {
    let reconciler = reconciler(ReconcilerConfig::new(AppVariant::Oidc));
    let mut data = ResourceData::new(tree(oidc_app()));

    reconciler.create(&mut data).await.unwrap();

    let state = data.attributes.to_json();
    assert_eq!(state["auth_method"], 8);
    let configuration = &state["configuration"][0];
    assert_eq!(configuration["token_endpoint_auth_method"], 2);
    assert_eq!(configuration["oidc_application_type"], 0);
    assert_eq!(configuration["access_token_expiration_minutes"], 1);
    assert!(state["sso"][0]["client_id"].is_string());

    reconciler.delete(&mut data).await.unwrap();
    assert!(reconciler.service().is_empty().await);
}

#[tokio::test]
async fn test_saml_attributes_rejected_by_oidc_reconciler() {
    let reconciler = reconciler(ReconcilerConfig::new(AppVariant::Oidc));
    let mut data = ResourceData::new(tree(json!({
        "name": "Portal",
        "connector_id": 108419,
        "configuration": [{"signature_algorithm": "SHA-256"}]
    })));

    let result = reconciler.create(&mut data).await;

    assert!(matches!(result, Err(ReconcileError::Validation(_))));
    assert!(reconciler.service().is_empty().await);
}

#[tokio::test]
async fn test_out_of_band_deletion_is_recreated() {
    let reconciler = reconciler(ReconcilerConfig::default());
    let mut data = minimal_app();
    reconciler.create(&mut data).await.unwrap();
    let first = data.id.unwrap();

    reconciler.service().remove(first).await;
    let outcome = reconciler.read(&mut data).await.unwrap();
    assert!(outcome.vanished);
    assert_eq!(data.id, None);

    // Next apply recreates from the desired tree
    let mut desired = minimal_app();
    reconciler.create(&mut desired).await.unwrap();
    assert_ne!(desired.id, Some(first));
    assert_eq!(reconciler.service().len().await, 1);
}

#[tokio::test]
async fn test_identity_survives_reconciler_restart() {
    let service = InMemoryAppService::new();
    let registry = SchemaRegistry::new();

    let first =
        AppReconciler::new(service.clone(), &registry, ReconcilerConfig::default()).unwrap();
    let mut data = minimal_app();
    first.create(&mut data).await.unwrap();
    let id = data.id.unwrap();
    drop(first);

    // Only the identity is persisted between runs
    let second = AppReconciler::new(service, &registry, ReconcilerConfig::default()).unwrap();
    let mut restored = ResourceData::with_id(id, Default::default());
    second.read(&mut restored).await.unwrap();

    assert_eq!(restored.id, Some(id));
    assert_eq!(restored.attributes, data.attributes);
}

#[tokio::test]
async fn test_config_loaded_from_json() {
    let config = ReconcilerConfig::from_json_str(
        r#"{"variant": "oidc", "member_failure_policy": "fail_whole"}"#,
    )
    .unwrap();
    let reconciler = reconciler(config);
    let mut data = ResourceData::new(tree(json!({
        "name": "Portal",
        "connector_id": 108419,
        "parameters": [{"label": "no key"}]
    })));

    let result = reconciler.create(&mut data).await;

    assert!(matches!(result, Err(ReconcileError::Validation(_))));
    assert_eq!(data.id, None);
}
