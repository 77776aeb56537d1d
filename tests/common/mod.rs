//! Common test utilities for application reconciliation tests.
//!
//! Fixtures build declarative trees the way the configuration engine would
//! hand them over, and `init_logging` wires `env_logger` so `RUST_LOG=debug`
//! shows reconciler output while a test runs.

#![allow(dead_code)]

use saml_app_provider::{
    AppReconciler, AttributeTree, InMemoryAppService, ReconcilerConfig, ResourceData,
    SchemaRegistry,
};
use serde_json::{Value, json};

/// Initialize test logging once per test binary.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn tree(value: Value) -> AttributeTree {
    AttributeTree::from_json(value).expect("fixture must be a JSON object")
}

/// Minimal application: only the required attributes.
pub fn minimal_app() -> ResourceData {
    ResourceData::new(tree(json!({"name": "App1", "connector_id": 5})))
}

/// SAML application with every writable sub-resource populated.
pub fn full_saml_app() -> Value {
    json!({
        "name": "Payroll",
        "connector_id": 110016,
        "description": "Payroll SSO",
        "notes": "owned by finance",
        "visible": true,
        "allow_assumed_signin": false,
        "provisioning": [{"enabled": true}],
        "configuration": [{
            "certificate_id": 12,
            "signature_algorithm": "SHA-256",
            "recipient": "https://payroll.example.com/acs",
            "audience": "payroll"
        }],
        "parameters": [
            {
                "param_key_name": "email",
                "label": "Email",
                "user_attribute_mappings": "email",
                "include_in_saml_assertion": true
            },
            {
                "param_key_name": "groups",
                "label": "Groups",
                "user_attribute_macros": "{groups}",
                "skip_if_blank": true
            }
        ]
    })
}

/// OIDC application with a redirect URI.
pub fn oidc_app() -> Value {
    json!({
        "name": "Portal",
        "connector_id": 108419,
        "configuration": [{
            "redirect_uri": "https://portal.example.com/callback",
            "login_url": "https://portal.example.com/login",
            "token_endpoint_auth_method": 2
        }]
    })
}

pub fn reconciler(config: ReconcilerConfig) -> AppReconciler<InMemoryAppService> {
    init_logging();
    AppReconciler::new(InMemoryAppService::new(), &SchemaRegistry::new(), config)
        .expect("built-in variants always compose")
}
