//! Declarative tree to typed [`Application`].
//!
//! Inflate performs no I/O. It expects a tree that already passed
//! [`Schema::validate`]; requiredness is still checked so that a tree which
//! skipped validation fails with a [`ValidationError`] rather than producing
//! a half-filled record.
//!
//! Computed attributes are never read, so an inflated application carries
//! nothing the remote service owns.

use super::app::Application;
use super::reader::FieldReader;
use super::sub_resources::{configuration, parameters, provisioning};
use super::tree::AttributeTree;
use crate::config::MemberFailurePolicy;
use crate::error::{InflateDiagnostic, ValidationError, ValidationResult};
use crate::schema::{AppVariant, Schema};

/// Result of a successful inflate.
#[derive(Debug, Clone, PartialEq)]
pub struct Inflated {
    pub app: Application,
    /// Repeatable members skipped under [`MemberFailurePolicy::SkipAndDiagnose`]
    pub diagnostics: Vec<InflateDiagnostic>,
}

/// Converts trees of one application variant into [`Application`]s.
#[derive(Debug, Clone, Copy)]
pub struct Inflater<'a> {
    schema: &'a Schema,
    variant: AppVariant,
    policy: MemberFailurePolicy,
}

impl<'a> Inflater<'a> {
    /// Inflater for `schema`, the composite schema of `variant`.
    pub fn new(schema: &'a Schema, variant: AppVariant) -> Self {
        Self {
            schema,
            variant,
            policy: MemberFailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: MemberFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn inflate(&self, tree: &AttributeTree) -> ValidationResult<Inflated> {
        let reader = FieldReader::new(tree, self.schema);

        let mut app = Application {
            name: reader.required_string("name")?,
            connector_id: reader.required_int("connector_id")?,
            description: reader.string("description")?,
            notes: reader.string("notes")?,
            visible: reader.bool("visible")?,
            allow_assumed_signin: reader.bool("allow_assumed_signin")?,
            ..Application::default()
        };

        app.provisioning = singleton(&reader, provisioning::KEY, provisioning::inflate)?;
        app.configuration = singleton(&reader, configuration::KEY, |item, elem| {
            configuration::inflate(item, elem, self.variant)
        })?;

        let mut diagnostics = Vec::new();
        if let Some(elem) = reader.elem(parameters::KEY) {
            let items = reader.items(parameters::KEY)?;
            let (inflated, skipped) = parameters::inflate_all(items, elem, self.policy)?;
            app.parameters = inflated;
            diagnostics = skipped;
        }

        Ok(Inflated { app, diagnostics })
    }
}

/// Inflate a singleton sub-resource. Zero items leaves it unset.
fn singleton<T>(
    reader: &FieldReader<'_>,
    key: &str,
    inflate: impl Fn(&AttributeTree, &Schema) -> ValidationResult<T>,
) -> ValidationResult<Option<T>> {
    let Some(elem) = reader.elem(key) else {
        return Ok(None);
    };
    match reader.items(key)? {
        [] => Ok(None),
        [item] => inflate(item, elem).map(Some).map_err(|e| e.nested(key)),
        items => Err(ValidationError::TooManyItems {
            attribute: key.to_string(),
            max_items: 1,
            actual: items.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::sub_resources::{AppConfiguration, Provisioning};
    use crate::schema::SchemaRegistry;
    use serde_json::json;

    fn saml_schema() -> Schema {
        SchemaRegistry::new().compose(AppVariant::Saml).unwrap()
    }

    fn tree(value: serde_json::Value) -> AttributeTree {
        AttributeTree::from_json(value).unwrap()
    }

    #[test]
    fn test_inflate_scalars_and_defaults() {
        let schema = saml_schema();
        let inflated = Inflater::new(&schema, AppVariant::Saml)
            .inflate(&tree(json!({"name": "App1", "connector_id": 5})))
            .unwrap();

        let app = inflated.app;
        assert_eq!(app.name, "App1");
        assert_eq!(app.connector_id, 5);
        assert_eq!(app.visible, Some(true));
        assert_eq!(app.notes, Some(String::new()));
        assert_eq!(app.allow_assumed_signin, Some(false));
        assert_eq!(app.description, None);
        assert!(inflated.diagnostics.is_empty());
    }

    #[test]
    fn test_empty_singleton_stays_unset() {
        let schema = saml_schema();
        let inflated = Inflater::new(&schema, AppVariant::Saml)
            .inflate(&tree(json!({
                "name": "App1",
                "connector_id": 5,
                "provisioning": [],
                "configuration": []
            })))
            .unwrap();
        assert_eq!(inflated.app.provisioning, None);
        assert_eq!(inflated.app.configuration, None);
    }

    #[test]
    fn test_configured_singletons() {
        let schema = saml_schema();
        let app = Inflater::new(&schema, AppVariant::Saml)
            .inflate(&tree(json!({
                "name": "App1",
                "connector_id": 5,
                "provisioning": [{"enabled": false}],
                "configuration": [{"certificate_id": 9}]
            })))
            .unwrap()
            .app;
        assert_eq!(app.provisioning, Some(Provisioning { enabled: false }));
        let Some(AppConfiguration::Saml(saml)) = app.configuration else {
            panic!("expected SAML configuration");
        };
        assert_eq!(saml.certificate_id, Some(9));
    }

    #[test]
    fn test_computed_fields_are_ignored() {
        let schema = saml_schema();
        let app = Inflater::new(&schema, AppVariant::Saml)
            .inflate(&tree(json!({
                "name": "App1",
                "connector_id": 5,
                "icon_url": "https://cdn/icon.png",
                "auth_method": 2,
                "sso": [{"issuer": "https://idp"}]
            })))
            .unwrap()
            .app;
        assert_eq!(app.icon_url, None);
        assert_eq!(app.auth_method, None);
        assert_eq!(app.sso, None);
    }

    #[test]
    fn test_nested_error_path() {
        let schema = saml_schema();
        let result = Inflater::new(&schema, AppVariant::Saml).inflate(&tree(json!({
            "name": "App1",
            "connector_id": 5,
            "provisioning": [{}]
        })));
        assert_eq!(
            result,
            Err(ValidationError::missing_required("provisioning.enabled"))
        );
    }

    #[test]
    fn test_policy_fail_whole() {
        let schema = saml_schema();
        let result = Inflater::new(&schema, AppVariant::Saml)
            .with_policy(MemberFailurePolicy::FailWhole)
            .inflate(&tree(json!({
                "name": "App1",
                "connector_id": 5,
                "parameters": [{"label": "nameless"}]
            })));
        assert_eq!(
            result,
            Err(ValidationError::missing_required("parameters.param_key_name"))
        );
    }
}
