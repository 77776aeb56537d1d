//! Protocol configuration sub-resource.
//!
//! The attribute set depends on the application variant: SAML apps carry
//! certificate and assertion settings, OIDC apps carry redirect and token
//! lifetime settings.

use crate::error::ValidationResult;
use crate::resource::reader::FieldReader;
use crate::resource::tree::AttributeTree;
use crate::schema::{AppVariant, FieldDescriptor, FieldType, Schema};
use serde::{Deserialize, Serialize};

pub const KEY: &str = "configuration";

pub const SIGNATURE_ALGORITHMS: [&str; 4] = ["SHA-1", "SHA-256", "SHA-348", "SHA-512"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamlConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OidcConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oidc_application_type: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_endpoint_auth_method: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token_expiration_minutes: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token_expiration_minutes: Option<i32>,
}

/// Variant-specific configuration of an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppConfiguration {
    Saml(SamlConfiguration),
    Oidc(OidcConfiguration),
}

impl AppConfiguration {
    pub fn variant(&self) -> AppVariant {
        match self {
            Self::Saml(_) => AppVariant::Saml,
            Self::Oidc(_) => AppVariant::Oidc,
        }
    }
}

pub fn saml_schema() -> Schema {
    Schema::new()
        .with_field("certificate_id", FieldDescriptor::optional(FieldType::Int))
        .with_field(
            "signature_algorithm",
            FieldDescriptor::optional(FieldType::String)
                .with_default("SHA-1")
                .with_canonical_values(&SIGNATURE_ALGORITHMS),
        )
        .with_field("provider_arn", FieldDescriptor::optional(FieldType::String))
        .with_field("recipient", FieldDescriptor::optional(FieldType::String))
        .with_field("audience", FieldDescriptor::optional(FieldType::String))
}

pub fn oidc_schema() -> Schema {
    let minutes = || FieldDescriptor::optional(FieldType::Int).with_default(1);
    Schema::new()
        .with_field("redirect_uri", FieldDescriptor::optional(FieldType::String))
        .with_field("login_url", FieldDescriptor::optional(FieldType::String))
        .with_field(
            "oidc_application_type",
            FieldDescriptor::optional(FieldType::Int).with_default(0),
        )
        .with_field(
            "token_endpoint_auth_method",
            FieldDescriptor::optional(FieldType::Int).with_default(1),
        )
        .with_field("access_token_expiration_minutes", minutes())
        .with_field("refresh_token_expiration_minutes", minutes())
}

pub fn inflate(
    item: &AttributeTree,
    schema: &Schema,
    variant: AppVariant,
) -> ValidationResult<AppConfiguration> {
    let reader = FieldReader::new(item, schema);
    let configuration = match variant {
        AppVariant::Saml => AppConfiguration::Saml(SamlConfiguration {
            certificate_id: reader.int("certificate_id")?,
            signature_algorithm: reader.string("signature_algorithm")?,
            provider_arn: reader.string("provider_arn")?,
            recipient: reader.string("recipient")?,
            audience: reader.string("audience")?,
        }),
        AppVariant::Oidc => AppConfiguration::Oidc(OidcConfiguration {
            redirect_uri: reader.string("redirect_uri")?,
            login_url: reader.string("login_url")?,
            oidc_application_type: reader.int("oidc_application_type")?,
            token_endpoint_auth_method: reader.int("token_endpoint_auth_method")?,
            access_token_expiration_minutes: reader.int("access_token_expiration_minutes")?,
            refresh_token_expiration_minutes: reader.int("refresh_token_expiration_minutes")?,
        }),
    };
    Ok(configuration)
}

pub fn flatten(configuration: &AppConfiguration) -> AttributeTree {
    let mut item = AttributeTree::new();
    match configuration {
        AppConfiguration::Saml(saml) => {
            item.insert_opt("certificate_id", saml.certificate_id);
            item.insert_opt("signature_algorithm", saml.signature_algorithm.clone());
            item.insert_opt("provider_arn", saml.provider_arn.clone());
            item.insert_opt("recipient", saml.recipient.clone());
            item.insert_opt("audience", saml.audience.clone());
        }
        AppConfiguration::Oidc(oidc) => {
            item.insert_opt("redirect_uri", oidc.redirect_uri.clone());
            item.insert_opt("login_url", oidc.login_url.clone());
            item.insert_opt("oidc_application_type", oidc.oidc_application_type);
            item.insert_opt("token_endpoint_auth_method", oidc.token_endpoint_auth_method);
            item.insert_opt(
                "access_token_expiration_minutes",
                oidc.access_token_expiration_minutes,
            );
            item.insert_opt(
                "refresh_token_expiration_minutes",
                oidc.refresh_token_expiration_minutes,
            );
        }
    }
    item
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_saml_signature_algorithm_default() {
        let item = AttributeTree::from_json(json!({"certificate_id": 17})).unwrap();
        let configuration = inflate(&item, &saml_schema(), AppVariant::Saml).unwrap();
        assert_eq!(
            configuration,
            AppConfiguration::Saml(SamlConfiguration {
                certificate_id: Some(17),
                signature_algorithm: Some("SHA-1".to_string()),
                ..SamlConfiguration::default()
            })
        );
    }

    #[test]
    fn test_oidc_defaults() {
        let item = AttributeTree::from_json(json!({"redirect_uri": "https://app/cb"})).unwrap();
        let AppConfiguration::Oidc(oidc) = inflate(&item, &oidc_schema(), AppVariant::Oidc).unwrap()
        else {
            panic!("expected OIDC configuration");
        };
        assert_eq!(oidc.oidc_application_type, Some(0));
        assert_eq!(oidc.token_endpoint_auth_method, Some(1));
        assert_eq!(oidc.refresh_token_expiration_minutes, Some(1));
    }

    #[test]
    fn test_saml_flatten_inflate() {
        let configuration = AppConfiguration::Saml(SamlConfiguration {
            certificate_id: Some(3),
            signature_algorithm: Some("SHA-256".to_string()),
            provider_arn: None,
            recipient: Some("https://sp.example.com/acs".to_string()),
            audience: Some("urn:sp".to_string()),
        });
        let item = flatten(&configuration);
        assert!(!item.contains_key("provider_arn"));
        assert_eq!(
            inflate(&item, &saml_schema(), AppVariant::Saml).unwrap(),
            configuration
        );
    }
}
