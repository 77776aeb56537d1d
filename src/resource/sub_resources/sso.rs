//! Single sign-on endpoints sub-resource.
//!
//! Every attribute here is assigned by the remote service, so this module
//! only flattens; there is nothing to inflate.

use crate::resource::tree::AttributeTree;
use crate::schema::{AppVariant, Cardinality, FieldDescriptor, FieldType, Schema};
use serde::{Deserialize, Serialize};

pub const KEY: &str = "sso";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SsoCertificate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamlSso {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acs_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sls_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<SsoCertificate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OidcSso {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppSso {
    Saml(SamlSso),
    Oidc(OidcSso),
}

impl AppSso {
    pub fn variant(&self) -> AppVariant {
        match self {
            Self::Saml(_) => AppVariant::Saml,
            Self::Oidc(_) => AppVariant::Oidc,
        }
    }
}

fn certificate_schema() -> Schema {
    Schema::new()
        .with_field("id", FieldDescriptor::computed(FieldType::Int))
        .with_field("name", FieldDescriptor::computed(FieldType::String))
        .with_field("value", FieldDescriptor::computed(FieldType::String))
}

pub fn saml_schema() -> Schema {
    Schema::new()
        .with_field("metadata_url", FieldDescriptor::computed(FieldType::String))
        .with_field("acs_url", FieldDescriptor::computed(FieldType::String))
        .with_field("sls_url", FieldDescriptor::computed(FieldType::String))
        .with_field("issuer", FieldDescriptor::computed(FieldType::String))
        .with_field(
            "certificate",
            FieldDescriptor::nested(Cardinality::Singleton, certificate_schema()),
        )
}

pub fn oidc_schema() -> Schema {
    Schema::new()
        .with_field("client_id", FieldDescriptor::computed(FieldType::String))
        .with_field("client_secret", FieldDescriptor::computed(FieldType::String))
}

pub fn flatten(sso: &AppSso) -> AttributeTree {
    let mut item = AttributeTree::new();
    match sso {
        AppSso::Saml(saml) => {
            item.insert_opt("metadata_url", saml.metadata_url.clone());
            item.insert_opt("acs_url", saml.acs_url.clone());
            item.insert_opt("sls_url", saml.sls_url.clone());
            item.insert_opt("issuer", saml.issuer.clone());
            if let Some(certificate) = &saml.certificate {
                let mut cert = AttributeTree::new();
                cert.insert_opt("id", certificate.id);
                cert.insert_opt("name", certificate.name.clone());
                cert.insert_opt("value", certificate.value.clone());
                if !cert.is_empty() {
                    item.insert("certificate", vec![cert]);
                }
            }
        }
        AppSso::Oidc(oidc) => {
            item.insert_opt("client_id", oidc.client_id.clone());
            item.insert_opt("client_secret", oidc.client_secret.clone());
        }
    }
    item
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sso_is_not_writable() {
        let descriptor = FieldDescriptor::nested(Cardinality::Singleton, saml_schema());
        assert!(!descriptor.is_writable());
    }

    #[test]
    fn test_flatten_saml_certificate() {
        let sso = AppSso::Saml(SamlSso {
            issuer: Some("https://idp.example.com/saml/metadata/9".to_string()),
            certificate: Some(SsoCertificate {
                id: Some(4),
                name: Some("Standard".to_string()),
                value: None,
            }),
            ..SamlSso::default()
        });
        let item = flatten(&sso);
        assert!(!item.contains_key("acs_url"));
        let certificate = &item.set("certificate")[0];
        assert_eq!(certificate.get("id").and_then(|v| v.as_int()), Some(4));
        assert!(!certificate.contains_key("value"));
        assert!(saml_schema().validate(&item).is_ok());
    }

    #[test]
    fn test_empty_certificate_is_omitted() {
        let sso = AppSso::Saml(SamlSso {
            acs_url: Some("https://idp.example.com/trust/saml2/http-post/sso/9".to_string()),
            certificate: Some(SsoCertificate::default()),
            ..SamlSso::default()
        });
        let item = flatten(&sso);
        assert!(!item.contains_key("certificate"));
        assert!(item.set("certificate").is_empty());
    }
}
