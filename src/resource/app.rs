//! The typed application record exchanged with the remote identity service.

use super::sub_resources::{AppConfiguration, AppSso, Parameters, Provisioning};
use crate::schema::AppVariant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Identity assigned to an application by the remote service.
///
/// The configuration engine persists it as a string between reconciliation
/// cycles; [`FromStr`] and [`fmt::Display`] convert at that boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(i32);

impl AppId {
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AppId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<i32> for AppId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

/// An identity-provider application.
///
/// Fields fall in three groups: those configuration must supply (`name`,
/// `connector_id`), optional fields the remote service defaults when unset,
/// and server-computed fields that are only ever read back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Application {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AppId>,
    pub name: String,
    pub connector_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_assumed_signin: Option<bool>,

    // Computed by the remote service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_method: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning: Option<Provisioning>,
    #[serde(default, skip_serializing_if = "Parameters::is_empty")]
    pub parameters: Parameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<AppConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sso: Option<AppSso>,
}

impl Application {
    pub fn new(name: impl Into<String>, connector_id: i32) -> Self {
        Self {
            name: name.into(),
            connector_id,
            ..Self::default()
        }
    }

    /// Variant implied by the protocol-specific sub-resources, if any is set.
    pub fn variant(&self) -> Option<AppVariant> {
        self.configuration
            .as_ref()
            .map(AppConfiguration::variant)
            .or_else(|| self.sso.as_ref().map(AppSso::variant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::sub_resources::OidcSso;

    #[test]
    fn test_app_id_parse_and_display() {
        let id: AppId = "42".parse().unwrap();
        assert_eq!(id, AppId::new(42));
        assert_eq!(id.to_string(), "42");
        assert!("".parse::<AppId>().is_err());
    }

    #[test]
    fn test_serialization_omits_unset_fields() {
        let app = Application::new("App1", 5);
        let json = serde_json::to_value(&app).unwrap();
        assert_eq!(json, serde_json::json!({"name": "App1", "connector_id": 5}));
    }

    #[test]
    fn test_variant_from_sso() {
        let mut app = Application::new("App1", 5);
        assert_eq!(app.variant(), None);
        app.sso = Some(AppSso::Oidc(OidcSso::default()));
        assert_eq!(app.variant(), Some(AppVariant::Oidc));
    }
}
