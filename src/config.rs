//! Reconciler configuration.
//!
//! # Example Usage
//!
//! ```rust
//! use saml_app_provider::config::{MemberFailurePolicy, ReconcilerConfig};
//! use saml_app_provider::schema::AppVariant;
//!
//! let config = ReconcilerConfig::from_json_str(r#"{"variant": "oidc"}"#).unwrap();
//! assert_eq!(config.variant, AppVariant::Oidc);
//! assert_eq!(config.member_failure_policy, MemberFailurePolicy::SkipAndDiagnose);
//! assert!(config.refresh_after_write);
//! ```

use crate::schema::AppVariant;
use serde::{Deserialize, Serialize};

/// What inflate does with a repeatable sub-resource member it cannot read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberFailurePolicy {
    /// Leave the member out and report an [`crate::error::InflateDiagnostic`]
    #[default]
    SkipAndDiagnose,
    /// Fail the whole inflate
    FailWhole,
}

/// Settings for one [`crate::reconciler::AppReconciler`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    /// Which composite schema the reconciler works against
    pub variant: AppVariant,
    pub member_failure_policy: MemberFailurePolicy,
    /// Re-read the application after create/update to pick up computed fields
    pub refresh_after_write: bool,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            variant: AppVariant::Saml,
            member_failure_policy: MemberFailurePolicy::SkipAndDiagnose,
            refresh_after_write: true,
        }
    }
}

impl ReconcilerConfig {
    pub fn new(variant: AppVariant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    pub fn with_member_failure_policy(mut self, policy: MemberFailurePolicy) -> Self {
        self.member_failure_policy = policy;
        self
    }

    pub fn with_refresh_after_write(mut self, refresh: bool) -> Self {
        self.refresh_after_write = refresh;
        self
    }

    /// Parse a configuration; missing keys take their defaults.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
