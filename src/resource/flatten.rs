//! Typed [`Application`] to declarative tree.
//!
//! Absent optional values are left out of the tree instead of being written
//! as zero values, and absent sub-resources produce no key at all; an absent
//! collection reads the same as an empty one through [`AttributeTree::set`].

use super::app::Application;
use super::sub_resources::{configuration, parameters, provisioning, sso};
use super::tree::AttributeTree;
use chrono::{DateTime, SecondsFormat, Utc};

/// Canonical rendering of server timestamps, e.g. `2024-03-01T12:00:00Z`.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn flatten(app: &Application) -> AttributeTree {
    let mut tree = AttributeTree::new();
    tree.insert("name", app.name.as_str());
    tree.insert("connector_id", app.connector_id);
    tree.insert_opt("description", app.description.clone());
    tree.insert_opt("notes", app.notes.clone());
    tree.insert_opt("visible", app.visible);
    tree.insert_opt("allow_assumed_signin", app.allow_assumed_signin);
    tree.insert_opt("icon_url", app.icon_url.clone());
    tree.insert_opt("auth_method", app.auth_method);
    tree.insert_opt("policy_id", app.policy_id);
    tree.insert_opt("tab_id", app.tab_id);
    tree.insert_opt("created_at", app.created_at.as_ref().map(format_timestamp));
    tree.insert_opt("updated_at", app.updated_at.as_ref().map(format_timestamp));

    if let Some(p) = &app.provisioning {
        tree.insert(provisioning::KEY, vec![provisioning::flatten(p)]);
    }
    if !app.parameters.is_empty() {
        tree.insert(parameters::KEY, parameters::flatten(&app.parameters));
    }
    if let Some(c) = &app.configuration {
        tree.insert(configuration::KEY, vec![configuration::flatten(c)]);
    }
    if let Some(s) = &app.sso {
        tree.insert(sso::KEY, vec![sso::flatten(s)]);
    }

    tree
}
