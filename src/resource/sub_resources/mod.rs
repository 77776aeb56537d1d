//! Sub-resources attached to the application schema.
//!
//! Each module follows the same shape: a `KEY` it is attached under, one or
//! more schema factories, and the inflate/flatten pair for its items.

pub mod configuration;
pub mod parameters;
pub mod provisioning;
pub mod sso;

pub use configuration::{AppConfiguration, OidcConfiguration, SamlConfiguration};
pub use parameters::{Parameter, Parameters};
pub use provisioning::Provisioning;
pub use sso::{AppSso, OidcSso, SamlSso, SsoCertificate};
