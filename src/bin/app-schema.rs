//! # Application Schema Printer
//!
//! Prints the composite attribute schema of an application variant as JSON,
//! so the configuration engine side can see exactly which attributes exist,
//! which are required and which are computed by the remote service.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin app-schema saml
//! cargo run --bin app-schema oidc
//! ```
//!
//! Without an argument the SAML schema is printed. Set `RUST_LOG=debug` to
//! log the composition steps.
//!
//! ## Output Example
//!
//! ```text
//! {
//!   "allow_assumed_signin": {
//!     "type": "bool",
//!     "mode": "optional",
//!     "default": false
//!   },
//!   ...
//! }
//! ```

use log::debug;
use saml_app_provider::schema::{AppVariant, SchemaRegistry};
use std::env;
use std::process;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        eprintln!("Usage: {} [saml|oidc]", args[0]);
        process::exit(1);
    }

    let variant = match args.get(1).map(|s| s.parse::<AppVariant>()) {
        None => AppVariant::default(),
        Some(Ok(variant)) => variant,
        Some(Err(e)) => {
            eprintln!("❌ {}", e);
            process::exit(1);
        }
    };

    let registry = SchemaRegistry::new();
    let schema = match registry.compose(variant) {
        Ok(schema) => schema,
        Err(e) => {
            eprintln!("❌ Failed to compose {} schema: {}", variant, e);
            process::exit(1);
        }
    };
    debug!(
        "Composed {} schema with {} top-level attributes",
        variant,
        schema.len()
    );

    match serde_json::to_string_pretty(&schema) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("❌ Failed to serialize schema: {}", e);
            process::exit(1);
        }
    }
}
