//! Remote application service seam and bundled implementations.
//!
//! # Available Services
//!
//! * [`AppService`] - The four typed operations the reconciler calls
//! * [`InMemoryAppService`] - Thread-safe in-memory service for testing and development
//!
//! Production clients implement [`AppService`] on top of their own HTTP
//! transport and authentication.

pub mod error;
pub mod in_memory;
pub mod provider;

pub use error::ServiceError;
pub use in_memory::InMemoryAppService;
pub use provider::{AppService, Lookup};
