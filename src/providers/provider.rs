//! Remote identity service trait.
//!
//! This module defines the four typed operations the reconciler needs from
//! the remote service. Wire format, authentication, timeouts and retries
//! belong to the implementation.
//!
//! # Not found
//!
//! Reads, updates and deletes against an identity the service no longer
//! knows are answered with [`Lookup::NotFound`] inside `Ok`, never with an
//! error and never with a default-valued application.

use crate::resource::{AppId, Application};
use std::future::Future;

/// Outcome of an operation addressed to an identity that may no longer exist.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound => None,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Found(value),
            None => Self::NotFound,
        }
    }
}

/// Client for the remote application API.
///
/// Implementations must not create a partial entity when `create_app` fails.
pub trait AppService {
    /// Error type returned by all service operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Create an application.
    ///
    /// # Returns
    /// The stored application, including its assigned identity and any
    /// server-computed fields
    fn create_app(
        &self,
        app: &Application,
    ) -> impl Future<Output = Result<Application, Self::Error>> + Send;

    /// Get an application by identity.
    fn get_app(
        &self,
        id: AppId,
    ) -> impl Future<Output = Result<Lookup<Application>, Self::Error>> + Send;

    /// Replace the writable fields of an application.
    ///
    /// # Returns
    /// The stored application. Its identity may differ from `id` when the
    /// service reissues identities on update.
    fn update_app(
        &self,
        id: AppId,
        app: &Application,
    ) -> impl Future<Output = Result<Lookup<Application>, Self::Error>> + Send;

    /// Delete an application.
    fn delete_app(
        &self,
        id: AppId,
    ) -> impl Future<Output = Result<Lookup<()>, Self::Error>> + Send;
}
