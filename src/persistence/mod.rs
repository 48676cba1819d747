//! Persistence layer: the credential store abstraction and its backends.
//!
//! Handlers depend only on [`CredentialStore`]; the server wires in
//! [`SqliteCredentialStore`] while tests may substitute
//! [`InMemoryCredentialStore`].

pub mod credential_repo;
pub mod db;
pub mod memory_store;
pub mod schema;

use std::future::Future;
use std::pin::Pin;

use crate::models::credential::CredentialRecord;
use crate::Result;

pub use credential_repo::SqliteCredentialStore;
pub use memory_store::InMemoryCredentialStore;

/// Boxed future returned by [`CredentialStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Durable mapping from platform user identifier to task API secret.
///
/// Implementations must tolerate concurrent readers and upserts from
/// independent requests. Writes to the same key are last-writer-wins.
pub trait CredentialStore: Send + Sync {
    /// Look up the credential stored for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Db`](crate::AppError::Db) if the backend fails.
    fn get<'a>(&'a self, user_id: &'a str) -> StoreFuture<'a, Option<CredentialRecord>>;

    /// Insert or replace the credential for `user_id`.
    ///
    /// The first `created_at` survives a replacement.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Db`](crate::AppError::Db) if the backend fails.
    fn put<'a>(&'a self, user_id: &'a str, secret: &'a str) -> StoreFuture<'a, ()>;

    /// Remove the credential for `user_id`, returning whether one existed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Db`](crate::AppError::Db) if the backend fails.
    fn delete<'a>(&'a self, user_id: &'a str) -> StoreFuture<'a, bool>;

    /// All stored credentials ordered by user identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Db`](crate::AppError::Db) if the backend fails.
    fn list(&self) -> StoreFuture<'_, Vec<CredentialRecord>>;
}
