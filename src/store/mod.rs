//! Persistent key-value store abstraction.
//!
//! The [`KeyValueStore`] trait is the only persistence seam the link
//! resolver and cadence engine see. Both treat it as a flat namespace of
//! string keys; neither assumes transactions.

pub mod memory;
pub mod schema;
pub mod sqlite;

use std::future::Future;
use std::pin::Pin;

use crate::Result;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Boxed future returned by [`KeyValueStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Asynchronous, non-transactional string key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`](crate::AppError::Store) if the backend read fails.
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>>;

    /// Store `value` under `key`, replacing any prior value.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`](crate::AppError::Store) if the backend write fails.
    fn set<'a>(&'a self, key: &'a str, value: &'a str) -> StoreFuture<'a, ()>;

    /// Remove `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`](crate::AppError::Store) if the backend delete fails.
    fn remove<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ()>;
}
