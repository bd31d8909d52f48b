//! Recipe storage backends.
//!
//! Provides the `RecipeBackend` trait and its implementations:
//! - `FirestoreBackend`: the shared catalog in Cloud Firestore
//! - `MemoryBackend`: an in-memory corpus for tests and offline runs
//!
//! Matching and orchestration only see the trait, so they can be
//! exercised without any network dependency.

mod firestore;
mod memory;

pub use firestore::{FirestoreBackend, FirestoreConfig};
pub use memory::MemoryBackend;

use recipefinder_model::{Recipe, RecipeListQuery};
use std::future::Future;
use thiserror::Error;

/// Errors from backend operations.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Recipe not found: {0}")]
    NotFound(String),

    #[error("Backend not available")]
    Unavailable,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for recipe backends (Firestore, in-memory, etc.)
///
/// Listings are ordered by creation time, newest first.
pub trait RecipeBackend {
    /// Fetch the whole catalog.
    fn fetch_all_recipes(&self) -> impl Future<Output = Result<Vec<Recipe>, BackendError>> + Send;

    /// Fetch a single recipe.
    fn fetch_recipe_by_id(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Recipe, BackendError>> + Send;

    /// Fetch recipes matching a list query.
    fn list_recipes(
        &self,
        query: &RecipeListQuery,
    ) -> impl Future<Output = Result<Vec<Recipe>, BackendError>> + Send;

    /// Check if the backend is healthy.
    fn health_check(&self) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Get the backend name for logging.
    fn name(&self) -> &'static str;
}
