//! Recipe generation from ingredients on hand.
//!
//! `RecipeGenerator` validates caller input, fetches the catalog from a
//! `RecipeBackend`, ranks it with the matcher, and reshapes the best
//! results into `MatchedRecipe` records. It also carries the catalog
//! operations the app screens use (search, recent, counts, favorites).

mod catalog;

use recipefinder_backend::{BackendError, RecipeBackend};
use recipefinder_model::MatchedRecipe;
use recipefinder_query::{IngredientQuery, QueryError};
use recipefinder_rerank::{score_recipes, MatchConfig};
use thiserror::Error;

/// Number of suggestions returned by `generate`.
pub const DEFAULT_SUGGESTIONS: usize = 5;

/// Errors surfaced to callers.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The user can fix this (add ingredients, fix the time)
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] QueryError),

    /// The catalog could not be fetched
    #[error("Recipe catalog unavailable: {0}")]
    CorpusUnavailable(#[from] BackendError),
}

impl GenerateError {
    pub fn is_user_fixable(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// Orchestrates matching against a recipe backend.
///
/// Holds no mutable state; concurrent calls each work on their own
/// catalog snapshot.
#[derive(Debug, Clone)]
pub struct RecipeGenerator<B> {
    backend: B,
    config: MatchConfig,
}

impl<B: RecipeBackend> RecipeGenerator<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            config: MatchConfig::default().with_top_n(DEFAULT_SUGGESTIONS),
        }
    }

    pub fn with_config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Suggest up to `config.top_n` recipes for the given ingredients and
    /// time budget in minutes.
    ///
    /// The catalog is fetched once per call. Dropping the returned future
    /// abandons the fetch; no partial result is produced.
    pub async fn generate<S: AsRef<str>>(
        &self,
        ingredients: &[S],
        available_time: i64,
    ) -> Result<Vec<MatchedRecipe>, GenerateError> {
        let query = IngredientQuery::new(ingredients, available_time)?;

        tracing::debug!(
            backend = self.backend.name(),
            ingredients = ?query.ingredients,
            available_time = query.available_time,
            "Generating recipes"
        );

        let corpus = self.backend.fetch_all_recipes().await?;
        let hits = score_recipes(&corpus, &query.ingredients, query.available_time, &self.config);

        tracing::debug!(
            corpus = corpus.len(),
            results = hits.len(),
            "Ranked recipe suggestions"
        );

        Ok(hits.into_iter().map(MatchedRecipe::from).collect())
    }
}
