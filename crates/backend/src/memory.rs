use crate::{BackendError, RecipeBackend};
use recipefinder_model::{Recipe, RecipeListQuery};
use std::path::Path;
use std::sync::Arc;

/// In-memory recipe backend.
///
/// Holds an immutable snapshot ordered newest first.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    recipes: Arc<Vec<Recipe>>,
}

impl MemoryBackend {
    pub fn new(mut recipes: Vec<Recipe>) -> Self {
        // ISO-8601 strings of one format sort chronologically
        recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self {
            recipes: Arc::new(recipes),
        }
    }

    /// Load a corpus from a JSON array of recipes.
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, BackendError> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        let recipes: Vec<Recipe> =
            serde_json::from_str(&raw).map_err(|e| BackendError::ParseError(e.to_string()))?;

        tracing::debug!(
            path = %path.as_ref().display(),
            count = recipes.len(),
            "Loaded recipe corpus"
        );

        Ok(Self::new(recipes))
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

impl RecipeBackend for MemoryBackend {
    async fn fetch_all_recipes(&self) -> Result<Vec<Recipe>, BackendError> {
        Ok(self.recipes.as_ref().clone())
    }

    async fn fetch_recipe_by_id(&self, id: &str) -> Result<Recipe, BackendError> {
        self.recipes
            .iter()
            .find(|recipe| recipe.id == id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(id.to_string()))
    }

    async fn list_recipes(&self, query: &RecipeListQuery) -> Result<Vec<Recipe>, BackendError> {
        let limit = query.limit.unwrap_or(usize::MAX);

        Ok(self
            .recipes
            .iter()
            .filter(|recipe| {
                query
                    .owner
                    .as_deref()
                    .map_or(true, |owner| recipe.user_id == owner)
            })
            .take(limit)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> Result<(), BackendError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
