//! Catalog operations backing the search, home, profile and favorites
//! screens.

use crate::{GenerateError, RecipeGenerator};
use futures::future::join_all;
use recipefinder_backend::{BackendError, RecipeBackend};
use recipefinder_features::recipe_mentions;
use recipefinder_model::{Recipe, RecipeCounts, RecipeListQuery};
use recipefinder_query::{QueryError, SearchText};

impl<B: RecipeBackend> RecipeGenerator<B> {
    /// Recipes mentioning `text` in title, description, category or
    /// ingredients, newest first.
    pub async fn search(&self, text: &str) -> Result<Vec<Recipe>, GenerateError> {
        let query = SearchText::parse(text)?;
        let corpus = self.backend.fetch_all_recipes().await?;

        let results: Vec<Recipe> = corpus
            .into_iter()
            .filter(|recipe| recipe_mentions(recipe, query.as_str()))
            .collect();

        tracing::debug!(query = query.as_str(), results = results.len(), "Searched catalog");
        Ok(results)
    }

    /// The `limit` most recently created recipes.
    pub async fn recent(&self, limit: usize) -> Result<Vec<Recipe>, GenerateError> {
        if limit == 0 {
            return Err(QueryError::InvalidLimit(limit).into());
        }
        Ok(self
            .backend
            .list_recipes(&RecipeListQuery::all().with_limit(limit))
            .await?)
    }

    /// Catalog size and the number of recipes owned by `user_id`.
    pub async fn counts(&self, user_id: &str) -> Result<RecipeCounts, GenerateError> {
        if user_id.trim().is_empty() {
            return Err(QueryError::EmptyOwner.into());
        }

        let total = self.backend.fetch_all_recipes().await?.len();
        let user_recipes = self
            .backend
            .list_recipes(&RecipeListQuery::owned_by(user_id))
            .await?
            .len();

        Ok(RecipeCounts {
            total,
            user_recipes,
        })
    }

    /// Single recipe lookup.
    pub async fn recipe(&self, id: &str) -> Result<Recipe, BackendError> {
        self.backend.fetch_recipe_by_id(id).await
    }

    /// Resolve favorite recipe ids, in the given order.
    ///
    /// Lookups run concurrently. Ids that fail to load (deleted recipes,
    /// transient errors) are skipped.
    pub async fn favorites<S: AsRef<str>>(&self, ids: &[S]) -> Vec<Recipe> {
        let lookups = ids.iter().map(|id| async move {
            let id = id.as_ref();
            match self.backend.fetch_recipe_by_id(id).await {
                Ok(recipe) => Some(recipe),
                Err(e) => {
                    tracing::warn!(id, error = %e, "Failed to load favorite recipe");
                    None
                }
            }
        });

        join_all(lookups).await.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{recipe, OfflineBackend};
    use crate::{GenerateError, RecipeGenerator};
    use pretty_assertions::assert_eq;
    use recipefinder_backend::{BackendError, MemoryBackend};
    use recipefinder_model::{Recipe, RecipeCounts};
    use recipefinder_query::QueryError;

    fn catalog() -> RecipeGenerator<MemoryBackend> {
        let mut banana = recipe("banana-bread", &["3 ripe bananas", "flour", "sugar"], 70, "2024-03-01T00:00:00.000Z")
            .with_owner("u1");
        banana.category = "Baking".to_string();

        let mut soup = recipe("tomato-soup", &["tomatoes", "onion", "stock"], 30, "2024-02-01T00:00:00.000Z")
            .with_owner("u2");
        soup.description = "A quick weeknight bowl".to_string();

        let pasta = recipe("pasta", &["spaghetti", "tomato sauce"], 20, "2024-01-01T00:00:00.000Z").with_owner("u1");

        RecipeGenerator::new(MemoryBackend::new(vec![pasta, soup, banana]))
    }

    fn ids(recipes: &[Recipe]) -> Vec<&str> {
        recipes.iter().map(|r| r.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_search_fields() {
        let generator = catalog();

        assert_eq!(ids(&generator.search("Tomato").await.unwrap()), vec!["tomato-soup", "pasta"]);
        assert_eq!(ids(&generator.search("weeknight").await.unwrap()), vec!["tomato-soup"]);
        assert_eq!(ids(&generator.search(" baking ").await.unwrap()), vec!["banana-bread"]);
        assert!(generator.search("chocolate").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_rejects_blank() {
        let err = catalog().search("   ").await.unwrap_err();
        assert!(matches!(err, GenerateError::InvalidInput(QueryError::EmptyQuery)));
    }

    #[tokio::test]
    async fn test_recent() {
        let generator = catalog();
        assert_eq!(ids(&generator.recent(2).await.unwrap()), vec!["banana-bread", "tomato-soup"]);
        assert_eq!(generator.recent(10).await.unwrap().len(), 3);
        assert!(matches!(
            generator.recent(0).await,
            Err(GenerateError::InvalidInput(QueryError::InvalidLimit(0)))
        ));
    }

    #[tokio::test]
    async fn test_counts() {
        let generator = catalog();
        assert_eq!(
            generator.counts("u1").await.unwrap(),
            RecipeCounts {
                total: 3,
                user_recipes: 2
            }
        );
        assert_eq!(generator.counts("nobody").await.unwrap().user_recipes, 0);
        assert!(matches!(
            generator.counts(" ").await,
            Err(GenerateError::InvalidInput(QueryError::EmptyOwner))
        ));
    }

    #[tokio::test]
    async fn test_recipe_lookup() {
        let generator = catalog();
        assert_eq!(generator.recipe("pasta").await.unwrap().prep_time, 20);
        assert!(matches!(generator.recipe("gone").await, Err(BackendError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_favorites_skip_missing_and_keep_order() {
        let generator = catalog();
        let favorites = generator.favorites(&["pasta", "deleted", "banana-bread"]).await;
        assert_eq!(ids(&favorites), vec!["pasta", "banana-bread"]);
    }

    #[tokio::test]
    async fn test_favorites_backend_down() {
        let generator = RecipeGenerator::new(OfflineBackend);
        assert!(generator.favorites(&["pasta"]).await.is_empty());
    }

    #[tokio::test]
    async fn test_catalog_errors_propagate() {
        let generator = RecipeGenerator::new(OfflineBackend);
        assert!(matches!(
            generator.search("pasta").await,
            Err(GenerateError::CorpusUnavailable(_))
        ));
        assert!(matches!(
            generator.counts("u1").await,
            Err(GenerateError::CorpusUnavailable(_))
        ));
    }
}
