//! Core domain model for Recipe Finder.
//!
//! This crate defines the fundamental types used throughout the system:
//! - `Recipe`: A recipe as stored in the shared catalog
//! - `ScoredRecipe`: A recipe ranked against the user's ingredients
//! - `MatchedRecipe`: The presentation record returned to callers
//! - `RecipeListQuery`: Parameters for listing recipes from a backend

use serde::{Deserialize, Serialize};

/// A recipe from the shared catalog.
///
/// Owned by the persistence layer; the matching core only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Opaque document identifier
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Category label (e.g., "Breakfast", "Dessert")
    #[serde(default)]
    pub category: String,

    /// Difficulty label (e.g., "Easy", "Medium", "Hard")
    #[serde(default)]
    pub difficulty: String,

    /// Preparation time in minutes
    #[serde(default)]
    pub prep_time: u32,

    #[serde(default = "default_servings")]
    pub servings: u32,

    /// Free-text ingredient lines, in recipe order
    #[serde(default)]
    pub ingredients: Vec<String>,

    /// Free-text instruction steps, in recipe order
    #[serde(default)]
    pub instructions: Vec<String>,

    /// Owner of the recipe
    #[serde(default)]
    pub user_id: String,

    /// Creation timestamp (ISO-8601)
    #[serde(default)]
    pub created_at: String,

    /// Hosted image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

fn default_servings() -> u32 {
    1
}

impl Recipe {
    /// Create a minimal recipe for testing.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            category: String::new(),
            difficulty: String::new(),
            prep_time: 0,
            servings: default_servings(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
            user_id: String::new(),
            created_at: String::new(),
            image_url: None,
        }
    }

    pub fn with_ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients = ingredients.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_prep_time(mut self, minutes: u32) -> Self {
        self.prep_time = minutes;
        self
    }

    pub fn with_owner(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = created_at.into();
        self
    }

    /// Whether the recipe can be prepared within `minutes`.
    pub fn fits_within(&self, minutes: u32) -> bool {
        self.prep_time <= minutes
    }
}

/// A recipe ranked against a set of user ingredients and a time budget.
///
/// Built fresh for every matching call and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecipe {
    /// The recipe being ranked
    pub recipe: Recipe,

    /// Heuristic match score, rounded to 2 decimals (may be negative)
    pub score: f64,

    /// User ingredients found in the recipe, in first-match order
    #[serde(default)]
    pub matched_ingredients: Vec<String>,

    /// Share of user ingredients matched (0-100)
    pub match_percentage: u8,

    /// Recipe ingredients not covered by the match
    pub additional_ingredients: usize,
}

/// A recipe suggestion as handed back to the caller: every recipe field
/// plus the match metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,

    pub match_score: f64,

    pub matched_ingredients: Vec<String>,

    pub match_percentage: u8,

    pub additional_ingredients: usize,
}

impl MatchedRecipe {
    /// Whether any user ingredient matched this recipe.
    pub fn has_ingredient_match(&self) -> bool {
        !self.matched_ingredients.is_empty()
    }
}

impl From<ScoredRecipe> for MatchedRecipe {
    fn from(scored: ScoredRecipe) -> Self {
        Self {
            recipe: scored.recipe,
            match_score: scored.score,
            matched_ingredients: scored.matched_ingredients,
            match_percentage: scored.match_percentage,
            additional_ingredients: scored.additional_ingredients,
        }
    }
}

/// Parameters for listing recipes from a backend.
///
/// Results are always ordered by creation time, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeListQuery {
    /// Only recipes owned by this user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// Maximum number of recipes to return
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl RecipeListQuery {
    /// List the whole catalog.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn owned_by(user_id: impl Into<String>) -> Self {
        Self {
            owner: Some(user_id.into()),
            ..Default::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Catalog size as shown on the home and profile screens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeCounts {
    pub total: usize,
    pub user_recipes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_recipe_wire_names() {
        let recipe = Recipe::new("r1", "Pancakes")
            .with_prep_time(20)
            .with_owner("u1")
            .with_created_at("2024-05-01T10:00:00.000Z");
        let json = serde_json::to_value(&recipe).unwrap();

        assert_eq!(json["prepTime"], 20);
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["createdAt"], "2024-05-01T10:00:00.000Z");
        assert!(json.get("imageUrl").is_none());
    }

    #[test]
    fn test_recipe_defaults_from_sparse_json() {
        let recipe: Recipe = serde_json::from_str(r#"{"id":"r9","title":"Toast"}"#).unwrap();
        assert_eq!(recipe.servings, 1);
        assert!(recipe.ingredients.is_empty());
        assert_eq!(recipe.prep_time, 0);
    }

    #[test]
    fn test_matched_recipe_flattens_recipe_fields() {
        let scored = ScoredRecipe {
            recipe: Recipe::new("r1", "Omelette").with_ingredients(["egg", "milk"]),
            score: 12.5,
            matched_ingredients: vec!["egg".to_string()],
            match_percentage: 100,
            additional_ingredients: 1,
        };
        let json = serde_json::to_value(MatchedRecipe::from(scored)).unwrap();

        assert_eq!(json["title"], "Omelette");
        assert_eq!(json["matchScore"], 12.5);
        assert_eq!(json["matchedIngredients"], serde_json::json!(["egg"]));
        assert_eq!(json["matchPercentage"], 100);
        assert_eq!(json["additionalIngredients"], 1);
    }

    #[test]
    fn test_list_query_builders() {
        let query = RecipeListQuery::owned_by("u1").with_limit(3);
        assert_eq!(query.owner.as_deref(), Some("u1"));
        assert_eq!(query.limit, Some(3));
        assert_eq!(RecipeListQuery::all(), RecipeListQuery::default());
    }
}
