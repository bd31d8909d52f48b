//! Text features for ingredient matching.
//!
//! Provides pure functions used by validation and scoring:
//! - Ingredient normalization
//! - Whitespace tokenization
//! - Fuzzy ingredient matching
//! - Catalog text search

use recipefinder_model::Recipe;

/// Normalize a single ingredient for comparison.
pub fn normalize_ingredient(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Normalize a list of ingredients, dropping blank entries.
///
/// Duplicates are kept.
pub fn normalize_ingredients<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items
        .iter()
        .map(|item| normalize_ingredient(item.as_ref()))
        .filter(|item| !item.is_empty())
        .collect()
}

/// Split an ingredient into whitespace-separated tokens.
pub fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

/// Check whether a user ingredient matches a recipe ingredient.
///
/// Both sides must already be normalized. A match is any of:
/// one contains the other, or a token of either side is a substring
/// of the other side. There is no stemming or edit distance, so
/// "tea" matches "steak", and a blank recipe line matches everything.
pub fn ingredients_match(user: &str, recipe: &str) -> bool {
    if user.is_empty() {
        return false;
    }

    recipe.contains(user)
        || user.contains(recipe)
        || tokens(recipe).any(|token| user.contains(token))
        || tokens(user).any(|token| recipe.contains(token))
}

/// Check whether a recipe mentions `query` in its title, description,
/// category, or any ingredient. `query` must already be lower-cased.
pub fn recipe_mentions(recipe: &Recipe, query: &str) -> bool {
    recipe.title.to_lowercase().contains(query)
        || recipe.description.to_lowercase().contains(query)
        || recipe.category.to_lowercase().contains(query)
        || recipe
            .ingredients
            .iter()
            .any(|ingredient| ingredient.to_lowercase().contains(query))
}
