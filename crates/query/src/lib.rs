//! Query validation and dialect generation.
//!
//! Turns raw caller input into validated queries:
//! - `IngredientQuery`: ingredients on hand plus a time budget
//! - `SearchText`: free-text catalog search
//! - `FirestoreDialect`: `RecipeListQuery` as a Firestore structured query

use recipefinder_features::normalize_ingredients;
use recipefinder_model::RecipeListQuery;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Please add at least one ingredient")]
    NoIngredients,
    #[error("Please enter a valid time (got {0} minutes)")]
    InvalidTime(i64),
    #[error("Empty search text")]
    EmptyQuery,
    #[error("Empty owner id")]
    EmptyOwner,
    #[error("Invalid limit: {0}")]
    InvalidLimit(usize),
}

/// Validated input for recipe generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientQuery {
    /// Trimmed, lower-cased, non-empty ingredients (duplicates kept)
    pub ingredients: Vec<String>,
    /// Time budget in minutes, always positive
    pub available_time: u32,
}

impl IngredientQuery {
    /// Normalize and validate raw user input.
    pub fn new<S: AsRef<str>>(ingredients: &[S], available_time: i64) -> Result<Self, QueryError> {
        let ingredients = normalize_ingredients(ingredients);
        if ingredients.is_empty() {
            return Err(QueryError::NoIngredients);
        }

        let available_time = u32::try_from(available_time)
            .ok()
            .filter(|minutes| *minutes > 0)
            .ok_or(QueryError::InvalidTime(available_time))?;

        Ok(Self {
            ingredients,
            available_time,
        })
    }
}

/// Normalized catalog search text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchText(String);

impl SearchText {
    pub fn parse(text: &str) -> Result<Self, QueryError> {
        let normalized = text.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(QueryError::EmptyQuery);
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Trait for translating list queries to backend-specific syntax.
pub trait QueryDialect {
    /// The output type (usually String or a structured query)
    type Output;

    /// Translate a RecipeListQuery to this dialect
    fn translate(&self, query: &RecipeListQuery) -> Result<Self::Output, QueryError>;
}

/// Firestore `runQuery` structured query generator.
#[derive(Debug, Clone)]
pub struct FirestoreDialect {
    pub collection: String,
}

impl Default for FirestoreDialect {
    fn default() -> Self {
        Self {
            collection: "recipes".to_string(),
        }
    }
}

impl FirestoreDialect {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
        }
    }
}

impl QueryDialect for FirestoreDialect {
    type Output = Value;

    fn translate(&self, query: &RecipeListQuery) -> Result<Value, QueryError> {
        let mut structured = json!({
            "from": [{ "collectionId": self.collection }],
            "orderBy": [{
                "field": { "fieldPath": "createdAt" },
                "direction": "DESCENDING"
            }]
        });

        if let Some(owner) = &query.owner {
            if owner.trim().is_empty() {
                return Err(QueryError::EmptyOwner);
            }
            structured["where"] = json!({
                "fieldFilter": {
                    "field": { "fieldPath": "userId" },
                    "op": "EQUAL",
                    "value": { "stringValue": owner }
                }
            });
        }

        if let Some(limit) = query.limit {
            if limit == 0 || limit > i32::MAX as usize {
                return Err(QueryError::InvalidLimit(limit));
            }
            structured["limit"] = json!(limit);
        }

        Ok(json!({ "structuredQuery": structured }))
    }
}
