//! Cloud Firestore backend over the REST v1 API.

use crate::{BackendError, RecipeBackend};
use chrono::{SecondsFormat, Utc};
use recipefinder_model::{Recipe, RecipeListQuery};
use recipefinder_query::{FirestoreDialect, QueryDialect};
use serde_json::{Map, Value};

/// Firestore backend configuration.
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// Base URL for the Firestore REST API
    pub base_url: String,
    /// Google Cloud project id
    pub project_id: String,
    /// Database id
    pub database: String,
    /// Collection holding recipe documents
    pub collection: String,
    /// Web API key, sent as the `key` query parameter
    pub api_key: Option<String>,
    /// Firebase ID token, sent as a bearer token
    pub id_token: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            base_url: "https://firestore.googleapis.com/v1".to_string(),
            project_id: String::new(),
            database: "(default)".to_string(),
            collection: "recipes".to_string(),
            api_key: None,
            id_token: None,
            timeout_secs: 30,
        }
    }
}

impl FirestoreConfig {
    fn documents_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.project_id,
            self.database
        )
    }
}

/// Firestore recipe backend.
#[derive(Debug)]
pub struct FirestoreBackend {
    config: FirestoreConfig,
    dialect: FirestoreDialect,
    client: reqwest::Client,
}

impl FirestoreBackend {
    /// Create a new Firestore backend.
    pub fn new(config: FirestoreConfig) -> Result<Self, BackendError> {
        if config.project_id.trim().is_empty() {
            return Err(BackendError::Connection("Firestore project id is not set".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BackendError::Connection(e.to_string()))?;

        Ok(Self {
            dialect: FirestoreDialect::new(config.collection.clone()),
            config,
            client,
        })
    }

    fn run_query_url(&self) -> String {
        format!("{}:runQuery", self.config.documents_url())
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/{}/{}", self.config.documents_url(), self.config.collection, id)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = match &self.config.api_key {
            Some(key) => request.query(&[("key", key)]),
            None => request,
        };
        match &self.config.id_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and decode the JSON body. `resource` names what was
    /// asked for and ends up in `NotFound`.
    async fn send(&self, request: reqwest::RequestBuilder, resource: &str) -> Result<Value, BackendError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| BackendError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body, resource));
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::ParseError(e.to_string()))
    }
}

/// Map a non-success HTTP status to a backend error.
fn status_error(status: reqwest::StatusCode, body: &str, resource: &str) -> BackendError {
    if status == reqwest::StatusCode::NOT_FOUND {
        BackendError::NotFound(resource.to_string())
    } else {
        BackendError::QueryFailed(format!("HTTP {}: {}", status, body))
    }
}

impl RecipeBackend for FirestoreBackend {
    async fn fetch_all_recipes(&self) -> Result<Vec<Recipe>, BackendError> {
        self.list_recipes(&RecipeListQuery::all()).await
    }

    async fn fetch_recipe_by_id(&self, id: &str) -> Result<Recipe, BackendError> {
        if id.trim().is_empty() || id.contains('/') {
            return Err(BackendError::NotFound(id.to_string()));
        }

        let document = self.send(self.client.get(self.document_url(id)), id).await?;
        decode_document(&document)
    }

    async fn list_recipes(&self, query: &RecipeListQuery) -> Result<Vec<Recipe>, BackendError> {
        let body = self
            .dialect
            .translate(query)
            .map_err(|e| BackendError::QueryFailed(e.to_string()))?;

        tracing::debug!(query = %body, "Executing Firestore query");

        let response = self
            .send(self.client.post(self.run_query_url()).json(&body), &self.config.collection)
            .await?;
        let recipes = parse_run_query(&response)?;

        tracing::debug!(count = recipes.len(), "Fetched recipes from Firestore");
        Ok(recipes)
    }

    async fn health_check(&self) -> Result<(), BackendError> {
        let url = format!("{}/{}", self.config.documents_url(), self.config.collection);
        let response = self
            .authorize(self.client.get(url).query(&[("pageSize", "1")]))
            .send()
            .await
            .map_err(|e| BackendError::Connection(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(BackendError::Unavailable)
        }
    }

    fn name(&self) -> &'static str {
        "firestore"
    }
}

/// Parse a `runQuery` response into recipes.
///
/// The response is a JSON array; entries without a `document` (for example
/// a lone `readTime` on an empty result) are skipped.
fn parse_run_query(response: &Value) -> Result<Vec<Recipe>, BackendError> {
    let entries = response
        .as_array()
        .ok_or_else(|| BackendError::ParseError("Expected a JSON array".to_string()))?;

    entries
        .iter()
        .filter_map(|entry| entry.get("document"))
        .map(decode_document)
        .collect()
}

/// Decode a Firestore document into a recipe.
fn decode_document(document: &Value) -> Result<Recipe, BackendError> {
    let name = document
        .get("name")
        .and_then(|n| n.as_str())
        .ok_or_else(|| BackendError::ParseError("Missing document name".to_string()))?;

    let id = name.rsplit('/').next().unwrap_or(name).to_string();

    let empty = Map::new();
    let fields = document
        .get("fields")
        .and_then(|f| f.as_object())
        .unwrap_or(&empty);

    Ok(Recipe {
        id,
        title: string_field(fields, "title").unwrap_or_default(),
        description: string_field(fields, "description").unwrap_or_default(),
        category: string_field(fields, "category").unwrap_or_default(),
        difficulty: string_field(fields, "difficulty").unwrap_or_default(),
        prep_time: integer_field(fields, "prepTime").unwrap_or(0),
        servings: integer_field(fields, "servings").unwrap_or(1),
        ingredients: string_array_field(fields, "ingredients"),
        instructions: string_array_field(fields, "instructions"),
        user_id: string_field(fields, "userId").unwrap_or_default(),
        created_at: timestamp_field(fields, "createdAt")
            .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        image_url: string_field(fields, "imageUrl"),
    })
}

fn string_value(value: &Value) -> Option<String> {
    value
        .get("stringValue")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(string_value)
}

/// Integers arrive as decimal strings; numbers saved from JavaScript may
/// arrive as doubles instead.
fn integer_field(fields: &Map<String, Value>, key: &str) -> Option<u32> {
    let value = fields.get(key)?;

    let number = value
        .get("integerValue")
        .and_then(|v| v.as_str().and_then(|s| s.parse::<i64>().ok()).or_else(|| v.as_i64()))
        .or_else(|| {
            value
                .get("doubleValue")
                .and_then(|v| v.as_f64())
                .map(|f| f.round() as i64)
        })?;

    Some(number.clamp(0, i64::from(u32::MAX)) as u32)
}

fn string_array_field(fields: &Map<String, Value>, key: &str) -> Vec<String> {
    fields
        .get(key)
        .and_then(|v| v.get("arrayValue"))
        .and_then(|a| a.get("values"))
        .and_then(|v| v.as_array())
        .map(|values| values.iter().filter_map(string_value).collect())
        .unwrap_or_default()
}

fn timestamp_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    let value = fields.get(key)?;
    value
        .get("timestampValue")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .or_else(|| string_value(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn pancake_document() -> Value {
        json!({
            "name": "projects/demo/databases/(default)/documents/recipes/abc123",
            "fields": {
                "title": { "stringValue": "Pancakes" },
                "description": { "stringValue": "Fluffy" },
                "category": { "stringValue": "Breakfast" },
                "difficulty": { "stringValue": "Easy" },
                "prepTime": { "integerValue": "20" },
                "servings": { "doubleValue": 4.0 },
                "ingredients": { "arrayValue": { "values": [
                    { "stringValue": "egg" },
                    { "stringValue": "milk" },
                    { "stringValue": "flour" }
                ] } },
                "instructions": { "arrayValue": {} },
                "userId": { "stringValue": "u1" },
                "createdAt": { "timestampValue": "2024-05-01T10:00:00.123Z" }
            },
            "createTime": "2024-05-01T10:00:00.123Z"
        })
    }

    #[test]
    fn test_decode_document() {
        let recipe = decode_document(&pancake_document()).unwrap();

        assert_eq!(recipe.id, "abc123");
        assert_eq!(recipe.title, "Pancakes");
        assert_eq!(recipe.prep_time, 20);
        assert_eq!(recipe.servings, 4);
        assert_eq!(recipe.ingredients, vec!["egg", "milk", "flour"]);
        assert!(recipe.instructions.is_empty());
        assert_eq!(recipe.user_id, "u1");
        assert_eq!(recipe.created_at, "2024-05-01T10:00:00.123Z");
        assert_eq!(recipe.image_url, None);
    }

    #[test]
    fn test_decode_missing_created_at_falls_back_to_now() {
        let recipe = decode_document(&json!({
            "name": "projects/demo/databases/(default)/documents/recipes/x",
            "fields": { "prepTime": { "integerValue": "-4" } }
        }))
        .unwrap();

        assert_eq!(recipe.prep_time, 0);
        assert_eq!(recipe.servings, 1);
        assert!(recipe.created_at.ends_with('Z'));
    }

    #[test]
    fn test_decode_requires_name() {
        assert!(matches!(
            decode_document(&json!({ "fields": {} })),
            Err(BackendError::ParseError(_))
        ));
    }

    #[test]
    fn test_parse_run_query_skips_read_time_entries() {
        let response = json!([
            { "document": pancake_document(), "readTime": "2024-05-02T00:00:00Z" },
            { "readTime": "2024-05-02T00:00:00Z" }
        ]);
        let recipes = parse_run_query(&response).unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].id, "abc123");
    }

    #[test]
    fn test_parse_run_query_rejects_object() {
        assert!(matches!(
            parse_run_query(&json!({ "error": "nope" })),
            Err(BackendError::ParseError(_))
        ));
    }

    #[test]
    fn test_urls() {
        let backend = FirestoreBackend::new(FirestoreConfig {
            project_id: "demo".to_string(),
            base_url: "http://localhost:8080/v1/".to_string(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            backend.run_query_url(),
            "http://localhost:8080/v1/projects/demo/databases/(default)/documents:runQuery"
        );
        assert_eq!(
            backend.document_url("abc"),
            "http://localhost:8080/v1/projects/demo/databases/(default)/documents/recipes/abc"
        );
    }

    #[test]
    fn test_status_error_maps_not_found() {
        assert!(matches!(
            status_error(reqwest::StatusCode::NOT_FOUND, "", "abc"),
            BackendError::NotFound(id) if id == "abc"
        ));
    }

    #[test]
    fn test_status_error_keeps_body_for_other_failures() {
        match status_error(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "boom", "abc") {
            BackendError::QueryFailed(message) => {
                assert_eq!(message, "HTTP 500 Internal Server Error: boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            status_error(reqwest::StatusCode::FORBIDDEN, "", "recipes"),
            BackendError::QueryFailed(_)
        ));
    }

    #[test]
    fn test_requires_project_id() {
        assert!(matches!(
            FirestoreBackend::new(FirestoreConfig::default()),
            Err(BackendError::Connection(_))
        ));
    }
}
