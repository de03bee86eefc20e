use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::{json, Value};
use std::time::Duration;

use crate::client::error::MealieError;
use crate::config::MealieConfig;

/// Verb-level access to the Mealie API.
///
/// Workflows, merge logic, and the pagination sweep are written against
/// this trait so they can run against a recorded mock in tests.
#[allow(async_fn_in_trait)]
pub trait MealieApi {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, MealieError>;
    async fn post_json(&self, path: &str, body: Value) -> Result<Value, MealieError>;
    async fn put_json(&self, path: &str, body: Value) -> Result<Value, MealieError>;
    async fn patch_json(&self, path: &str, body: Value) -> Result<Value, MealieError>;
    async fn delete_json(&self, path: &str) -> Result<Value, MealieError>;
}

pub struct MealieClient {
    base_url: String,
    client: Client,
}

impl MealieClient {
    pub fn new(config: &MealieConfig) -> Self {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {}", config.api_token);
        if let Ok(value) = HeaderValue::from_str(&bearer) {
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            base_url: config.base_url.clone(),
            client,
        }
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<Value, MealieError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!("{} {} failed with status {}", method, path, status);
            return Err(MealieError::Api {
                status_code: status.as_u16(),
                response_body: text,
            });
        }

        // DELETE and a few mutations answer with an empty body.
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text)
            .map_err(|e| MealieError::InvalidResponse(format!("{}: {}", path, e)))
    }

    /// Probe `/api/app/about` to verify connectivity and the token.
    pub async fn test_connection(&self) -> Result<Value, MealieError> {
        self.get_json("/api/app/about", &[]).await
    }

    pub async fn parse_ingredient(
        &self,
        ingredient: &str,
        parser: &str,
    ) -> Result<Value, MealieError> {
        self.post_json(
            "/api/parser/ingredient",
            json!({ "ingredient": ingredient, "parser": parser }),
        )
        .await
    }

    pub async fn parse_ingredients(
        &self,
        ingredients: &[String],
        parser: &str,
    ) -> Result<Value, MealieError> {
        self.post_json(
            "/api/parser/ingredients",
            json!({ "ingredients": ingredients, "parser": parser }),
        )
        .await
    }

    pub async fn merge_foods(&self, from_id: &str, to_id: &str) -> Result<Value, MealieError> {
        self.post_json(
            "/api/foods/merge",
            json!({ "fromFood": from_id, "toFood": to_id }),
        )
        .await
    }

    pub async fn merge_units(&self, from_id: &str, to_id: &str) -> Result<Value, MealieError> {
        self.post_json(
            "/api/units/merge",
            json!({ "fromUnit": from_id, "toUnit": to_id }),
        )
        .await
    }
}

impl MealieApi for MealieClient {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, MealieError> {
        self.request(Method::GET, path, query, None).await
    }

    async fn post_json(&self, path: &str, body: Value) -> Result<Value, MealieError> {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    async fn put_json(&self, path: &str, body: Value) -> Result<Value, MealieError> {
        self.request(Method::PUT, path, &[], Some(body)).await
    }

    async fn patch_json(&self, path: &str, body: Value) -> Result<Value, MealieError> {
        self.request(Method::PATCH, path, &[], Some(body)).await
    }

    async fn delete_json(&self, path: &str) -> Result<Value, MealieError> {
        self.request(Method::DELETE, path, &[], None).await
    }
}

/// Sweep every page of the recipe index.
///
/// Stops when the accumulated count reaches the reported total, or when a
/// page comes back empty (a stale total must not loop us forever).
pub async fn fetch_all_recipes<A: MealieApi>(api: &A) -> Result<Vec<Value>, MealieError> {
    let mut all = Vec::new();
    let mut page: u64 = 1;

    loop {
        let response = api
            .get_json(
                "/api/recipes",
                &[
                    ("page", page.to_string()),
                    ("perPage", "100".to_string()),
                    ("orderBy", "name".to_string()),
                    ("orderDirection", "asc".to_string()),
                ],
            )
            .await?;

        let items = match response.get("items").and_then(Value::as_array) {
            Some(items) if !items.is_empty() => items.clone(),
            _ => break,
        };
        all.extend(items);

        let total = response.get("total").and_then(Value::as_u64).unwrap_or(0);
        if all.len() as u64 >= total {
            break;
        }
        page += 1;
    }

    Ok(all)
}

/// Resolve organizer names to full objects, creating any that are missing.
///
/// `kind` is the organizer collection, `categories` or `tags`. With
/// `existing = None` the result holds exactly the named organizers
/// (replace mode); with `Some(current)` the result starts from the
/// recipe's current set and only appends (additive mode). Assigning
/// name-only objects would violate the remote's integrity constraints,
/// which is why every name is resolved to its full object first.
pub async fn resolve_organizers<A: MealieApi>(
    api: &A,
    kind: &str,
    names: &[String],
    existing: Option<&[Value]>,
) -> Result<Vec<Value>, MealieError> {
    let path = format!("/api/organizers/{}", kind);
    let catalog = api
        .get_json(&path, &[("perPage", "1000".to_string())])
        .await?;
    let catalog: Vec<Value> = match catalog.get("items").and_then(Value::as_array) {
        Some(items) => items.clone(),
        // Some Mealie versions return a bare array here.
        None => catalog.as_array().cloned().unwrap_or_default(),
    };

    let mut resolved: Vec<Value> = existing.map(|e| e.to_vec()).unwrap_or_default();
    let mut have: Vec<String> = resolved
        .iter()
        .filter_map(|item| item.get("name").and_then(Value::as_str))
        .map(str::to_string)
        .collect();

    for name in names {
        if have.iter().any(|n| n == name) {
            continue;
        }
        let found = catalog
            .iter()
            .find(|item| item.get("name").and_then(Value::as_str) == Some(name.as_str()));
        match found {
            Some(item) => resolved.push(item.clone()),
            None => {
                let created = api.post_json(&path, json!({ "name": name })).await?;
                resolved.push(created);
            }
        }
        have.push(name.clone());
    }

    Ok(resolved)
}
