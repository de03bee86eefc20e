//! Recipe tools.
//!
//! Creation is a two-step flow dictated by the remote: POST a name-only
//! stub (the response body is the new slug), then PUT the full payload
//! with the server-assigned ids carried over.

use std::future::Future;
use rmcp::{
    handler::server::tool::Parameters, model::CallToolResult, schemars, tool, tool_router,
    ErrorData as McpError,
};
use serde_json::{json, Map, Value};

use crate::client::{resolve_organizers, MealieApi};
use crate::normalize::recipe_summary;
use crate::server::{respond, MealieMcpServer, ToolError};

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct SearchRecipesParams {
    /// Search term matched against names and descriptions
    #[serde(default)]
    pub query: Option<String>,
    /// Tag names to filter by
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Category names to filter by
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    10
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetRecipeParams {
    /// The recipe's URL slug identifier
    pub slug: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ListRecipesParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CreateRecipeParams {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Yield/servings, e.g. "4 servings"
    #[serde(default)]
    pub recipe_yield: Option<String>,
    #[serde(default)]
    pub total_time: Option<String>,
    #[serde(default)]
    pub prep_time: Option<String>,
    #[serde(default)]
    pub cook_time: Option<String>,
    /// Ingredient strings, e.g. ["2 cups flour", "1 tsp salt"]
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
    /// Instruction strings, one per step
    #[serde(default)]
    pub instructions: Option<Vec<String>>,
    /// Tag names to apply (created if missing)
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Category names to apply (created if missing)
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CreateRecipeFromUrlParams {
    /// URL of the recipe page to scrape
    pub url: String,
    /// Whether to keep tags from the scraped page
    #[serde(default)]
    pub include_tags: bool,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct UpdateRecipeParams {
    pub slug: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub recipe_yield: Option<String>,
    #[serde(default)]
    pub total_time: Option<String>,
    #[serde(default)]
    pub prep_time: Option<String>,
    #[serde(default)]
    pub cook_time: Option<String>,
    /// Replaces the existing ingredient list when provided
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
    /// Replaces the existing instruction list when provided
    #[serde(default)]
    pub instructions: Option<Vec<String>>,
    /// Tag names to ADD to the recipe's existing tags
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Category names to ADD to the recipe's existing categories
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub org_url: Option<String>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct DeleteRecipeParams {
    pub slug: String,
}

#[tool_router(router = recipes_router, vis = "pub")]
impl MealieMcpServer {
    #[tool(description = "Search recipes by text query, tags, and categories")]
    async fn recipes_search(
        &self,
        Parameters(params): Parameters<SearchRecipesParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.do_recipes_search(params).await)
    }

    #[tool(description = "Get complete details for a recipe by slug")]
    async fn recipes_get(
        &self,
        Parameters(params): Parameters<GetRecipeParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .client
            .get_json(&format!("/api/recipes/{}", params.slug), &[])
            .await
            .map_err(ToolError::from);
        respond(result)
    }

    #[tool(description = "List recipes with pagination")]
    async fn recipes_list(
        &self,
        Parameters(params): Parameters<ListRecipesParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            let response = self
                .client
                .get_json(
                    "/api/recipes",
                    &[
                        ("page", params.page.to_string()),
                        ("perPage", params.per_page.to_string()),
                    ],
                )
                .await?;

            Ok(json!({
                "page": response.get("page").cloned().unwrap_or(json!(params.page)),
                "per_page": response.get("perPage").cloned().unwrap_or(json!(params.per_page)),
                "total": response.get("total").cloned().unwrap_or(json!(0)),
                "total_pages": response.get("totalPages").cloned().unwrap_or(json!(0)),
                "items": response.get("items").cloned().unwrap_or(json!([])),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Create a new recipe with ingredients, instructions, tags, and categories")]
    async fn recipes_create(
        &self,
        Parameters(params): Parameters<CreateRecipeParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.do_recipes_create(params).await)
    }

    #[tool(description = "Import a recipe by scraping a URL")]
    async fn recipes_create_from_url(
        &self,
        Parameters(params): Parameters<CreateRecipeFromUrlParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            let response = self
                .client
                .post_json(
                    "/api/recipes/create/url",
                    json!({ "url": params.url, "includeTags": params.include_tags }),
                )
                .await?;
            let slug = slug_from_response(&response);

            let recipe = self
                .client
                .get_json(&format!("/api/recipes/{}", slug), &[])
                .await?;

            Ok(json!({
                "success": true,
                "message": "Recipe imported from URL",
                "recipe": {
                    "name": recipe.get("name").cloned().unwrap_or(Value::Null),
                    "slug": recipe.get("slug").cloned().unwrap_or(Value::Null),
                    "id": recipe.get("id").cloned().unwrap_or(Value::Null),
                    "description": recipe.get("description").cloned().unwrap_or(Value::Null),
                    "orgURL": recipe.get("orgURL").cloned().unwrap_or(Value::Null),
                },
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Update a recipe; tags and categories are added to the existing ones")]
    async fn recipes_update(
        &self,
        Parameters(params): Parameters<UpdateRecipeParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.do_recipes_update(params).await)
    }

    #[tool(description = "Delete a recipe by slug")]
    async fn recipes_delete(
        &self,
        Parameters(params): Parameters<DeleteRecipeParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            self.client
                .delete_json(&format!("/api/recipes/{}", params.slug))
                .await?;
            Ok(json!({
                "success": true,
                "message": format!("Recipe '{}' deleted", params.slug),
            }))
        }
        .await;
        respond(result)
    }
}

impl MealieMcpServer {
    async fn do_recipes_search(&self, params: SearchRecipesParams) -> Result<Value, ToolError> {
        let mut query: Vec<(&str, String)> = vec![
            ("perPage", params.limit.to_string()),
            ("page", "1".to_string()),
        ];
        if let Some(q) = &params.query {
            if !q.is_empty() {
                query.push(("search", q.clone()));
            }
        }
        for tag in params.tags.iter().flatten() {
            query.push(("tags", tag.clone()));
        }
        for category in params.categories.iter().flatten() {
            query.push(("categories", category.clone()));
        }

        let response = self.client.get_json("/api/recipes", &query).await?;

        let items = match response.get("items").and_then(Value::as_array) {
            Some(items) => items,
            // Unexpected shape, hand it back untouched.
            None => return Ok(response),
        };

        let recipes: Vec<Value> = items.iter().map(recipe_summary).collect();
        Ok(json!({
            "total": response.get("total").cloned().unwrap_or(json!(recipes.len())),
            "count": recipes.len(),
            "recipes": recipes,
        }))
    }

    async fn do_recipes_create(&self, params: CreateRecipeParams) -> Result<Value, ToolError> {
        let client = &*self.client;

        let created = client
            .post_json("/api/recipes", json!({ "name": params.name }))
            .await?;
        let slug = slug_from_response(&created);
        if slug.is_empty() {
            return Err(ToolError::Unexpected(
                "recipe creation returned no slug".to_string(),
            ));
        }

        let has_updates = params.description.is_some()
            || params.recipe_yield.is_some()
            || params.total_time.is_some()
            || params.prep_time.is_some()
            || params.cook_time.is_some()
            || params.ingredients.is_some()
            || params.instructions.is_some()
            || params.tags.is_some()
            || params.categories.is_some();

        if has_updates {
            let recipe = client.get_json(&format!("/api/recipes/{}", slug), &[]).await?;

            let mut payload = Map::new();
            for key in ["id", "userId", "householdId", "groupId"] {
                payload.insert(key.to_string(), recipe.get(key).cloned().unwrap_or(Value::Null));
            }
            payload.insert("name".to_string(), json!(params.name));
            payload.insert("slug".to_string(), json!(slug));

            for (key, value) in [
                ("description", &params.description),
                ("recipeYield", &params.recipe_yield),
                ("totalTime", &params.total_time),
                ("prepTime", &params.prep_time),
                ("cookTime", &params.cook_time),
            ] {
                if let Some(v) = value {
                    payload.insert(key.to_string(), json!(v));
                }
            }

            if let Some(ingredients) = &params.ingredients {
                payload.insert("recipeIngredient".to_string(), ingredient_notes(ingredients));
            }
            if let Some(instructions) = &params.instructions {
                payload.insert(
                    "recipeInstructions".to_string(),
                    instruction_steps(instructions),
                );
            }

            if let Some(tags) = &params.tags {
                let resolved = resolve_organizers(client, "tags", tags, None).await?;
                payload.insert("tags".to_string(), Value::Array(resolved));
            }
            if let Some(categories) = &params.categories {
                let resolved = resolve_organizers(client, "categories", categories, None).await?;
                payload.insert("recipeCategory".to_string(), Value::Array(resolved));
            }

            client
                .put_json(&format!("/api/recipes/{}", slug), Value::Object(payload))
                .await?;
        }

        let final_recipe = client.get_json(&format!("/api/recipes/{}", slug), &[]).await?;
        Ok(json!({
            "success": true,
            "message": format!("Recipe '{}' created", params.name),
            "recipe": {
                "name": final_recipe.get("name").cloned().unwrap_or(Value::Null),
                "slug": final_recipe.get("slug").cloned().unwrap_or(Value::Null),
                "id": final_recipe.get("id").cloned().unwrap_or(Value::Null),
                "description": final_recipe.get("description").cloned().unwrap_or(Value::Null),
            },
        }))
    }

    async fn do_recipes_update(&self, params: UpdateRecipeParams) -> Result<Value, ToolError> {
        let client = &*self.client;
        let slug = params.slug.clone();

        let recipe = client.get_json(&format!("/api/recipes/{}", slug), &[]).await?;

        // Full payload: the remote rejects partial objects on PUT.
        let mut payload = Map::new();
        for key in ["id", "userId", "householdId", "groupId"] {
            payload.insert(key.to_string(), recipe.get(key).cloned().unwrap_or(Value::Null));
        }
        payload.insert("slug".to_string(), json!(slug));

        for (key, value) in [
            ("name", &params.name),
            ("description", &params.description),
            ("recipeYield", &params.recipe_yield),
            ("totalTime", &params.total_time),
            ("prepTime", &params.prep_time),
            ("cookTime", &params.cook_time),
            ("orgURL", &params.org_url),
        ] {
            let merged = match value {
                Some(v) => json!(v),
                None => recipe.get(key).cloned().unwrap_or(Value::Null),
            };
            payload.insert(key.to_string(), merged);
        }

        match &params.ingredients {
            Some(ingredients) => {
                payload.insert("recipeIngredient".to_string(), ingredient_notes(ingredients));
            }
            None => {
                payload.insert(
                    "recipeIngredient".to_string(),
                    recipe.get("recipeIngredient").cloned().unwrap_or(json!([])),
                );
            }
        }
        match &params.instructions {
            Some(instructions) => {
                payload.insert(
                    "recipeInstructions".to_string(),
                    instruction_steps(instructions),
                );
            }
            None => {
                payload.insert(
                    "recipeInstructions".to_string(),
                    recipe.get("recipeInstructions").cloned().unwrap_or(json!([])),
                );
            }
        }

        let existing_tags = recipe
            .get("tags")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        match &params.tags {
            Some(tags) => {
                let resolved = resolve_organizers(client, "tags", tags, Some(&existing_tags)).await?;
                payload.insert("tags".to_string(), Value::Array(resolved));
            }
            None => {
                payload.insert("tags".to_string(), Value::Array(existing_tags));
            }
        }

        let existing_categories = recipe
            .get("recipeCategory")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        match &params.categories {
            Some(categories) => {
                let resolved =
                    resolve_organizers(client, "categories", categories, Some(&existing_categories))
                        .await?;
                payload.insert("recipeCategory".to_string(), Value::Array(resolved));
            }
            None => {
                payload.insert("recipeCategory".to_string(), Value::Array(existing_categories));
            }
        }

        // Organizer-only updates go through PATCH; the PUT path enforces
        // name validation that trips on untouched recipes.
        let organizer_only = (params.tags.is_some() || params.categories.is_some())
            && params.name.is_none()
            && params.description.is_none()
            && params.recipe_yield.is_none()
            && params.total_time.is_none()
            && params.prep_time.is_none()
            && params.cook_time.is_none()
            && params.ingredients.is_none()
            && params.instructions.is_none()
            && params.org_url.is_none();

        let path = format!("/api/recipes/{}", slug);
        if organizer_only {
            client.patch_json(&path, Value::Object(payload)).await?;
        } else {
            client.put_json(&path, Value::Object(payload)).await?;
        }

        let updated = client.get_json(&path, &[]).await?;
        Ok(json!({
            "success": true,
            "message": format!(
                "Recipe '{}' updated",
                updated.get("name").and_then(Value::as_str).unwrap_or(&slug)
            ),
            "recipe": {
                "name": updated.get("name").cloned().unwrap_or(Value::Null),
                "slug": updated.get("slug").cloned().unwrap_or(Value::Null),
                "id": updated.get("id").cloned().unwrap_or(Value::Null),
                "description": updated.get("description").cloned().unwrap_or(Value::Null),
                "tags": crate::normalize::coerce_name_list(updated.get("tags")),
                "categories": crate::normalize::coerce_name_list(updated.get("recipeCategory")),
            },
        }))
    }
}

/// The stub-creation endpoints answer with the new slug as a bare JSON
/// string; older versions wrap it in an object.
fn slug_from_response(response: &Value) -> String {
    match response {
        Value::String(s) => s.trim_matches('"').to_string(),
        Value::Object(map) => map
            .get("slug")
            .or_else(|| map.get("id"))
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
        _ => String::new(),
    }
}

fn ingredient_notes(ingredients: &[String]) -> Value {
    Value::Array(
        ingredients
            .iter()
            .map(|ing| json!({ "note": ing, "display": ing }))
            .collect(),
    )
}

fn instruction_steps(instructions: &[String]) -> Value {
    Value::Array(
        instructions
            .iter()
            .map(|inst| json!({ "text": inst }))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_comes_back_as_bare_string() {
        assert_eq!(slug_from_response(&json!("tomato-soup")), "tomato-soup");
        assert_eq!(
            slug_from_response(&json!({"slug": "tomato-soup"})),
            "tomato-soup"
        );
        assert_eq!(slug_from_response(&json!(42)), "");
    }

    #[test]
    fn ingredient_strings_become_note_display_pairs() {
        let v = ingredient_notes(&["2 cups flour".to_string()]);
        assert_eq!(v[0]["note"], "2 cups flour");
        assert_eq!(v[0]["display"], "2 cups flour");
    }
}
