//! Shopping list tools and the meal-plan-driven list workflows.
//!
//! The multi-step workflows (generate from meal plan, bulk add, clear
//! checked) are free functions over [`MealieApi`] so their request
//! sequencing can be verified without a live gateway.

use chrono::{Duration, NaiveDate};
use std::future::Future;
use rmcp::{
    handler::server::tool::Parameters, model::CallToolResult, schemars, tool, tool_router,
    ErrorData as McpError,
};
use serde_json::{json, Map, Value};

use crate::client::MealieApi;
use crate::normalize::{coerce_name_field, entry_list};
use crate::server::{respond, MealieMcpServer, ToolError};

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetShoppingListParams {
    pub list_id: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CreateShoppingListParams {
    pub name: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct DeleteShoppingListParams {
    pub list_id: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct AddShoppingItemParams {
    pub list_id: String,
    /// Text description of the item (simplest way to add one)
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub quantity: Option<f64>,
    /// Unit ID from the unit catalog
    #[serde(default)]
    pub unit_id: Option<String>,
    /// Food ID from the food catalog
    #[serde(default)]
    pub food_id: Option<String>,
    #[serde(default)]
    pub display: Option<String>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct AddBulkItemsParams {
    pub list_id: String,
    /// Item descriptions, one list entry per item
    pub items: Vec<String>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CheckItemParams {
    pub item_id: String,
    /// True marks the item purchased, false unchecks it
    #[serde(default = "default_checked")]
    pub checked: bool,
}

fn default_checked() -> bool {
    true
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct DeleteItemParams {
    pub item_id: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct AddRecipeParams {
    pub list_id: String,
    pub recipe_id: String,
    /// Scale factor for ingredient quantities
    #[serde(default)]
    pub scale: Option<f64>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GenerateFromMealplanParams {
    /// Start date in YYYY-MM-DD format (defaults to today)
    #[serde(default)]
    pub start_date: Option<String>,
    /// End date in YYYY-MM-DD format (defaults to 6 days after start)
    #[serde(default)]
    pub end_date: Option<String>,
    /// Name for the new list (defaults to "Meal Plan - {range}")
    #[serde(default)]
    pub list_name: Option<String>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ClearCheckedParams {
    pub list_id: String,
}

fn list_items(list: &Value) -> Vec<Value> {
    list.get("listItems")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

fn list_overview(list: &Value) -> Value {
    let items = list_items(list);
    let checked = items
        .iter()
        .filter(|i| i.get("checked").and_then(Value::as_bool).unwrap_or(false))
        .count();
    json!({
        "id": list.get("id").cloned().unwrap_or(Value::Null),
        "name": list.get("name").cloned().unwrap_or(Value::Null),
        "created_at": list.get("createdAt").cloned().unwrap_or(Value::Null),
        "updated_at": list.get("updateAt").cloned().unwrap_or(Value::Null),
        "total_items": items.len(),
        "checked_items": checked,
        "unchecked_items": items.len() - checked,
    })
}

fn formatted_item(item: &Value) -> Value {
    json!({
        "id": item.get("id").cloned().unwrap_or(Value::Null),
        "checked": item.get("checked").and_then(Value::as_bool).unwrap_or(false),
        "quantity": item.get("quantity").cloned().unwrap_or(Value::Null),
        "unit": coerce_name_field(item.get("unit")),
        "food": coerce_name_field(item.get("food")),
        "note": item.get("note").cloned().unwrap_or(Value::Null),
        "display": item.get("display").cloned().unwrap_or(Value::Null),
    })
}

/// Add each description as its own item, continuing past failures.
pub async fn add_bulk_items<A: MealieApi>(
    api: &A,
    list_id: &str,
    items: &[String],
) -> Result<Value, ToolError> {
    let mut added_count = 0usize;
    let mut errors = Vec::new();

    for item_text in items {
        let payload = json!({ "shoppingListId": list_id, "note": item_text });
        match api
            .post_json("/api/households/shopping/items", payload)
            .await
        {
            Ok(_) => added_count += 1,
            Err(e) => errors.push(json!({ "item": item_text, "error": e.to_string() })),
        }
    }

    let mut result = json!({
        "success": true,
        "message": format!("Added {} of {} items", added_count, items.len()),
        "added_count": added_count,
        "total_requested": items.len(),
    });
    if !errors.is_empty() {
        result["errors"] = Value::Array(errors);
    }
    Ok(result)
}

/// Delete every checked item on a list, continuing past failures.
pub async fn clear_checked_items<A: MealieApi>(
    api: &A,
    list_id: &str,
) -> Result<Value, ToolError> {
    let list = api
        .get_json(&format!("/api/households/shopping/lists/{}", list_id), &[])
        .await?;
    if list.is_null() {
        return Err(ToolError::Validation(format!(
            "Shopping list '{}' not found",
            list_id
        )));
    }

    let checked: Vec<Value> = list_items(&list)
        .into_iter()
        .filter(|i| i.get("checked").and_then(Value::as_bool).unwrap_or(false))
        .collect();

    if checked.is_empty() {
        return Ok(json!({
            "success": true,
            "message": "No checked items to remove",
            "removed_count": 0,
        }));
    }

    let mut removed_count = 0usize;
    let mut errors = Vec::new();
    for item in &checked {
        let Some(item_id) = item.get("id").and_then(Value::as_str) else {
            continue;
        };
        match api
            .delete_json(&format!("/api/households/shopping/items/{}", item_id))
            .await
        {
            Ok(_) => removed_count += 1,
            Err(e) => errors.push(json!({ "item_id": item_id, "error": e.to_string() })),
        }
    }

    let mut result = json!({
        "success": true,
        "message": format!("Removed {} checked items", removed_count),
        "removed_count": removed_count,
    });
    if !errors.is_empty() {
        result["errors"] = Value::Array(errors);
    }
    Ok(result)
}

/// Flip an item's checked flag with a read-modify-write cycle. The PUT
/// carries the full stored item so the gateway's full-object update
/// contract is met and no other field is lost.
pub async fn set_item_checked<A: MealieApi>(
    api: &A,
    item_id: &str,
    checked: bool,
) -> Result<Value, ToolError> {
    let path = format!("/api/households/shopping/items/{}", item_id);
    let mut item = api.get_json(&path, &[]).await?;
    if item.is_null() {
        return Err(ToolError::Validation(format!(
            "Shopping list item '{}' not found",
            item_id
        )));
    }

    item["checked"] = json!(checked);
    let updated = api.put_json(&path, item).await?;

    let status = if checked { "checked" } else { "unchecked" };
    Ok(json!({
        "success": true,
        "message": format!("Item '{}' marked as {}", item_id, status),
        "item": updated,
    }))
}

/// Read the meal plan for a date range and build a shopping list from it.
///
/// Creates the list only after at least one planned recipe is found; a
/// recipe that fails to import is reported under `recipes_failed` without
/// failing the whole run.
pub async fn generate_from_mealplan<A: MealieApi>(
    api: &A,
    start_date: Option<&str>,
    end_date: Option<&str>,
    list_name: Option<&str>,
) -> Result<Value, ToolError> {
    let start = match start_date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            ToolError::Validation(format!("Invalid start_date '{}'. Use YYYY-MM-DD format.", raw))
        })?,
        None => chrono::Local::now().date_naive(),
    };
    let end = match end_date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            ToolError::Validation(format!("Invalid end_date '{}'. Use YYYY-MM-DD format.", raw))
        })?,
        None => start + Duration::days(6),
    };
    let start_str = start.format("%Y-%m-%d").to_string();
    let end_str = end.format("%Y-%m-%d").to_string();

    let response = api
        .get_json(
            "/api/households/mealplans",
            &[
                ("start_date", start_str.clone()),
                ("end_date", end_str.clone()),
            ],
        )
        .await?;

    let entries = entry_list(&response);
    if response.is_null() || entries.is_empty() {
        return Err(ToolError::Validation(format!(
            "No meal plans found for the specified date range ({} to {})",
            start_str, end_str
        )));
    }

    let recipe_ids: Vec<String> = entries
        .iter()
        .filter_map(|entry| entry.get("recipeId").and_then(Value::as_str))
        .map(str::to_string)
        .collect();
    if recipe_ids.is_empty() {
        return Err(ToolError::Validation(format!(
            "No recipes found in meal plan for the specified date range ({} to {})",
            start_str, end_str
        )));
    }

    let list_name = match list_name {
        Some(name) => name.to_string(),
        None => format!(
            "Meal Plan - {} to {}",
            start.format("%b %d"),
            end.format("%b %d")
        ),
    };

    let created = api
        .post_json(
            "/api/households/shopping/lists",
            json!({ "name": list_name }),
        )
        .await?;
    let Some(list_id) = created.get("id").and_then(Value::as_str).map(str::to_string) else {
        return Err(ToolError::Unexpected(
            "Failed to create shopping list".to_string(),
        ));
    };

    let mut recipes_processed = 0usize;
    let mut recipes_failed = Vec::new();
    for recipe_id in &recipe_ids {
        let path = format!(
            "/api/households/shopping/lists/{}/recipe/{}",
            list_id, recipe_id
        );
        match api
            .post_json(&path, json!({ "recipeId": recipe_id }))
            .await
        {
            Ok(_) => recipes_processed += 1,
            Err(e) => recipes_failed.push(json!({
                "recipe_id": recipe_id,
                "error": e.to_string(),
            })),
        }
    }

    let final_list = api
        .get_json(&format!("/api/households/shopping/lists/{}", list_id), &[])
        .await
        .unwrap_or(Value::Null);
    let total_items = list_items(&final_list).len();

    let mut result = json!({
        "success": true,
        "message": format!("Shopping list '{}' created with {} items", list_name, total_items),
        "list_id": list_id,
        "list_name": list_name,
        "date_range": { "start": start_str, "end": end_str },
        "recipes_processed": recipes_processed,
        "total_items": total_items,
    });
    if !recipes_failed.is_empty() {
        result["recipes_failed"] = Value::Array(recipes_failed);
    }
    Ok(result)
}

#[tool_router(router = shopping_router, vis = "pub")]
impl MealieMcpServer {
    #[tool(description = "List all shopping lists with item counts")]
    async fn shopping_lists_list(&self) -> Result<CallToolResult, McpError> {
        let result = async {
            let response = self
                .client
                .get_json("/api/households/shopping/lists", &[])
                .await?;
            let lists: Vec<Value> = entry_list(&response).iter().map(list_overview).collect();
            Ok(json!({ "count": lists.len(), "lists": lists }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Get a shopping list with all of its items")]
    async fn shopping_lists_get(
        &self,
        Parameters(params): Parameters<GetShoppingListParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            let list = self
                .client
                .get_json(
                    &format!("/api/households/shopping/lists/{}", params.list_id),
                    &[],
                )
                .await?;
            if list.is_null() {
                return Err(ToolError::Validation(format!(
                    "Shopping list '{}' not found",
                    params.list_id
                )));
            }

            let items: Vec<Value> = list_items(&list).iter().map(formatted_item).collect();
            let checked_count = items
                .iter()
                .filter(|i| i.get("checked").and_then(Value::as_bool).unwrap_or(false))
                .count();
            Ok(json!({
                "id": list.get("id").cloned().unwrap_or(Value::Null),
                "name": list.get("name").cloned().unwrap_or(Value::Null),
                "created_at": list.get("createdAt").cloned().unwrap_or(Value::Null),
                "updated_at": list.get("updateAt").cloned().unwrap_or(Value::Null),
                "items": items,
                "total_items": list_items(&list).len(),
                "checked_count": checked_count,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Create a new shopping list")]
    async fn shopping_lists_create(
        &self,
        Parameters(params): Parameters<CreateShoppingListParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            let created = self
                .client
                .post_json(
                    "/api/households/shopping/lists",
                    json!({ "name": params.name }),
                )
                .await?;
            Ok(json!({
                "success": true,
                "message": format!("Shopping list '{}' created", params.name),
                "list": {
                    "id": created.get("id").cloned().unwrap_or(Value::Null),
                    "name": created.get("name").cloned().unwrap_or(Value::Null),
                    "created_at": created.get("createdAt").cloned().unwrap_or(Value::Null),
                },
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Delete a shopping list")]
    async fn shopping_lists_delete(
        &self,
        Parameters(params): Parameters<DeleteShoppingListParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            self.client
                .delete_json(&format!(
                    "/api/households/shopping/lists/{}",
                    params.list_id
                ))
                .await?;
            Ok(json!({
                "success": true,
                "message": format!("Shopping list '{}' deleted", params.list_id),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Add an item to a shopping list")]
    async fn shopping_items_add(
        &self,
        Parameters(params): Parameters<AddShoppingItemParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            let mut payload = Map::new();
            payload.insert("shoppingListId".to_string(), json!(params.list_id));
            if let Some(note) = &params.note {
                payload.insert("note".to_string(), json!(note));
            }
            if let Some(quantity) = params.quantity {
                payload.insert("quantity".to_string(), json!(quantity));
            }
            if let Some(unit_id) = &params.unit_id {
                payload.insert("unitId".to_string(), json!(unit_id));
            }
            if let Some(food_id) = &params.food_id {
                payload.insert("foodId".to_string(), json!(food_id));
            }
            if let Some(display) = &params.display {
                payload.insert("display".to_string(), json!(display));
            }

            let item = self
                .client
                .post_json("/api/households/shopping/items", Value::Object(payload))
                .await?;
            Ok(json!({
                "success": true,
                "message": "Item added to shopping list",
                "item": item,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Add several items to a shopping list in one call")]
    async fn shopping_items_add_bulk(
        &self,
        Parameters(params): Parameters<AddBulkItemsParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(add_bulk_items(&*self.client, &params.list_id, &params.items).await)
    }

    #[tool(description = "Mark a shopping list item as checked or unchecked")]
    async fn shopping_items_check(
        &self,
        Parameters(params): Parameters<CheckItemParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(set_item_checked(&*self.client, &params.item_id, params.checked).await)
    }

    #[tool(description = "Remove an item from a shopping list")]
    async fn shopping_items_delete(
        &self,
        Parameters(params): Parameters<DeleteItemParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            self.client
                .delete_json(&format!(
                    "/api/households/shopping/items/{}",
                    params.item_id
                ))
                .await?;
            Ok(json!({
                "success": true,
                "message": format!("Item '{}' removed from shopping list", params.item_id),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Add all ingredients from a recipe to a shopping list")]
    async fn shopping_add_recipe(
        &self,
        Parameters(params): Parameters<AddRecipeParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            let mut payload = Map::new();
            payload.insert("recipeId".to_string(), json!(params.recipe_id));
            if let Some(scale) = params.scale {
                if scale != 1.0 {
                    payload.insert("recipeIncrementQuantity".to_string(), json!(scale));
                }
            }

            let list = self
                .client
                .post_json(
                    &format!(
                        "/api/households/shopping/lists/{}/recipe/{}",
                        params.list_id, params.recipe_id
                    ),
                    Value::Object(payload),
                )
                .await?;
            Ok(json!({
                "success": true,
                "message": "Recipe ingredients added to shopping list",
                "list": list,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(
        description = "Generate a shopping list from the meal plan for a date range (defaults to the next 7 days)"
    )]
    async fn shopping_generate_from_mealplan(
        &self,
        Parameters(params): Parameters<GenerateFromMealplanParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            generate_from_mealplan(
                &*self.client,
                params.start_date.as_deref(),
                params.end_date.as_deref(),
                params.list_name.as_deref(),
            )
            .await,
        )
    }

    #[tool(description = "Remove all checked items from a shopping list")]
    async fn shopping_clear_checked(
        &self,
        Parameters(params): Parameters<ClearCheckedParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(clear_checked_items(&*self.client, &params.list_id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overview_counts_checked_and_unchecked() {
        let list = json!({
            "id": "l1",
            "name": "Groceries",
            "listItems": [
                { "id": "a", "checked": true },
                { "id": "b", "checked": false },
                { "id": "c" },
            ]
        });
        let overview = list_overview(&list);
        assert_eq!(overview["total_items"], 3);
        assert_eq!(overview["checked_items"], 1);
        assert_eq!(overview["unchecked_items"], 2);
    }

    #[test]
    fn formatted_item_flattens_unit_and_food_objects() {
        let item = json!({
            "id": "i1",
            "checked": false,
            "quantity": 2.0,
            "unit": { "name": "cups", "id": "u1" },
            "food": { "name": "flour", "id": "f1" },
            "note": null,
            "display": "2 cups flour"
        });
        let formatted = formatted_item(&item);
        assert_eq!(formatted["unit"], "cups");
        assert_eq!(formatted["food"], "flour");
        assert_eq!(formatted["display"], "2 cups flour");
    }
}
