//! Meal plan and meal plan rule tools.
//!
//! Writes validate the meal slot against [`EntryType`] before any request
//! goes out; reads accept whatever `entryType` strings the server holds.

use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use std::future::Future;
use rmcp::{
    handler::server::tool::Parameters, model::CallToolResult, schemars, tool, tool_router,
    ErrorData as McpError,
};
use serde_json::{json, Map, Value};

use crate::client::{resolve_organizers, EntryType, FieldUpdate, MealieApi, MealieError};
use crate::normalize::{day_summary, entry_list, mealplan_entry_summary};
use crate::server::{respond, MealieMcpServer, ToolError};

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ListMealplansParams {
    /// Start date in YYYY-MM-DD format (defaults to today)
    #[serde(default)]
    pub start_date: Option<String>,
    /// End date in YYYY-MM-DD format (defaults to 7 days after start)
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetMealplanParams {
    pub mealplan_id: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetMealplanDateParams {
    /// Date in YYYY-MM-DD format
    pub meal_date: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CreateMealplanParams {
    /// Date for the meal in YYYY-MM-DD format
    pub meal_date: String,
    /// One of: breakfast, lunch, dinner, side, snack
    pub entry_type: String,
    #[serde(default)]
    pub recipe_id: Option<String>,
    /// Title for entries without a recipe
    #[serde(default)]
    pub title: Option<String>,
    /// Free-form note
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct UpdateMealplanParams {
    pub mealplan_id: String,
    #[serde(default)]
    pub meal_date: Option<String>,
    #[serde(default)]
    pub entry_type: Option<String>,
    /// New recipe ID; pass "__CLEAR__" to remove the recipe association
    #[serde(default)]
    pub recipe_id: Option<String>,
    /// New title; pass "__CLEAR__" to clear it
    #[serde(default)]
    pub title: Option<String>,
    /// New note; pass "__CLEAR__" to clear it
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct DeleteMealplanParams {
    pub mealplan_id: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetRuleParams {
    pub rule_id: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CreateRuleParams {
    pub name: String,
    /// One of: breakfast, lunch, dinner, side, snack
    pub entry_type: String,
    /// Tag names the rule draws recipes from
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Category names the rule draws recipes from
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct UpdateRuleParams {
    pub rule_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub entry_type: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct DeleteRuleParams {
    pub rule_id: String,
}

/// Merge an update into an existing entry, producing the full PUT payload.
///
/// Starts from the stored entry so remote-owned fields (`groupId`,
/// `userId`, and anything else the server put there) round-trip unchanged.
/// `date` and `entry_type` fall back to the stored values; the three
/// optional fields honor the clear sentinel: `Unset` keeps the stored
/// value, `Clear` writes an explicit null, `Value` replaces.
pub fn merge_mealplan_update(
    existing: &Value,
    mealplan_id: &str,
    date: Option<&str>,
    entry_type: Option<EntryType>,
    recipe_id: &FieldUpdate,
    title: &FieldUpdate,
    text: &FieldUpdate,
) -> Value {
    let mut payload = match existing {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    payload.insert("id".to_string(), json!(mealplan_id));
    if let Some(d) = date {
        payload.insert("date".to_string(), json!(d));
    }
    if let Some(t) = entry_type {
        payload.insert("entryType".to_string(), json!(t.as_str()));
    }

    for (key, update) in [("recipeId", recipe_id), ("title", title), ("text", text)] {
        update.apply(&mut payload, key);
    }

    Value::Object(payload)
}

/// Create an entry. The meal slot and date are validated before any
/// request is issued.
pub async fn create_mealplan_entry<A: MealieApi>(
    api: &A,
    meal_date: &str,
    entry_type: &str,
    recipe_id: Option<&str>,
    title: Option<&str>,
    text: Option<&str>,
) -> Result<Value, ToolError> {
    let entry_type = parse_entry_type(entry_type)?;
    parse_date("meal_date", meal_date)?;

    let mut payload = Map::new();
    payload.insert("date".to_string(), json!(meal_date));
    payload.insert("entryType".to_string(), json!(entry_type.as_str()));
    if let Some(recipe_id) = recipe_id {
        payload.insert("recipeId".to_string(), json!(recipe_id));
    }
    if let Some(title) = title {
        payload.insert("title".to_string(), json!(title));
    }
    if let Some(text) = text {
        payload.insert("text".to_string(), json!(text));
    }

    let entry = api
        .post_json("/api/households/mealplans", Value::Object(payload))
        .await?;

    Ok(json!({
        "success": true,
        "message": format!("Meal plan entry created for {}", meal_date),
        "entry": entry,
    }))
}

/// Read-merge-PUT update honoring the clear sentinel. Validation runs
/// before the read, so bad arguments never reach the gateway.
pub async fn update_mealplan_entry<A: MealieApi>(
    api: &A,
    mealplan_id: &str,
    meal_date: Option<&str>,
    entry_type: Option<&str>,
    recipe_id: Option<String>,
    title: Option<String>,
    text: Option<String>,
) -> Result<Value, ToolError> {
    let entry_type = match entry_type {
        Some(raw) => Some(parse_entry_type(raw)?),
        None => None,
    };
    if let Some(raw) = meal_date {
        parse_date("meal_date", raw)?;
    }

    let path = format!("/api/households/mealplans/{}", mealplan_id);
    let existing = api.get_json(&path, &[]).await?;
    if existing.is_null() {
        return Err(ToolError::Validation(format!(
            "Meal plan entry '{}' not found",
            mealplan_id
        )));
    }

    let payload = merge_mealplan_update(
        &existing,
        mealplan_id,
        meal_date,
        entry_type,
        &FieldUpdate::from_param(recipe_id),
        &FieldUpdate::from_param(title),
        &FieldUpdate::from_param(text),
    );

    let entry = api.put_json(&path, payload).await?;
    Ok(json!({
        "success": true,
        "message": format!("Meal plan entry '{}' updated", mealplan_id),
        "entry": entry,
    }))
}

/// All entries for one date, grouped by meal slot.
pub async fn fetch_day_plan<A: MealieApi>(api: &A, meal_date: &str) -> Result<Value, ToolError> {
    let date = parse_date("meal_date", meal_date)?;
    let date_str = date.format("%Y-%m-%d").to_string();
    let response = api
        .get_json(
            "/api/households/mealplans",
            &[
                ("start_date", date_str.clone()),
                ("end_date", date_str.clone()),
            ],
        )
        .await?;
    Ok(day_summary(&date_str, &entry_list(&response)))
}

fn parse_date(label: &str, raw: &str) -> Result<NaiveDate, ToolError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        ToolError::Validation(format!(
            "Invalid {} '{}'. Use YYYY-MM-DD format.",
            label, raw
        ))
    })
}

fn parse_entry_type(raw: &str) -> Result<EntryType, ToolError> {
    raw.parse::<EntryType>().map_err(ToolError::Validation)
}

fn suggestion_from_recipe(recipe: &Value) -> Value {
    json!({
        "recipe_id": recipe.get("id").cloned().unwrap_or(Value::Null),
        "name": recipe.get("name").cloned().unwrap_or(Value::Null),
        "slug": recipe.get("slug").cloned().unwrap_or(Value::Null),
        "description": recipe.get("description").cloned().unwrap_or(Value::Null),
        "total_time": recipe.get("totalTime").cloned().unwrap_or(Value::Null),
        "tags": crate::normalize::coerce_name_list(recipe.get("tags")),
    })
}

#[tool_router(router = mealplans_router, vis = "pub")]
impl MealieMcpServer {
    #[tool(description = "List meal plan entries for a date range")]
    async fn mealplans_list(
        &self,
        Parameters(params): Parameters<ListMealplansParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            let start = match &params.start_date {
                Some(raw) => parse_date("start_date", raw)?,
                None => chrono::Local::now().date_naive(),
            };
            let end = match &params.end_date {
                Some(raw) => parse_date("end_date", raw)?,
                None => start + Duration::days(7),
            };

            let response = self
                .client
                .get_json(
                    "/api/households/mealplans",
                    &[
                        ("start_date", start.format("%Y-%m-%d").to_string()),
                        ("end_date", end.format("%Y-%m-%d").to_string()),
                        ("perPage", "100".to_string()),
                    ],
                )
                .await?;

            let entries: Vec<Value> = entry_list(&response)
                .iter()
                .map(|entry| {
                    let mut summary = mealplan_entry_summary(entry);
                    summary["date"] = entry.get("date").cloned().unwrap_or(Value::Null);
                    summary["entry_type"] = entry.get("entryType").cloned().unwrap_or(Value::Null);
                    summary
                })
                .collect();

            Ok(json!({
                "start_date": start.format("%Y-%m-%d").to_string(),
                "end_date": end.format("%Y-%m-%d").to_string(),
                "count": entries.len(),
                "entries": entries,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Get today's meal plan entries grouped by meal slot")]
    async fn mealplans_today(&self) -> Result<CallToolResult, McpError> {
        let result = async {
            let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
            let response = self
                .client
                .get_json("/api/households/mealplans/today", &[])
                .await?;
            Ok(day_summary(&today, &entry_list(&response)))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Get a specific meal plan entry by ID")]
    async fn mealplans_get(
        &self,
        Parameters(params): Parameters<GetMealplanParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .client
            .get_json(
                &format!("/api/households/mealplans/{}", params.mealplan_id),
                &[],
            )
            .await
            .map_err(ToolError::from);
        respond(result)
    }

    #[tool(description = "Get all meal plan entries for a specific date, grouped by meal slot")]
    async fn mealplans_get_date(
        &self,
        Parameters(params): Parameters<GetMealplanDateParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(fetch_day_plan(&*self.client, &params.meal_date).await)
    }

    #[tool(description = "Create a meal plan entry for a date and meal slot")]
    async fn mealplans_create(
        &self,
        Parameters(params): Parameters<CreateMealplanParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            create_mealplan_entry(
                &*self.client,
                &params.meal_date,
                &params.entry_type,
                params.recipe_id.as_deref(),
                params.title.as_deref(),
                params.text.as_deref(),
            )
            .await,
        )
    }

    #[tool(
        description = "Update a meal plan entry. Pass \"__CLEAR__\" as recipe_id, title, or text to clear that field"
    )]
    async fn mealplans_update(
        &self,
        Parameters(params): Parameters<UpdateMealplanParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            update_mealplan_entry(
                &*self.client,
                &params.mealplan_id,
                params.meal_date.as_deref(),
                params.entry_type.as_deref(),
                params.recipe_id.clone(),
                params.title.clone(),
                params.text.clone(),
            )
            .await,
        )
    }

    #[tool(description = "Delete a meal plan entry")]
    async fn mealplans_delete(
        &self,
        Parameters(params): Parameters<DeleteMealplanParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            self.client
                .delete_json(&format!(
                    "/api/households/mealplans/{}",
                    params.mealplan_id
                ))
                .await?;
            Ok(json!({
                "success": true,
                "message": format!("Meal plan entry '{}' deleted", params.mealplan_id),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Get a random meal suggestion from available recipes")]
    async fn mealplans_random(&self) -> Result<CallToolResult, McpError> {
        respond(self.do_mealplans_random().await)
    }

    #[tool(description = "List all meal plan rules")]
    async fn mealplan_rules_list(&self) -> Result<CallToolResult, McpError> {
        let result = async {
            let response = self
                .client
                .get_json("/api/households/mealplans/rules", &[])
                .await?;
            let rules = entry_list(&response);
            Ok(json!({ "count": rules.len(), "rules": rules }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Get a meal plan rule by ID")]
    async fn mealplan_rules_get(
        &self,
        Parameters(params): Parameters<GetRuleParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .client
            .get_json(
                &format!("/api/households/mealplans/rules/{}", params.rule_id),
                &[],
            )
            .await
            .map_err(ToolError::from);
        respond(result)
    }

    #[tool(description = "Create a meal plan rule drawing from tags and categories")]
    async fn mealplan_rules_create(
        &self,
        Parameters(params): Parameters<CreateRuleParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            let entry_type = parse_entry_type(&params.entry_type)?;

            let mut payload = Map::new();
            payload.insert("name".to_string(), json!(params.name));
            payload.insert("entryType".to_string(), json!(entry_type.as_str()));
            if let Some(tags) = &params.tags {
                let resolved = resolve_organizers(&*self.client, "tags", tags, None).await?;
                payload.insert("tags".to_string(), Value::Array(resolved));
            }
            if let Some(categories) = &params.categories {
                let resolved =
                    resolve_organizers(&*self.client, "categories", categories, None).await?;
                payload.insert("categories".to_string(), Value::Array(resolved));
            }

            let rule = self
                .client
                .post_json("/api/households/mealplans/rules", Value::Object(payload))
                .await?;
            Ok(json!({
                "success": true,
                "message": format!("Meal plan rule '{}' created", params.name),
                "rule": rule,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Update a meal plan rule")]
    async fn mealplan_rules_update(
        &self,
        Parameters(params): Parameters<UpdateRuleParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            let entry_type = match &params.entry_type {
                Some(raw) => Some(parse_entry_type(raw)?),
                None => None,
            };

            let path = format!("/api/households/mealplans/rules/{}", params.rule_id);
            let existing = self.client.get_json(&path, &[]).await?;

            let mut payload = Map::new();
            payload.insert("id".to_string(), json!(params.rule_id));
            payload.insert(
                "name".to_string(),
                match &params.name {
                    Some(name) => json!(name),
                    None => existing.get("name").cloned().unwrap_or(Value::Null),
                },
            );
            payload.insert(
                "entryType".to_string(),
                match entry_type {
                    Some(t) => json!(t.as_str()),
                    None => existing.get("entryType").cloned().unwrap_or(Value::Null),
                },
            );
            match &params.tags {
                Some(tags) => {
                    let resolved = resolve_organizers(&*self.client, "tags", tags, None).await?;
                    payload.insert("tags".to_string(), Value::Array(resolved));
                }
                None => {
                    payload.insert(
                        "tags".to_string(),
                        existing.get("tags").cloned().unwrap_or(json!([])),
                    );
                }
            }
            match &params.categories {
                Some(categories) => {
                    let resolved =
                        resolve_organizers(&*self.client, "categories", categories, None).await?;
                    payload.insert("categories".to_string(), Value::Array(resolved));
                }
                None => {
                    payload.insert(
                        "categories".to_string(),
                        existing.get("categories").cloned().unwrap_or(json!([])),
                    );
                }
            }

            let rule = self.client.put_json(&path, Value::Object(payload)).await?;
            Ok(json!({
                "success": true,
                "message": format!("Meal plan rule '{}' updated", params.rule_id),
                "rule": rule,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Delete a meal plan rule")]
    async fn mealplan_rules_delete(
        &self,
        Parameters(params): Parameters<DeleteRuleParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            self.client
                .delete_json(&format!(
                    "/api/households/mealplans/rules/{}",
                    params.rule_id
                ))
                .await?;
            Ok(json!({
                "success": true,
                "message": format!("Meal plan rule '{}' deleted", params.rule_id),
            }))
        }
        .await;
        respond(result)
    }
}

impl MealieMcpServer {
    async fn do_mealplans_random(&self) -> Result<Value, ToolError> {
        match self
            .client
            .post_json("/api/households/mealplans/random", json!({}))
            .await
        {
            Ok(response) => {
                let recipe = response.get("recipe").unwrap_or(&response);
                if recipe.is_object() {
                    Ok(json!({
                        "success": true,
                        "suggestion": suggestion_from_recipe(recipe),
                    }))
                } else {
                    Ok(json!({ "success": true, "suggestion": response }))
                }
            }
            // Older servers lack the endpoint; pick from the catalog instead.
            Err(MealieError::Api { .. }) => {
                let response = self
                    .client
                    .get_json(
                        "/api/recipes",
                        &[("perPage", "100".to_string()), ("page", "1".to_string())],
                    )
                    .await?;
                let recipes = response
                    .get("items")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                match recipes.choose(&mut rand::thread_rng()) {
                    Some(recipe) => Ok(json!({
                        "success": true,
                        "suggestion": suggestion_from_recipe(recipe),
                    })),
                    None => Err(ToolError::Validation(
                        "No recipes available for suggestion".to_string(),
                    )),
                }
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::CLEAR_MARKER;

    fn existing_entry() -> Value {
        json!({
            "id": "meal-1",
            "date": "2026-01-05",
            "entryType": "dinner",
            "recipeId": "recipe-abc",
            "title": "Pasta Night",
            "text": "Use the big pot",
            "groupId": "group-7",
            "userId": "user-3"
        })
    }

    #[test]
    fn omitted_fields_keep_stored_values() {
        let payload = merge_mealplan_update(
            &existing_entry(),
            "meal-1",
            None,
            None,
            &FieldUpdate::Unset,
            &FieldUpdate::Unset,
            &FieldUpdate::Unset,
        );
        assert_eq!(payload["recipeId"], "recipe-abc");
        assert_eq!(payload["title"], "Pasta Night");
        assert_eq!(payload["text"], "Use the big pot");
        assert_eq!(payload["date"], "2026-01-05");
        assert_eq!(payload["entryType"], "dinner");
    }

    #[test]
    fn remote_owned_fields_round_trip() {
        let payload = merge_mealplan_update(
            &existing_entry(),
            "meal-1",
            Some("2026-01-06"),
            Some(EntryType::Lunch),
            &FieldUpdate::from_param(Some(CLEAR_MARKER.to_string())),
            &FieldUpdate::Unset,
            &FieldUpdate::Unset,
        );
        assert_eq!(payload["groupId"], "group-7");
        assert_eq!(payload["userId"], "user-3");
    }

    #[test]
    fn cleared_fields_become_explicit_nulls() {
        let payload = merge_mealplan_update(
            &existing_entry(),
            "meal-1",
            None,
            None,
            &FieldUpdate::from_param(Some(CLEAR_MARKER.to_string())),
            &FieldUpdate::Unset,
            &FieldUpdate::Unset,
        );
        assert_eq!(payload["recipeId"], Value::Null);
        assert_eq!(payload["title"], "Pasta Night");
    }

    #[test]
    fn new_values_replace_stored_ones() {
        let payload = merge_mealplan_update(
            &existing_entry(),
            "meal-1",
            Some("2026-01-06"),
            Some(EntryType::Lunch),
            &FieldUpdate::Unset,
            &FieldUpdate::from_param(Some("Leftovers".to_string())),
            &FieldUpdate::Unset,
        );
        assert_eq!(payload["date"], "2026-01-06");
        assert_eq!(payload["entryType"], "lunch");
        assert_eq!(payload["title"], "Leftovers");
    }
}
