//! Food and measurement unit catalog tools.
//!
//! Food updates follow the gateway's read-then-PUT requirement; unit
//! updates go straight through PATCH. Merges fold duplicate entries into
//! a survivor across every recipe that references them.

use std::future::Future;
use rmcp::{
    handler::server::tool::Parameters, model::CallToolResult, schemars, tool, tool_router,
    ErrorData as McpError,
};
use serde_json::{json, Map, Value};

use crate::client::MealieApi;
use crate::server::{respond, MealieMcpServer, ToolError};

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ListCatalogParams {
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub per_page: Option<u64>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CreateFoodParams {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Label UUID to assign
    #[serde(default)]
    pub label_id: Option<String>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetFoodParams {
    pub food_id: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct UpdateFoodParams {
    pub food_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub label_id: Option<String>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct DeleteFoodParams {
    pub food_id: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct MergeFoodsParams {
    /// Food that disappears after the merge
    pub from_food_id: String,
    /// Food that absorbs the references
    pub to_food_id: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CreateUnitParams {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub abbreviation: Option<String>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetUnitParams {
    pub unit_id: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct UpdateUnitParams {
    pub unit_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub abbreviation: Option<String>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct DeleteUnitParams {
    pub unit_id: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct MergeUnitsParams {
    pub from_unit_id: String,
    pub to_unit_id: String,
}

fn page_query(params: &ListCatalogParams) -> Vec<(&'static str, String)> {
    vec![
        ("page", params.page.unwrap_or(1).to_string()),
        ("perPage", params.per_page.unwrap_or(50).to_string()),
    ]
}

#[tool_router(router = foods_router, vis = "pub")]
impl MealieMcpServer {
    #[tool(description = "List foods from the food catalog with pagination")]
    async fn foods_list(
        &self,
        Parameters(params): Parameters<ListCatalogParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .client
            .get_json("/api/foods", &page_query(&params))
            .await
            .map_err(ToolError::from);
        respond(result)
    }

    #[tool(description = "Create a food in the catalog")]
    async fn foods_create(
        &self,
        Parameters(params): Parameters<CreateFoodParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            let mut payload = Map::new();
            payload.insert("name".to_string(), json!(params.name));
            if let Some(description) = &params.description {
                payload.insert("description".to_string(), json!(description));
            }
            if let Some(label_id) = &params.label_id {
                payload.insert("labelId".to_string(), json!(label_id));
            }
            let food = self
                .client
                .post_json("/api/foods", Value::Object(payload))
                .await?;
            Ok(json!({
                "success": true,
                "message": "Food created successfully",
                "food": food,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Get a food by ID")]
    async fn foods_get(
        &self,
        Parameters(params): Parameters<GetFoodParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .client
            .get_json(&format!("/api/foods/{}", params.food_id), &[])
            .await
            .map_err(ToolError::from);
        respond(result)
    }

    #[tool(description = "Update a food's name, description, or label")]
    async fn foods_update(
        &self,
        Parameters(params): Parameters<UpdateFoodParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            let path = format!("/api/foods/{}", params.food_id);
            // The gateway only accepts the full object on PUT.
            let mut food = self.client.get_json(&path, &[]).await?;
            if !food.is_object() {
                return Err(ToolError::Validation(format!(
                    "Food '{}' not found",
                    params.food_id
                )));
            }
            if let Some(name) = &params.name {
                food["name"] = json!(name);
            }
            if let Some(description) = &params.description {
                food["description"] = json!(description);
            }
            if let Some(label_id) = &params.label_id {
                food["labelId"] = json!(label_id);
            }

            let updated = self.client.put_json(&path, food).await?;
            Ok(json!({
                "success": true,
                "message": "Food updated successfully",
                "food": updated,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Delete a food from the catalog")]
    async fn foods_delete(
        &self,
        Parameters(params): Parameters<DeleteFoodParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            self.client
                .delete_json(&format!("/api/foods/{}", params.food_id))
                .await?;
            Ok(json!({ "success": true, "message": "Food deleted successfully" }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Merge one food into another, rewriting recipe references")]
    async fn foods_merge(
        &self,
        Parameters(params): Parameters<MergeFoodsParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            let merged = self
                .client
                .merge_foods(&params.from_food_id, &params.to_food_id)
                .await?;
            Ok(json!({
                "success": true,
                "message": "Foods merged successfully",
                "result": merged,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "List measurement units with pagination")]
    async fn units_list(
        &self,
        Parameters(params): Parameters<ListCatalogParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .client
            .get_json("/api/units", &page_query(&params))
            .await
            .map_err(ToolError::from);
        respond(result)
    }

    #[tool(description = "Create a measurement unit")]
    async fn units_create(
        &self,
        Parameters(params): Parameters<CreateUnitParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            let mut payload = Map::new();
            payload.insert("name".to_string(), json!(params.name));
            if let Some(description) = &params.description {
                payload.insert("description".to_string(), json!(description));
            }
            if let Some(abbreviation) = &params.abbreviation {
                payload.insert("abbreviation".to_string(), json!(abbreviation));
            }
            let unit = self
                .client
                .post_json("/api/units", Value::Object(payload))
                .await?;
            Ok(json!({
                "success": true,
                "message": "Unit created successfully",
                "unit": unit,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Get a measurement unit by ID")]
    async fn units_get(
        &self,
        Parameters(params): Parameters<GetUnitParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .client
            .get_json(&format!("/api/units/{}", params.unit_id), &[])
            .await
            .map_err(ToolError::from);
        respond(result)
    }

    #[tool(description = "Update a measurement unit")]
    async fn units_update(
        &self,
        Parameters(params): Parameters<UpdateUnitParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            let mut payload = Map::new();
            if let Some(name) = &params.name {
                payload.insert("name".to_string(), json!(name));
            }
            if let Some(description) = &params.description {
                payload.insert("description".to_string(), json!(description));
            }
            if let Some(abbreviation) = &params.abbreviation {
                payload.insert("abbreviation".to_string(), json!(abbreviation));
            }
            if payload.is_empty() {
                return Err(ToolError::Validation(
                    "No fields to update. Provide name, description, or abbreviation."
                        .to_string(),
                ));
            }

            let unit = self
                .client
                .patch_json(
                    &format!("/api/units/{}", params.unit_id),
                    Value::Object(payload),
                )
                .await?;
            Ok(json!({
                "success": true,
                "message": "Unit updated successfully",
                "unit": unit,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Delete a measurement unit")]
    async fn units_delete(
        &self,
        Parameters(params): Parameters<DeleteUnitParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            self.client
                .delete_json(&format!("/api/units/{}", params.unit_id))
                .await?;
            Ok(json!({ "success": true, "message": "Unit deleted successfully" }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Merge one unit into another, rewriting recipe references")]
    async fn units_merge(
        &self,
        Parameters(params): Parameters<MergeUnitsParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            let merged = self
                .client
                .merge_units(&params.from_unit_id, &params.to_unit_id)
                .await?;
            Ok(json!({
                "success": true,
                "message": "Units merged successfully",
                "result": merged,
            }))
        }
        .await;
        respond(result)
    }
}
