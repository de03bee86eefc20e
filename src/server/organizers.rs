//! Category and tag organizer tools.
//!
//! Both collections share the same endpoint shape under
//! `/api/organizers/{kind}`, so the tools delegate to a small set of
//! kind-parameterized helpers.

use std::future::Future;
use rmcp::{
    handler::server::tool::Parameters, model::CallToolResult, schemars, tool, tool_router,
    ErrorData as McpError,
};
use serde_json::{json, Value};

use crate::client::MealieApi;
use crate::normalize::entry_list;
use crate::server::{respond, MealieMcpServer, ToolError};

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CreateOrganizerParams {
    pub name: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetOrganizerParams {
    pub organizer_id: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct UpdateOrganizerParams {
    pub organizer_id: String,
    pub name: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct DeleteOrganizerParams {
    pub organizer_id: String,
}

impl MealieMcpServer {
    async fn organizer_list(&self, kind: &str, label: &str) -> Result<Value, ToolError> {
        let response = self
            .client
            .get_json(
                &format!("/api/organizers/{}", kind),
                &[("perPage", "1000".to_string())],
            )
            .await?;
        let items = entry_list(&response);
        Ok(json!({ "count": items.len(), label: items }))
    }

    async fn organizer_create(&self, kind: &str, label: &str, name: &str) -> Result<Value, ToolError> {
        let created = self
            .client
            .post_json(&format!("/api/organizers/{}", kind), json!({ "name": name }))
            .await?;
        Ok(json!({
            "success": true,
            "message": format!("{} '{}' created", label, name),
            "item": created,
        }))
    }

    async fn organizer_get(&self, kind: &str, id: &str) -> Result<Value, ToolError> {
        self.client
            .get_json(&format!("/api/organizers/{}/{}", kind, id), &[])
            .await
            .map_err(ToolError::from)
    }

    async fn organizer_update(
        &self,
        kind: &str,
        label: &str,
        id: &str,
        name: &str,
    ) -> Result<Value, ToolError> {
        let updated = self
            .client
            .patch_json(
                &format!("/api/organizers/{}/{}", kind, id),
                json!({ "name": name }),
            )
            .await?;
        Ok(json!({
            "success": true,
            "message": format!("{} updated successfully", label),
            "item": updated,
        }))
    }

    async fn organizer_delete(&self, kind: &str, label: &str, id: &str) -> Result<Value, ToolError> {
        self.client
            .delete_json(&format!("/api/organizers/{}/{}", kind, id))
            .await?;
        Ok(json!({
            "success": true,
            "message": format!("{} deleted successfully", label),
        }))
    }
}

#[tool_router(router = organizers_router, vis = "pub")]
impl MealieMcpServer {
    #[tool(description = "List all recipe categories")]
    async fn categories_list(&self) -> Result<CallToolResult, McpError> {
        respond(self.organizer_list("categories", "categories").await)
    }

    #[tool(description = "Create a recipe category")]
    async fn categories_create(
        &self,
        Parameters(params): Parameters<CreateOrganizerParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            self.organizer_create("categories", "Category", &params.name)
                .await,
        )
    }

    #[tool(description = "Get a recipe category by ID")]
    async fn categories_get(
        &self,
        Parameters(params): Parameters<GetOrganizerParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.organizer_get("categories", &params.organizer_id).await)
    }

    #[tool(description = "Rename a recipe category")]
    async fn categories_update(
        &self,
        Parameters(params): Parameters<UpdateOrganizerParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            self.organizer_update("categories", "Category", &params.organizer_id, &params.name)
                .await,
        )
    }

    #[tool(description = "Delete a recipe category")]
    async fn categories_delete(
        &self,
        Parameters(params): Parameters<DeleteOrganizerParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            self.organizer_delete("categories", "Category", &params.organizer_id)
                .await,
        )
    }

    #[tool(description = "List all recipe tags")]
    async fn tags_list(&self) -> Result<CallToolResult, McpError> {
        respond(self.organizer_list("tags", "tags").await)
    }

    #[tool(description = "Create a recipe tag")]
    async fn tags_create(
        &self,
        Parameters(params): Parameters<CreateOrganizerParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.organizer_create("tags", "Tag", &params.name).await)
    }

    #[tool(description = "Get a recipe tag by ID")]
    async fn tags_get(
        &self,
        Parameters(params): Parameters<GetOrganizerParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.organizer_get("tags", &params.organizer_id).await)
    }

    #[tool(description = "Rename a recipe tag")]
    async fn tags_update(
        &self,
        Parameters(params): Parameters<UpdateOrganizerParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            self.organizer_update("tags", "Tag", &params.organizer_id, &params.name)
                .await,
        )
    }

    #[tool(description = "Delete a recipe tag")]
    async fn tags_delete(
        &self,
        Parameters(params): Parameters<DeleteOrganizerParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            self.organizer_delete("tags", "Tag", &params.organizer_id)
                .await,
        )
    }
}
