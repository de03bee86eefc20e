//! Recipe comment tools.

use std::future::Future;
use rmcp::{
    handler::server::tool::Parameters, model::CallToolResult, schemars, tool, tool_router,
    ErrorData as McpError,
};
use serde_json::json;

use crate::client::MealieApi;
use crate::server::{respond, MealieMcpServer};

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetRecipeCommentsParams {
    pub recipe_slug: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CreateCommentParams {
    /// Recipe ID (not slug) the comment attaches to
    pub recipe_id: String,
    pub text: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetCommentParams {
    pub comment_id: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct UpdateCommentParams {
    pub comment_id: String,
    pub text: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct DeleteCommentParams {
    pub comment_id: String,
}

#[tool_router(router = comments_router, vis = "pub")]
impl MealieMcpServer {
    #[tool(description = "Get all comments on a recipe")]
    async fn comments_get_recipe(
        &self,
        Parameters(params): Parameters<GetRecipeCommentsParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            let comments = self
                .client
                .get_json(
                    &format!("/api/recipes/{}/comments", params.recipe_slug),
                    &[],
                )
                .await?;
            Ok(json!({ "success": true, "comments": comments }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Add a comment to a recipe")]
    async fn comments_create(
        &self,
        Parameters(params): Parameters<CreateCommentParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            let comment = self
                .client
                .post_json(
                    "/api/comments",
                    json!({ "recipeId": params.recipe_id, "text": params.text }),
                )
                .await?;
            Ok(json!({
                "success": true,
                "message": "Comment created successfully",
                "comment": comment,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Get a comment by ID")]
    async fn comments_get(
        &self,
        Parameters(params): Parameters<GetCommentParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            let comment = self
                .client
                .get_json(&format!("/api/comments/{}", params.comment_id), &[])
                .await?;
            Ok(json!({ "success": true, "comment": comment }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Edit a comment's text")]
    async fn comments_update(
        &self,
        Parameters(params): Parameters<UpdateCommentParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            let comment = self
                .client
                .put_json(
                    &format!("/api/comments/{}", params.comment_id),
                    json!({ "id": params.comment_id, "text": params.text }),
                )
                .await?;
            Ok(json!({
                "success": true,
                "message": "Comment updated successfully",
                "comment": comment,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Delete a comment")]
    async fn comments_delete(
        &self,
        Parameters(params): Parameters<DeleteCommentParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            self.client
                .delete_json(&format!("/api/comments/{}", params.comment_id))
                .await?;
            Ok(json!({ "success": true, "message": "Comment deleted successfully" }))
        }
        .await;
        respond(result)
    }
}
