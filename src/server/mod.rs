//! MCP server surface: tools, resources, and the response envelope.
//!
//! Each domain lives in its own module with its own `#[tool_router]`
//! block; the routers are combined in the constructor. Every tool funnels
//! through [`respond`], so errors never cross the protocol boundary as
//! anything but a JSON envelope.

use std::sync::Arc;

use std::future::Future;
use rmcp::{
    handler::server::router::tool::ToolRouter,
    model::*,
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler,
};
use serde_json::{json, Value};

use crate::client::{fetch_all_recipes, MealieApi, MealieClient, MealieError};
use crate::config::MealieConfig;
use crate::normalize::entry_list;
use crate::resources::{
    render_date_plan, render_recipe_detail, render_recipe_list, render_shopping_list_detail,
    render_shopping_lists, render_today, render_week_plan, week_start_of,
};

pub mod comments;
pub mod foods;
pub mod mealplans;
pub mod organizers;
pub mod parser;
pub mod recipes;
pub mod shopping;

/// Failure inside a tool, before it is folded into the error envelope.
#[derive(Debug)]
pub enum ToolError {
    /// Bad arguments, caught before any request is issued.
    Validation(String),
    /// The gateway returned an error.
    Api(MealieError),
    /// Anything else (payload shapes we cannot work with, mostly).
    Unexpected(String),
}

impl From<MealieError> for ToolError {
    fn from(err: MealieError) -> Self {
        ToolError::Api(err)
    }
}

impl ToolError {
    fn to_envelope(&self) -> Value {
        match self {
            ToolError::Validation(msg) => json!({ "error": msg }),
            ToolError::Api(err) => {
                let mut envelope = json!({ "error": err.to_string() });
                if let Some(status) = err.status_code() {
                    envelope["status_code"] = json!(status);
                }
                if let Some(body) = err.response_body() {
                    envelope["response_body"] = json!(body);
                }
                envelope
            }
            ToolError::Unexpected(msg) => json!({ "error": format!("Unexpected error: {}", msg) }),
        }
    }
}

/// Fold a tool outcome into a `CallToolResult`. Success payloads are
/// pretty-printed; errors become the uniform error envelope.
pub(crate) fn respond(result: Result<Value, ToolError>) -> Result<CallToolResult, McpError> {
    match result {
        Ok(value) => Ok(CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(&value).unwrap_or_default(),
        )])),
        Err(err) => Ok(CallToolResult::error(vec![Content::text(
            err.to_envelope().to_string(),
        )])),
    }
}

#[derive(Clone)]
pub struct MealieMcpServer {
    pub(crate) client: Arc<MealieClient>,
    tool_router: ToolRouter<MealieMcpServer>,
}

#[tool_router(router = base_router, vis = "pub")]
impl MealieMcpServer {
    pub fn new(config: &MealieConfig) -> Self {
        Self {
            client: Arc::new(MealieClient::new(config)),
            tool_router: Self::base_router()
                + Self::recipes_router()
                + Self::mealplans_router()
                + Self::shopping_router()
                + Self::foods_router()
                + Self::organizers_router()
                + Self::comments_router()
                + Self::parser_router(),
        }
    }

    pub async fn test_connection(&self) -> Result<Value, MealieError> {
        self.client.test_connection().await
    }

    #[tool(
        description = "Test connectivity to the Mealie server and report its version information"
    )]
    async fn ping(&self) -> Result<CallToolResult, McpError> {
        let result = match self.client.test_connection().await {
            Ok(about) => Ok(json!({
                "success": true,
                "message": "Connected to Mealie",
                "about": about,
            })),
            Err(e) => Err(ToolError::from(e)),
        };
        respond(result)
    }
}

impl MealieMcpServer {
    /// Render a resource URI to markdown. Gateway failures come back as
    /// readable error text rather than a protocol error, so a client
    /// always gets something it can show.
    async fn render_resource(&self, uri: &str) -> Result<String, McpError> {
        let client = &*self.client;

        match uri {
            "recipes://list" => Ok(match fetch_all_recipes(client).await {
                Ok(recipes) => render_recipe_list(&recipes),
                Err(e) => format!("Error fetching recipes: {}", e),
            }),
            "mealplans://current" => {
                let today = chrono::Local::now().date_naive();
                let week_start = week_start_of(today);
                let week_end = week_start + chrono::Duration::days(6);
                let response = client
                    .get_json(
                        "/api/households/mealplans",
                        &[
                            ("start_date", week_start.format("%Y-%m-%d").to_string()),
                            ("end_date", week_end.format("%Y-%m-%d").to_string()),
                            ("perPage", "100".to_string()),
                        ],
                    )
                    .await;
                Ok(match response {
                    Ok(value) => render_week_plan(&entry_list(&value), week_start, today),
                    Err(e) => format!("Error fetching meal plan: {}", e),
                })
            }
            "mealplans://today" => {
                let today = chrono::Local::now().date_naive();
                let response = client
                    .get_json("/api/households/mealplans/today", &[])
                    .await;
                Ok(match response {
                    Ok(value) => render_today(&entry_list(&value), today),
                    Err(e) => format!("Error fetching today's meals: {}", e),
                })
            }
            "shopping://lists" => {
                let response = client
                    .get_json("/api/households/shopping/lists", &[])
                    .await;
                Ok(match response {
                    Ok(value) => render_shopping_lists(&entry_list(&value)),
                    Err(e) => format!("Error fetching shopping lists: {}", e),
                })
            }
            _ => self.render_templated_resource(uri).await,
        }
    }

    async fn render_templated_resource(&self, uri: &str) -> Result<String, McpError> {
        let client = &*self.client;

        if let Some(slug) = uri.strip_prefix("recipes://") {
            let response = client.get_json(&format!("/api/recipes/{}", slug), &[]).await;
            return Ok(match response {
                Ok(recipe) => render_recipe_detail(&recipe),
                Err(e) => format!("Error fetching recipe '{}': {}", slug, e),
            });
        }

        if let Some(date) = uri.strip_prefix("mealplans://") {
            if chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
                return Ok(format!(
                    "Error: invalid date '{}'. Use YYYY-MM-DD format.",
                    date
                ));
            }
            let response = client
                .get_json(
                    "/api/households/mealplans",
                    &[
                        ("start_date", date.to_string()),
                        ("end_date", date.to_string()),
                    ],
                )
                .await;
            return Ok(match response {
                Ok(value) => render_date_plan(date, &entry_list(&value)),
                Err(e) => format!("Error fetching meal plan: {}", e),
            });
        }

        if let Some(list_id) = uri.strip_prefix("shopping://") {
            let response = client
                .get_json(&format!("/api/households/shopping/lists/{}", list_id), &[])
                .await;
            return Ok(match response {
                Ok(list) => render_shopping_list_detail(&list),
                Err(e) => format!("Error fetching shopping list '{}': {}", list_id, e),
            });
        }

        Err(McpError::resource_not_found(
            format!("Unknown resource URI: {}", uri),
            None,
        ))
    }
}

fn markdown_resource(uri: &str, name: &str, description: &str) -> Resource {
    let mut resource = RawResource::new(uri, name);
    resource.description = Some(description.to_string());
    resource.mime_type = Some("text/markdown".to_string());
    resource.no_annotation()
}

fn markdown_template(uri_template: &str, name: &str, description: &str) -> ResourceTemplate {
    RawResourceTemplate {
        uri_template: uri_template.to_string(),
        name: name.to_string(),
        description: Some(description.to_string()),
        mime_type: Some("text/markdown".to_string()),
    }
    .no_annotation()
}

#[tool_handler]
impl ServerHandler for MealieMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some("This server provides tools for managing a Mealie household: recipe search and management, meal planning with plan rules, shopping lists with meal-plan-driven generation, foods and units (including merges), recipe comments, and ingredient parsing. Resources expose recipes, meal plans, and shopping lists as readable markdown.".to_string()),
        }
    }

    async fn initialize(
        &self,
        _request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<InitializeResult, McpError> {
        Ok(self.get_info())
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult {
            resources: vec![
                markdown_resource(
                    "recipes://list",
                    "All Recipes",
                    "Browse all recipes organized by category",
                ),
                markdown_resource(
                    "mealplans://current",
                    "Current Week's Meal Plan",
                    "View the current week's meal plan (Monday-Sunday)",
                ),
                markdown_resource(
                    "mealplans://today",
                    "Today's Meals",
                    "View today's planned meals",
                ),
                markdown_resource(
                    "shopping://lists",
                    "Shopping Lists",
                    "View all shopping lists with item counts",
                ),
            ],
            next_cursor: None,
        })
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        Ok(ListResourceTemplatesResult {
            resource_templates: vec![
                markdown_template(
                    "recipes://{slug}",
                    "Recipe Detail",
                    "Detailed recipe with ingredients, instructions, and nutrition",
                ),
                markdown_template(
                    "mealplans://{date}",
                    "Meals for a Date",
                    "Meals planned for a specific date (YYYY-MM-DD)",
                ),
                markdown_template(
                    "shopping://{list_id}",
                    "Shopping List Detail",
                    "A specific shopping list with all items",
                ),
            ],
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        ReadResourceRequestParam { uri }: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let text = self.render_resource(&uri).await?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, uri)],
        })
    }
}
