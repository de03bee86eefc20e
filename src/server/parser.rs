//! Ingredient parser tools.
//!
//! Thin passthroughs to the gateway's NLP/brute-force ingredient parser.
//! Single-ingredient results are returned verbatim; batch results get a
//! count wrapper.

use std::future::Future;
use rmcp::{
    handler::server::tool::Parameters, model::CallToolResult, schemars, tool, tool_router,
    ErrorData as McpError,
};
use serde_json::json;

use crate::server::{respond, MealieMcpServer, ToolError};

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ParseIngredientParams {
    /// Raw ingredient text, e.g. "2 cups all-purpose flour"
    pub ingredient: String,
    /// Parser engine: "nlp" or "brute"
    #[serde(default)]
    pub parser: Option<String>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ParseIngredientsBatchParams {
    /// Raw ingredient lines to parse
    pub ingredients: Vec<String>,
    /// Parser engine: "nlp" or "brute"
    #[serde(default)]
    pub parser: Option<String>,
}

fn parser_engine(parser: &Option<String>) -> Result<&str, ToolError> {
    match parser.as_deref() {
        None => Ok("nlp"),
        Some("nlp") => Ok("nlp"),
        Some("brute") => Ok("brute"),
        Some(other) => Err(ToolError::Validation(format!(
            "Invalid parser '{}'. Must be one of: nlp, brute",
            other
        ))),
    }
}

#[tool_router(router = parser_router, vis = "pub")]
impl MealieMcpServer {
    #[tool(
        description = "Parse a single ingredient string into structured quantity, unit, and food components"
    )]
    async fn parser_ingredient(
        &self,
        Parameters(params): Parameters<ParseIngredientParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            let engine = parser_engine(&params.parser)?;
            let parsed = self
                .client
                .parse_ingredient(&params.ingredient, engine)
                .await?;
            Ok(parsed)
        }
        .await;
        respond(result)
    }

    #[tool(description = "Parse several ingredient strings in one request")]
    async fn parser_ingredients_batch(
        &self,
        Parameters(params): Parameters<ParseIngredientsBatchParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            let engine = parser_engine(&params.parser)?;
            let parsed = self
                .client
                .parse_ingredients(&params.ingredients, engine)
                .await?;
            let count = parsed.as_array().map(Vec::len).unwrap_or(0);
            Ok(json!({ "count": count, "parsed_ingredients": parsed }))
        }
        .await;
        respond(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_nlp_engine() {
        assert_eq!(parser_engine(&None).unwrap(), "nlp");
    }

    #[test]
    fn rejects_unknown_engine() {
        assert!(parser_engine(&Some("magic".to_string())).is_err());
    }
}
