use std::env;

/// Runtime configuration, read once at startup.
///
/// Nothing below the entry point touches the environment; the config is
/// built in `main` and handed to the client constructor.
#[derive(Debug, Clone)]
pub struct MealieConfig {
    /// Base URL of the Mealie instance, without a trailing slash.
    pub base_url: String,
    /// API token sent as a bearer credential on every request.
    pub api_token: String,
    /// Address the SSE server binds to.
    pub bind_addr: String,
}

impl MealieConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = env::var("MEALIE_URL")
            .map_err(|_| anyhow::anyhow!("MEALIE_URL environment variable is required"))?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let api_token = env::var("MEALIE_API_TOKEN")
            .map_err(|_| anyhow::anyhow!("MEALIE_API_TOKEN environment variable is required"))?;

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3001".to_string());

        Ok(Self {
            base_url,
            api_token,
            bind_addr,
        })
    }

    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: api_token.into(),
            bind_addr: "127.0.0.1:3001".to_string(),
        }
    }
}
