//! # Mealie MCP Library
//!
//! Exposes a Mealie household (recipes, meal plans, shopping lists, food
//! and unit catalogs, comments, ingredient parsing) through the Model
//! Context Protocol.
//!
//! ## Client Module
//!
//! The [`client`] module wraps the Mealie REST API: bearer-token HTTP
//! access, error mapping, and multi-step helpers such as the full-catalog
//! recipe sweep and organizer resolution.
//!
//! ## Server Module
//!
//! The [`server`] module implements the MCP server: one tool router per
//! domain, plus markdown resources for browsing recipes, meal plans, and
//! shopping lists.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mcp_mealie::{MealieConfig, MealieMcpServer};
//!
//! let config = MealieConfig::new(
//!     "http://localhost:9000".to_string(),
//!     "your-api-token".to_string(),
//! );
//! let server = MealieMcpServer::new(&config);
//! ```

pub mod client;
pub mod config;
pub mod normalize;
pub mod resources;
pub mod server;

pub use client::MealieClient;
pub use config::MealieConfig;
pub use server::MealieMcpServer;
