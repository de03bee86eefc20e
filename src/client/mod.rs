//! HTTP gateway to the Mealie API.
//!
//! - [`client`] - the reqwest client, the [`MealieApi`] verb trait, and
//!   helpers built on top of it (pagination sweep, organizer resolution)
//! - [`error`] - typed errors carrying the remote status and body
//! - [`types`] - value types shared by tools (meal slots, field updates)
//!
//! Payloads stay as `serde_json::Value`: Mealie's shapes are polymorphic
//! (string-or-object categories, list-or-scalar tags) and are normalized
//! at the edges by [`crate::normalize`] instead of typed structs.

#[allow(clippy::module_inception)]
pub mod client;
pub mod error;
pub mod types;

pub use client::{fetch_all_recipes, resolve_organizers, MealieApi, MealieClient};
pub use error::MealieError;
pub use types::{EntryType, FieldUpdate, CLEAR_MARKER};
