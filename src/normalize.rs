//! Coercion helpers for Mealie's polymorphic payloads.
//!
//! The remote API returns organizer fields as strings, objects, lists of
//! either, or nothing at all, depending on version and endpoint. Everything
//! here is total: malformed input degrades to `None`, an empty list, or a
//! placeholder string, never a panic.

use serde_json::{json, Map, Value};

/// Coerce a name-bearing field to a plain string.
///
/// Objects yield their `name`, scalars are stringified, null and absent
/// values yield `None`.
pub fn coerce_name_field(raw: Option<&Value>) -> Option<String> {
    match raw? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map
            .get("name")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(_) => None,
    }
}

/// Coerce a tag/category-style field to a list of names.
///
/// A bare scalar becomes a one-element list, a list maps each element
/// through [`coerce_name_field`], anything else is empty.
pub fn coerce_name_list(raw: Option<&Value>) -> Vec<String> {
    match raw {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| coerce_name_field(Some(item)))
            .collect(),
        Some(value) => coerce_name_field(Some(value)).into_iter().collect(),
        None => Vec::new(),
    }
}

/// First category of a recipe, for grouping. `None` means uncategorized.
pub fn primary_category(recipe: &Value) -> Option<String> {
    match recipe.get("recipeCategory") {
        Some(Value::Array(items)) => coerce_name_field(items.first()),
        other => coerce_name_field(other),
    }
}

/// Flat summary of a recipe for search/list envelopes.
pub fn recipe_summary(recipe: &Value) -> Value {
    json!({
        "name": recipe.get("name").and_then(Value::as_str).unwrap_or("Unknown"),
        "slug": recipe.get("slug").and_then(Value::as_str).unwrap_or(""),
        "description": recipe.get("description").and_then(Value::as_str).unwrap_or(""),
        "rating": recipe.get("rating").cloned().unwrap_or(Value::Null),
        "tags": coerce_name_list(recipe.get("tags")),
        "categories": coerce_name_list(recipe.get("recipeCategory")),
    })
}

/// Flat summary of a meal plan entry, with the nested recipe pulled up.
pub fn mealplan_entry_summary(entry: &Value) -> Value {
    let recipe = entry.get("recipe");
    json!({
        "id": entry.get("id").cloned().unwrap_or(Value::Null),
        "title": entry.get("title").and_then(Value::as_str).unwrap_or(""),
        "text": entry.get("text").and_then(Value::as_str).unwrap_or(""),
        "recipe_id": entry.get("recipeId").cloned().unwrap_or(Value::Null),
        "recipe_name": recipe
            .and_then(|r| coerce_name_field(Some(r)))
            .unwrap_or_default(),
        "recipe_slug": recipe
            .and_then(|r| r.get("slug"))
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
    })
}

/// Human-readable line for a shopping item.
///
/// Prefers the server's own `display`; otherwise joins quantity, unit, and
/// food names; an item with none of those renders as "Unknown item".
pub fn item_display(item: &Value) -> String {
    if let Some(display) = item.get("display").and_then(Value::as_str) {
        if !display.is_empty() {
            return display.to_string();
        }
    }

    let mut parts = Vec::new();
    if let Some(quantity) = item.get("quantity") {
        if let Some(q) = quantity.as_f64() {
            if q != 0.0 {
                if q.fract() == 0.0 {
                    parts.push(format!("{}", q as i64));
                } else {
                    parts.push(format!("{}", q));
                }
            }
        }
    }
    if let Some(unit) = coerce_name_field(item.get("unit")) {
        parts.push(unit);
    }
    if let Some(food) = coerce_name_field(item.get("food")) {
        parts.push(food);
    }

    if parts.is_empty() {
        "Unknown item".to_string()
    } else {
        parts.join(" ")
    }
}

/// Flatten a list-shaped response.
///
/// Mealie answers collection endpoints with either a bare array, a
/// paginated `{"items": [...]}` envelope, or (for single-entry endpoints)
/// one object; everything becomes a plain vector.
pub fn entry_list(response: &Value) -> Vec<Value> {
    match response {
        Value::Array(items) => items.clone(),
        Value::Object(map) => match map.get("items").and_then(Value::as_array) {
            Some(items) => items.clone(),
            None => vec![response.clone()],
        },
        Value::Null => Vec::new(),
        other => vec![other.clone()],
    }
}

/// The five write-valid meal slots, in display order.
pub const ENTRY_TYPE_ORDER: [&str; 5] = ["breakfast", "lunch", "dinner", "side", "snack"];

/// Group meal plan entries by lowercased `entryType`.
///
/// Emission order is the fixed five slots first, then any other observed
/// types in first-seen order; input order is preserved within a bucket.
/// Entries with no `entryType` land in a "meal" bucket.
pub fn bucket_by_entry_type(entries: &[Value]) -> Vec<(String, Vec<&Value>)> {
    let mut buckets: Vec<(String, Vec<&Value>)> = Vec::new();

    for entry in entries {
        let entry_type = entry
            .get("entryType")
            .and_then(Value::as_str)
            .unwrap_or("meal")
            .to_lowercase();

        match buckets.iter_mut().find(|(name, _)| *name == entry_type) {
            Some((_, bucket)) => bucket.push(entry),
            None => buckets.push((entry_type, vec![entry])),
        }
    }

    let mut ordered = Vec::with_capacity(buckets.len());
    for slot in ENTRY_TYPE_ORDER {
        if let Some(pos) = buckets.iter().position(|(name, _)| name == slot) {
            ordered.push(buckets.remove(pos));
        }
    }
    ordered.extend(buckets);
    ordered
}

/// Group entries into `{date, count, meals: {entry_type: [summaries]}}`.
pub fn day_summary(date: &str, entries: &[Value]) -> Value {
    let mut meals = Map::new();
    for (entry_type, bucket) in bucket_by_entry_type(entries) {
        let summaries: Vec<Value> = bucket.iter().map(|e| mealplan_entry_summary(e)).collect();
        meals.insert(entry_type, Value::Array(summaries));
    }

    json!({
        "date": date,
        "count": entries.len(),
        "meals": Value::Object(meals),
    })
}

/// Uppercase the first letter, for bucket headings.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
