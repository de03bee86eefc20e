//! Coercion behavior for the gateway's polymorphic payload shapes.

use mcp_mealie::normalize::{
    bucket_by_entry_type, coerce_name_field, coerce_name_list, day_summary, entry_list,
    item_display, primary_category, recipe_summary,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

#[test]
fn name_field_accepts_every_shape_the_gateway_uses() {
    assert_eq!(coerce_name_field(Some(&json!("Dinner"))), Some("Dinner".to_string()));
    assert_eq!(
        coerce_name_field(Some(&json!({ "name": "Dinner", "id": "c1" }))),
        Some("Dinner".to_string())
    );
    assert_eq!(coerce_name_field(Some(&Value::Null)), None);
    assert_eq!(coerce_name_field(None), None);
    assert_eq!(coerce_name_field(Some(&json!(""))), None);
    assert_eq!(coerce_name_field(Some(&json!({ "id": "c1" }))), None);
}

#[test]
fn name_list_flattens_mixed_entries() {
    let raw = json!([
        "quick",
        { "name": "vegan" },
        null,
        { "id": "nameless" },
    ]);
    assert_eq!(coerce_name_list(Some(&raw)), vec!["quick", "vegan"]);
}

#[test]
fn name_list_wraps_a_bare_scalar() {
    assert_eq!(coerce_name_list(Some(&json!("quick"))), vec!["quick"]);
    assert!(coerce_name_list(None).is_empty());
}

#[test]
fn primary_category_reads_the_first_entry() {
    let recipe = json!({ "recipeCategory": [{ "name": "Dinner" }, { "name": "Quick" }] });
    assert_eq!(primary_category(&recipe), Some("Dinner".to_string()));

    let stringy = json!({ "recipeCategory": "Dinner" });
    assert_eq!(primary_category(&stringy), Some("Dinner".to_string()));

    let missing = json!({ "name": "Stew" });
    assert_eq!(primary_category(&missing), None);

    let empty = json!({ "recipeCategory": [] });
    assert_eq!(primary_category(&empty), None);
}

#[test]
fn recipe_summary_degrades_gracefully() {
    let summary = recipe_summary(&json!({}));
    assert_eq!(summary["name"], "Unknown");
    assert_eq!(summary["slug"], "");
    assert_eq!(summary["tags"], json!([]));
}

#[test]
fn item_display_prefers_the_server_string() {
    let item = json!({ "display": "2 cups flour", "quantity": 99 });
    assert_eq!(item_display(&item), "2 cups flour");
}

#[test]
fn item_display_assembles_from_parts() {
    let item = json!({ "quantity": 2.0, "unit": { "name": "cups" }, "food": { "name": "flour" } });
    assert_eq!(item_display(&item), "2 cups flour");

    let fractional = json!({ "quantity": 0.5, "unit": "tsp", "food": "salt" });
    assert_eq!(item_display(&fractional), "0.5 tsp salt");

    assert_eq!(item_display(&json!({})), "Unknown item");
}

#[test]
fn entry_list_accepts_all_three_response_shapes() {
    let array = json!([{ "id": 1 }, { "id": 2 }]);
    assert_eq!(entry_list(&array).len(), 2);

    let paginated = json!({ "items": [{ "id": 1 }], "total": 1 });
    assert_eq!(entry_list(&paginated).len(), 1);

    let single = json!({ "id": 1, "date": "2026-03-04" });
    assert_eq!(entry_list(&single).len(), 1);

    assert!(entry_list(&Value::Null).is_empty());
}

#[test]
fn buckets_order_known_slots_first_then_first_seen() {
    let entries = vec![
        json!({ "entryType": "teatime" }),
        json!({ "entryType": "dinner" }),
        json!({ "entryType": "Breakfast" }),
        json!({ "entryType": "elevenses" }),
    ];

    let buckets = bucket_by_entry_type(&entries);
    let order: Vec<&str> = buckets.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(order, vec!["breakfast", "dinner", "teatime", "elevenses"]);
}

#[test]
fn entries_without_a_slot_land_in_the_meal_bucket() {
    let entries = vec![json!({ "title": "Untyped" })];
    let buckets = bucket_by_entry_type(&entries);
    assert_eq!(buckets[0].0, "meal");
}

#[test]
fn day_summary_groups_and_counts() {
    let entries = vec![
        json!({ "id": "m1", "entryType": "dinner", "recipe": { "name": "Chili", "slug": "chili" }, "recipeId": "r1" }),
        json!({ "id": "m2", "entryType": "dinner", "title": "Salad" }),
        json!({ "id": "m3", "entryType": "breakfast", "title": "Toast" }),
    ];

    let summary = day_summary("2026-03-04", &entries);

    assert_eq!(summary["date"], "2026-03-04");
    assert_eq!(summary["count"], 3);
    assert_eq!(summary["meals"]["dinner"].as_array().unwrap().len(), 2);
    assert_eq!(summary["meals"]["dinner"][0]["recipe_name"], "Chili");
    assert_eq!(summary["meals"]["dinner"][0]["recipe_slug"], "chili");
    assert_eq!(summary["meals"]["breakfast"][0]["title"], "Toast");
}

#[test]
fn day_summary_with_no_entries_is_empty() {
    let summary = day_summary("2026-03-04", &[]);
    assert_eq!(summary["count"], 0);
    assert_eq!(summary["meals"], json!({}));
}
