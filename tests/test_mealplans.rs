//! Meal plan entry workflows against the scripted gateway.

mod common;

use common::MockApi;
use mcp_mealie::server::mealplans::{
    create_mealplan_entry, fetch_day_plan, update_mealplan_entry,
};
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn create_rejects_unknown_meal_slot_before_any_request() {
    let api = MockApi::new();

    let result = create_mealplan_entry(&api, "2026-03-02", "brunch", None, None, None).await;

    assert!(result.is_err());
    assert!(api.requests().is_empty());
}

#[tokio::test]
async fn update_rejects_unknown_meal_slot_before_any_request() {
    let api = MockApi::new();

    let result =
        update_mealplan_entry(&api, "meal-1", None, Some("brunch"), None, None, None).await;

    assert!(result.is_err());
    assert!(api.requests().is_empty());
}

#[tokio::test]
async fn create_normalizes_the_meal_slot_and_posts_it() {
    let api = MockApi::new();
    api.on(
        "POST",
        "/api/households/mealplans",
        json!({ "id": "meal-1", "date": "2026-03-02", "entryType": "dinner" }),
    );

    let result = create_mealplan_entry(&api, "2026-03-02", "Dinner", Some("r1"), None, None)
        .await
        .unwrap();

    assert_eq!(result["success"], true);
    let posts = api.requests_to("/api/households/mealplans");
    assert_eq!(posts.len(), 1);
    assert_eq!(
        posts[0].body,
        Some(json!({ "date": "2026-03-02", "entryType": "dinner", "recipeId": "r1" }))
    );
}

#[tokio::test]
async fn update_put_carries_remote_owned_fields_and_explicit_clears() {
    let api = MockApi::new();
    let stored = json!({
        "id": "meal-1",
        "date": "2026-03-02",
        "entryType": "dinner",
        "recipeId": "r1",
        "title": "Pasta Night",
        "text": "Use the big pot",
        "groupId": "group-7",
        "userId": "user-3",
    });
    api.on("GET", "/api/households/mealplans/meal-1", stored);
    api.on(
        "PUT",
        "/api/households/mealplans/meal-1",
        json!({ "id": "meal-1" }),
    );

    let result = update_mealplan_entry(
        &api,
        "meal-1",
        None,
        None,
        Some("__CLEAR__".to_string()),
        Some("Takeout".to_string()),
        None,
    )
    .await
    .unwrap();

    assert_eq!(result["success"], true);
    let puts = api.requests_to("/api/households/mealplans/meal-1");
    let put_body = puts
        .iter()
        .find(|r| r.method == "PUT")
        .and_then(|r| r.body.clone())
        .unwrap();
    assert_eq!(put_body["groupId"], "group-7");
    assert_eq!(put_body["userId"], "user-3");
    assert_eq!(put_body["recipeId"], json!(null));
    assert_eq!(put_body["title"], "Takeout");
    assert_eq!(put_body["text"], "Use the big pot");
}

#[tokio::test]
async fn update_of_a_missing_entry_issues_no_put() {
    let api = MockApi::new();
    api.on(
        "GET",
        "/api/households/mealplans/ghost",
        serde_json::Value::Null,
    );

    let result = update_mealplan_entry(&api, "ghost", None, None, None, None, None).await;

    assert!(result.is_err());
    assert_eq!(
        api.requests().iter().filter(|r| r.method == "PUT").count(),
        0
    );
}

#[tokio::test]
async fn reading_a_day_is_idempotent_and_read_only() {
    let api = MockApi::new();
    let day = json!({ "items": [
        { "id": "m1", "date": "2026-03-02", "entryType": "dinner", "recipeId": "r1" },
        { "id": "m2", "date": "2026-03-02", "entryType": "lunch", "title": "Soup" },
    ]});
    api.on("GET", "/api/households/mealplans", day.clone());
    api.on("GET", "/api/households/mealplans", day);

    let first = fetch_day_plan(&api, "2026-03-02").await.unwrap();
    let second = fetch_day_plan(&api, "2026-03-02").await.unwrap();

    assert_eq!(first, second);
    assert!(api.requests().iter().all(|r| r.method == "GET"));
}

#[tokio::test]
async fn reading_a_day_rejects_malformed_dates_before_any_request() {
    let api = MockApi::new();

    let result = fetch_day_plan(&api, "03/02/2026").await;

    assert!(result.is_err());
    assert!(api.requests().is_empty());
}
