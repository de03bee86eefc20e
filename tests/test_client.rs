//! Catalog sweep and organizer resolution against the scripted gateway.

mod common;

use common::MockApi;
use mcp_mealie::client::{fetch_all_recipes, resolve_organizers};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn page_of(start: usize, count: usize, total: usize) -> Value {
    let items: Vec<Value> = (start..start + count)
        .map(|i| json!({ "name": format!("Recipe {}", i), "slug": format!("recipe-{}", i) }))
        .collect();
    json!({ "items": items, "total": total })
}

#[tokio::test]
async fn sweep_walks_every_page_until_total_is_reached() {
    let api = MockApi::new();
    api.on("GET", "/api/recipes", page_of(0, 100, 250));
    api.on("GET", "/api/recipes", page_of(100, 100, 250));
    api.on("GET", "/api/recipes", page_of(200, 50, 250));

    let recipes = fetch_all_recipes(&api).await.unwrap();
    assert_eq!(recipes.len(), 250);

    let requests = api.requests_to("/api/recipes");
    assert_eq!(requests.len(), 3);
    let pages: Vec<String> = requests
        .iter()
        .map(|r| {
            r.query
                .iter()
                .find(|(k, _)| k == "page")
                .map(|(_, v)| v.clone())
                .unwrap()
        })
        .collect();
    assert_eq!(pages, vec!["1", "2", "3"]);
}

#[tokio::test]
async fn sweep_stops_on_an_empty_page_despite_a_stale_total() {
    let api = MockApi::new();
    api.on("GET", "/api/recipes", page_of(0, 100, 9999));
    api.on("GET", "/api/recipes", json!({ "items": [], "total": 9999 }));

    let recipes = fetch_all_recipes(&api).await.unwrap();
    assert_eq!(recipes.len(), 100);
    assert_eq!(api.requests_to("/api/recipes").len(), 2);
}

#[tokio::test]
async fn sweep_handles_a_single_short_page() {
    let api = MockApi::new();
    api.on("GET", "/api/recipes", page_of(0, 3, 3));

    let recipes = fetch_all_recipes(&api).await.unwrap();
    assert_eq!(recipes.len(), 3);
    assert_eq!(api.requests_to("/api/recipes").len(), 1);
}

#[tokio::test]
async fn organizer_resolution_reuses_existing_and_creates_missing() {
    let api = MockApi::new();
    api.on(
        "GET",
        "/api/organizers/tags",
        json!({ "items": [
            { "id": "t1", "name": "quick", "slug": "quick" },
            { "id": "t2", "name": "vegan", "slug": "vegan" },
        ]}),
    );
    api.on(
        "POST",
        "/api/organizers/tags",
        json!({ "id": "t3", "name": "weeknight", "slug": "weeknight" }),
    );

    let resolved = resolve_organizers(
        &api,
        "tags",
        &["quick".to_string(), "weeknight".to_string()],
        None,
    )
    .await
    .unwrap();

    assert_eq!(resolved.len(), 2);
    assert_eq!(resolved[0]["id"], "t1");
    assert_eq!(resolved[1]["id"], "t3");

    let creates = api
        .requests()
        .into_iter()
        .filter(|r| r.method == "POST")
        .collect::<Vec<_>>();
    assert_eq!(creates.len(), 1);
    assert_eq!(creates[0].body, Some(json!({ "name": "weeknight" })));
}

#[tokio::test]
async fn additive_resolution_keeps_current_assignments() {
    let api = MockApi::new();
    api.on(
        "GET",
        "/api/organizers/categories",
        json!({ "items": [ { "id": "c2", "name": "Dinner", "slug": "dinner" } ]}),
    );

    let existing = vec![json!({ "id": "c1", "name": "Breakfast", "slug": "breakfast" })];
    let resolved = resolve_organizers(
        &api,
        "categories",
        &["Dinner".to_string(), "Breakfast".to_string()],
        Some(&existing),
    )
    .await
    .unwrap();

    // Breakfast is already assigned; only Dinner is appended.
    let names: Vec<&str> = resolved
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Breakfast", "Dinner"]);
}

#[tokio::test]
async fn organizer_resolution_accepts_a_bare_array_catalog() {
    let api = MockApi::new();
    api.on(
        "GET",
        "/api/organizers/tags",
        json!([ { "id": "t1", "name": "quick", "slug": "quick" } ]),
    );

    let resolved = resolve_organizers(&api, "tags", &["quick".to_string()], None)
        .await
        .unwrap();
    assert_eq!(resolved, vec![json!({ "id": "t1", "name": "quick", "slug": "quick" })]);
}
