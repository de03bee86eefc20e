//! Golden-output checks for the markdown resource renderers.

use chrono::NaiveDate;
use mcp_mealie::resources::{
    render_date_plan, render_recipe_detail, render_recipe_list, render_shopping_list_detail,
    render_shopping_lists, render_today, render_week_plan, week_start_of,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn recipe_list_groups_by_primary_category() {
    let recipes = vec![
        json!({ "name": "Pancakes", "slug": "pancakes", "recipeCategory": [{ "name": "Breakfast" }], "tags": [] }),
        json!({ "name": "Chili", "slug": "chili", "recipeCategory": [{ "name": "Dinner" }], "tags": [{ "name": "spicy" }] }),
        json!({ "name": "Mystery Stew", "slug": "mystery-stew" }),
    ];

    let out = render_recipe_list(&recipes);

    assert!(out.starts_with("# Recipes in Mealie"));
    assert!(out.contains("**Total Recipes**: 3"));
    assert!(out.contains("## Breakfast (1 recipes)"));
    assert!(out.contains("- **Pancakes** (`pancakes`)"));
    assert!(out.contains("- **Chili** (`chili`) [spicy]"));
    // Uncategorized recipes come last.
    let uncategorized_pos = out.find("## Uncategorized (1 recipes)").unwrap();
    let dinner_pos = out.find("## Dinner (1 recipes)").unwrap();
    assert!(uncategorized_pos > dinner_pos);
}

#[test]
fn recipe_detail_renders_sections_in_order() {
    let recipe = json!({
        "name": "Garlic Bread",
        "description": "Crispy and buttery.",
        "recipeCategory": [{ "name": "Sides" }],
        "tags": [{ "name": "quick" }],
        "totalTime": "20 minutes",
        "recipeIngredient": [
            { "quantity": 1.0, "unit": { "name": "loaf" }, "food": { "name": "bread" }, "note": "day-old" },
            { "note": "butter, softened" },
        ],
        "recipeInstructions": [
            { "title": "", "text": "Slice the bread." },
            { "title": "Finish", "text": "Toast until golden." },
        ],
        "nutrition": { "calories": "210", "proteinContent": "" },
        "orgURL": "https://example.com/garlic-bread"
    });

    let out = render_recipe_detail(&recipe);

    assert!(out.starts_with("# Garlic Bread"));
    assert!(out.contains("*Crispy and buttery.*"));
    assert!(out.contains("- **Category**: Sides"));
    assert!(out.contains("- **Total Time**: 20 minutes"));
    assert!(out.contains("- 1 loaf bread (day-old)"));
    assert!(out.contains("- butter, softened"));
    assert!(out.contains("### Step 1"));
    assert!(out.contains("### Step 2: Finish"));
    assert!(out.contains("- **Calories**: 210"));
    assert!(!out.contains("Protein"));
    assert!(out.contains("[Original Recipe](https://example.com/garlic-bread)"));
}

#[test]
fn week_plan_lists_all_seven_days_and_marks_today() {
    let today = date("2026-03-04");
    let week_start = week_start_of(today);
    assert_eq!(week_start, date("2026-03-02"));

    let entries = vec![json!({
        "date": "2026-03-02",
        "entryType": "dinner",
        "recipe": { "name": "Chili", "slug": "chili" },
        "text": "double batch"
    })];

    let out = render_week_plan(&entries, week_start, today);

    assert!(out.contains("## Monday, March 02"));
    assert!(out.contains("## Wednesday, March 04 **(TODAY)**"));
    assert!(out.contains("## Sunday, March 08"));
    assert!(out.contains("### Dinner"));
    assert!(out.contains("- **Chili** (`chili`)"));
    assert!(out.contains("  - *Note: double batch*"));
    // Six of the seven days have nothing planned.
    assert_eq!(out.matches("*No meals planned*").count(), 6);
}

#[test]
fn today_view_handles_recipe_and_recipeless_entries() {
    let entries = vec![
        json!({
            "entryType": "breakfast",
            "recipe": { "name": "Oatmeal", "slug": "oatmeal", "prepTime": "5 minutes" }
        }),
        json!({ "entryType": "lunch", "title": "Leftovers", "text": "from Sunday" }),
    ];

    let out = render_today(&entries, date("2026-03-04"));

    assert!(out.starts_with("# Meals for Wednesday, March 04, 2026"));
    assert!(out.contains("## Breakfast"));
    assert!(out.contains("### Oatmeal"));
    assert!(out.contains("- Prep: 5 minutes"));
    assert!(out.contains("*Recipe slug: `oatmeal`*"));
    assert!(out.contains("## Lunch"));
    assert!(out.contains("- Leftovers"));
    assert!(out.contains("**Note:** from Sunday"));
}

#[test]
fn today_view_with_no_entries_says_so() {
    let out = render_today(&[], date("2026-03-04"));
    assert!(out.contains("*No meals planned for today*"));
}

#[test]
fn date_plan_buckets_follow_meal_slot_order() {
    let entries = vec![
        json!({ "entryType": "snack", "title": "Apple slices" }),
        json!({ "entryType": "breakfast", "recipe": { "name": "Eggs", "slug": "eggs" } }),
    ];

    let out = render_date_plan("2026-03-04", &entries);

    let breakfast_pos = out.find("## Breakfast").unwrap();
    let snack_pos = out.find("## Snack").unwrap();
    assert!(breakfast_pos < snack_pos);
    assert!(out.contains("- **Eggs** (`eggs`)"));
    assert!(out.contains("- **Apple slices**"));
}

#[test]
fn shopping_lists_overview_splits_checked_and_unchecked() {
    let lists = vec![json!({
        "name": "Groceries",
        "createdAt": "2026-03-01T08:00:00",
        "listItems": [
            { "display": "2 cups flour", "checked": false },
            { "display": "1 dozen eggs", "checked": true },
        ]
    })];

    let out = render_shopping_lists(&lists);

    assert!(out.contains("## Groceries"));
    assert!(out.contains("- **Completed**: 1/2"));
    assert!(out.contains("### To Buy"));
    assert!(out.contains("- [ ] 2 cups flour"));
    assert!(out.contains("### Already Purchased"));
    assert!(out.contains("- [x] 1 dozen eggs"));
}

#[test]
fn shopping_lists_overview_with_no_lists() {
    let out = render_shopping_lists(&[]);
    assert!(out.contains("*No shopping lists found*"));
}

#[test]
fn shopping_list_detail_falls_back_to_assembled_display() {
    let list = json!({
        "name": "Weekend Baking",
        "listItems": [
            { "quantity": 2.0, "unit": { "name": "cups" }, "food": { "name": "flour" }, "checked": false },
            { "checked": false },
        ]
    });

    let out = render_shopping_list_detail(&list);

    assert!(out.starts_with("# Weekend Baking"));
    assert!(out.contains("**Progress**: 0/2 items completed"));
    assert!(out.contains("- [ ] 2 cups flour"));
    assert!(out.contains("- [ ] Unknown item"));
}

#[test]
fn shopping_list_detail_with_no_items() {
    let list: Value = json!({ "name": "Empty", "listItems": [] });
    let out = render_shopping_list_detail(&list);
    assert!(out.contains("*No items in this list*"));
}

#[test]
fn week_start_is_always_monday() {
    assert_eq!(week_start_of(date("2026-03-02")), date("2026-03-02"));
    assert_eq!(week_start_of(date("2026-03-08")), date("2026-03-02"));
}
