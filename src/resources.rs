//! Markdown renderers backing the MCP resources.
//!
//! Every function here is pure: data and dates go in, a deterministic
//! string comes out. Fetching happens in the resource handler so these
//! can be covered by golden-output tests.

use chrono::{Datelike, Duration, NaiveDate};
use serde_json::Value;

use crate::normalize::{
    bucket_by_entry_type, capitalize, coerce_name_list, item_display, primary_category,
};

/// All recipes grouped by primary category, uncategorized last.
pub fn render_recipe_list(recipes: &[Value]) -> String {
    let mut out = vec!["# Recipes in Mealie".to_string(), String::new()];
    out.push(format!("**Total Recipes**: {}", recipes.len()));
    out.push(String::new());

    let mut by_category: Vec<(String, Vec<&Value>)> = Vec::new();
    let mut uncategorized: Vec<&Value> = Vec::new();

    for recipe in recipes {
        match primary_category(recipe) {
            Some(category) => {
                match by_category.iter_mut().find(|(name, _)| *name == category) {
                    Some((_, group)) => group.push(recipe),
                    None => by_category.push((category, vec![recipe])),
                }
            }
            None => uncategorized.push(recipe),
        }
    }
    by_category.sort_by(|a, b| a.0.cmp(&b.0));

    for (category, group) in &by_category {
        out.push(format!("## {} ({} recipes)", category, group.len()));
        out.push(String::new());
        for recipe in group {
            out.push(recipe_line(recipe));
        }
        out.push(String::new());
    }

    if !uncategorized.is_empty() {
        out.push(format!("## Uncategorized ({} recipes)", uncategorized.len()));
        out.push(String::new());
        for recipe in &uncategorized {
            out.push(recipe_line(recipe));
        }
        out.push(String::new());
    }

    out.join("\n")
}

fn recipe_line(recipe: &Value) -> String {
    let name = recipe
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("Unknown");
    let slug = recipe.get("slug").and_then(Value::as_str).unwrap_or("");
    let tags = coerce_name_list(recipe.get("tags"));
    if tags.is_empty() {
        format!("- **{}** (`{}`)", name, slug)
    } else {
        format!("- **{}** (`{}`) [{}]", name, slug, tags.join(", "))
    }
}

/// A full recipe: metadata, ingredients, instructions, nutrition, notes.
pub fn render_recipe_detail(recipe: &Value) -> String {
    let mut out = Vec::new();

    let name = recipe
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("Unknown Recipe");
    out.push(format!("# {}", name));
    out.push(String::new());

    if let Some(description) = recipe.get("description").and_then(Value::as_str) {
        if !description.is_empty() {
            out.push(format!("*{}*", description));
            out.push(String::new());
        }
    }

    out.push("## Information".to_string());
    out.push(String::new());

    let categories = coerce_name_list(recipe.get("recipeCategory"));
    if !categories.is_empty() {
        out.push(format!("- **Category**: {}", categories.join(", ")));
    }
    let tags = coerce_name_list(recipe.get("tags"));
    if !tags.is_empty() {
        out.push(format!("- **Tags**: {}", tags.join(", ")));
    }
    for (label, key) in [
        ("Yield", "recipeYield"),
        ("Total Time", "totalTime"),
        ("Prep Time", "prepTime"),
        ("Cook Time", "performTime"),
    ] {
        if let Some(value) = recipe.get(key).and_then(Value::as_str) {
            if !value.is_empty() {
                out.push(format!("- **{}**: {}", label, value));
            }
        }
    }
    out.push(String::new());

    if let Some(ingredients) = recipe.get("recipeIngredient").and_then(Value::as_array) {
        if !ingredients.is_empty() {
            out.push("## Ingredients".to_string());
            out.push(String::new());
            for ingredient in ingredients {
                out.push(ingredient_line(ingredient));
            }
            out.push(String::new());
        }
    }

    if let Some(instructions) = recipe.get("recipeInstructions").and_then(Value::as_array) {
        if !instructions.is_empty() {
            out.push("## Instructions".to_string());
            out.push(String::new());
            for (i, instruction) in instructions.iter().enumerate() {
                let step = i + 1;
                match instruction {
                    Value::Object(map) => {
                        let title = map.get("title").and_then(Value::as_str).unwrap_or("");
                        if title.is_empty() {
                            out.push(format!("### Step {}", step));
                        } else {
                            out.push(format!("### Step {}: {}", step, title));
                        }
                        out.push(String::new());
                        out.push(
                            map.get("text")
                                .and_then(Value::as_str)
                                .unwrap_or("")
                                .to_string(),
                        );
                    }
                    other => out.push(format!("{}. {}", step, text_of(other))),
                }
                out.push(String::new());
            }
        }
    }

    if let Some(nutrition) = recipe.get("nutrition").and_then(Value::as_object) {
        let fields = [
            ("Calories", "calories"),
            ("Protein", "proteinContent"),
            ("Carbohydrates", "carbohydrateContent"),
            ("Fat", "fatContent"),
            ("Fiber", "fiberContent"),
            ("Sodium", "sodiumContent"),
        ];
        let lines: Vec<String> = fields
            .iter()
            .filter_map(|(label, key)| {
                nutrition
                    .get(*key)
                    .and_then(Value::as_str)
                    .filter(|v| !v.is_empty())
                    .map(|v| format!("- **{}**: {}", label, v))
            })
            .collect();
        if !lines.is_empty() {
            out.push("## Nutrition".to_string());
            out.push(String::new());
            out.extend(lines);
            out.push(String::new());
        }
    }

    if let Some(notes) = recipe.get("notes").and_then(Value::as_array) {
        if !notes.is_empty() {
            out.push("## Notes".to_string());
            out.push(String::new());
            for note in notes {
                if let Some(map) = note.as_object() {
                    if let Some(title) = map.get("title").and_then(Value::as_str) {
                        if !title.is_empty() {
                            out.push(format!("### {}", title));
                            out.push(String::new());
                        }
                    }
                    out.push(
                        map.get("text")
                            .and_then(Value::as_str)
                            .unwrap_or("")
                            .to_string(),
                    );
                } else {
                    out.push(text_of(note));
                }
                out.push(String::new());
            }
        }
    }

    if let Some(url) = recipe.get("orgURL").and_then(Value::as_str) {
        if !url.is_empty() {
            out.push("## Source".to_string());
            out.push(String::new());
            out.push(format!("[Original Recipe]({})", url));
            out.push(String::new());
        }
    }

    out.join("\n")
}

fn ingredient_line(ingredient: &Value) -> String {
    match ingredient {
        Value::Object(map) => {
            let mut parts = Vec::new();
            if let Some(q) = map.get("quantity").and_then(Value::as_f64) {
                if q != 0.0 {
                    if q.fract() == 0.0 {
                        parts.push(format!("{}", q as i64));
                    } else {
                        parts.push(format!("{}", q));
                    }
                }
            }
            if let Some(unit) = crate::normalize::coerce_name_field(map.get("unit")) {
                parts.push(unit);
            }
            if let Some(food) = crate::normalize::coerce_name_field(map.get("food")) {
                parts.push(food);
            }
            let note = map.get("note").and_then(Value::as_str).unwrap_or("");
            let mut line = format!("- {}", parts.join(" "));
            if !note.is_empty() {
                if parts.is_empty() {
                    line = format!("- {}", note);
                } else {
                    line.push_str(&format!(" ({})", note));
                }
            }
            line
        }
        other => format!("- {}", text_of(other)),
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The current week (Monday through Sunday), every day listed.
pub fn render_week_plan(entries: &[Value], week_start: NaiveDate, today: NaiveDate) -> String {
    let week_end = week_start + Duration::days(6);
    let mut out = vec!["# Current Week's Meal Plan".to_string(), String::new()];
    out.push(format!(
        "**Week of {} - {}**",
        week_start.format("%B %d, %Y"),
        week_end.format("%B %d, %Y")
    ));
    out.push(String::new());

    for offset in 0..7 {
        let day = week_start + Duration::days(offset);
        let day_name = day.format("%A, %B %d");
        if day == today {
            out.push(format!("## {} **(TODAY)**", day_name));
        } else {
            out.push(format!("## {}", day_name));
        }
        out.push(String::new());

        let date_str = day.format("%Y-%m-%d").to_string();
        let day_entries: Vec<Value> = entries
            .iter()
            .filter(|e| e.get("date").and_then(Value::as_str) == Some(date_str.as_str()))
            .cloned()
            .collect();

        if day_entries.is_empty() {
            out.push("*No meals planned*".to_string());
            out.push(String::new());
            continue;
        }

        for (entry_type, bucket) in bucket_by_entry_type(&day_entries) {
            out.push(format!("### {}", capitalize(&entry_type)));
            out.push(String::new());
            for entry in bucket {
                if let Some(recipe) = entry.get("recipe") {
                    match recipe {
                        Value::Object(map) => {
                            let name = map.get("name").and_then(Value::as_str).unwrap_or("Unknown");
                            let slug = map.get("slug").and_then(Value::as_str).unwrap_or("");
                            out.push(format!("- **{}** (`{}`)", name, slug));
                        }
                        Value::Null => {
                            out.push(format!("- {}", entry_title(entry)));
                        }
                        other => out.push(format!("- {}", text_of(other))),
                    }
                } else {
                    out.push(format!("- {}", entry_title(entry)));
                }
                if let Some(note) = entry.get("text").and_then(Value::as_str) {
                    if !note.is_empty() {
                        out.push(format!("  - *Note: {}*", note));
                    }
                }
            }
            out.push(String::new());
        }
    }

    out.join("\n")
}

fn entry_title(entry: &Value) -> String {
    entry
        .get("title")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .unwrap_or("Untitled")
        .to_string()
}

/// Today's meals with recipe details and timing.
pub fn render_today(entries: &[Value], today: NaiveDate) -> String {
    let mut out = vec![
        format!("# Meals for {}", today.format("%A, %B %d, %Y")),
        String::new(),
    ];

    if entries.is_empty() {
        out.push("*No meals planned for today*".to_string());
        return out.join("\n");
    }

    for (entry_type, bucket) in bucket_by_entry_type(entries) {
        out.push(format!("## {}", capitalize(&entry_type)));
        out.push(String::new());

        for entry in bucket {
            match entry.get("recipe") {
                Some(Value::Object(map)) => {
                    let name = map.get("name").and_then(Value::as_str).unwrap_or("Unknown");
                    let slug = map.get("slug").and_then(Value::as_str).unwrap_or("");
                    out.push(format!("### {}", name));
                    out.push(String::new());

                    if let Some(description) = map.get("description").and_then(Value::as_str) {
                        if !description.is_empty() {
                            out.push(format!("*{}*", description));
                            out.push(String::new());
                        }
                    }

                    let timing: Vec<String> = [
                        ("Prep", "prepTime"),
                        ("Cook", "performTime"),
                        ("Total", "totalTime"),
                    ]
                    .iter()
                    .filter_map(|(label, key)| {
                        map.get(*key)
                            .and_then(Value::as_str)
                            .filter(|v| !v.is_empty())
                            .map(|v| format!("- {}: {}", label, v))
                    })
                    .collect();
                    if !timing.is_empty() {
                        out.push("**Timing:**".to_string());
                        out.extend(timing);
                        out.push(String::new());
                    }

                    out.push(format!("*Recipe slug: `{}`*", slug));
                }
                Some(Value::Null) | None => {
                    out.push(format!("- {}", entry_title(entry)));
                }
                Some(other) => out.push(format!("- {}", text_of(other))),
            }

            if let Some(note) = entry.get("text").and_then(Value::as_str) {
                if !note.is_empty() {
                    out.push(format!("**Note:** {}", note));
                }
            }
            out.push(String::new());
        }
    }

    out.join("\n")
}

/// Meals planned for a single date.
pub fn render_date_plan(date: &str, entries: &[Value]) -> String {
    let mut out = vec![format!("# Meals for {}", date), String::new()];

    if entries.is_empty() {
        out.push("*No meals planned for this date*".to_string());
        return out.join("\n");
    }

    for (entry_type, bucket) in bucket_by_entry_type(entries) {
        out.push(format!("## {}", capitalize(&entry_type)));
        out.push(String::new());
        for entry in bucket {
            let recipe = entry.get("recipe");
            let name = recipe
                .and_then(|r| r.get("name"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| entry_title(entry));
            let slug = recipe
                .and_then(|r| r.get("slug"))
                .and_then(Value::as_str)
                .unwrap_or("");
            if slug.is_empty() {
                out.push(format!("- **{}**", name));
            } else {
                out.push(format!("- **{}** (`{}`)", name, slug));
            }
            if let Some(note) = entry.get("text").and_then(Value::as_str) {
                if !note.is_empty() {
                    out.push(format!("  - *Note: {}*", note));
                }
            }
        }
        out.push(String::new());
    }

    out.join("\n")
}

/// Every shopping list with item counts and checked/unchecked breakdown.
pub fn render_shopping_lists(lists: &[Value]) -> String {
    let mut out = vec!["# Shopping Lists".to_string(), String::new()];

    if lists.is_empty() {
        out.push("*No shopping lists found*".to_string());
        return out.join("\n");
    }

    out.push(format!("**Total Lists**: {}", lists.len()));
    out.push(String::new());

    for list in lists {
        let name = list
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("Unnamed List");
        out.push(format!("## {}", name));
        out.push(String::new());

        if let Some(created) = list.get("createdAt").and_then(Value::as_str) {
            if !created.is_empty() {
                out.push(format!("- **Created**: {}", created));
            }
        }
        if let Some(updated) = list.get("updateAt").and_then(Value::as_str) {
            if !updated.is_empty() {
                out.push(format!("- **Last Updated**: {}", updated));
            }
        }

        let items = list
            .get("listItems")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        if items.is_empty() {
            out.push("- **Total Items**: 0".to_string());
            out.push(String::new());
            out.push("*No items in this list*".to_string());
            out.push(String::new());
            continue;
        }

        let checked: Vec<&Value> = items.iter().filter(|i| is_checked(i)).collect();
        let unchecked: Vec<&Value> = items.iter().filter(|i| !is_checked(i)).collect();

        out.push(format!("- **Total Items**: {}", items.len()));
        out.push(format!("- **Completed**: {}/{}", checked.len(), items.len()));
        out.push(String::new());

        if !unchecked.is_empty() {
            out.push("### To Buy".to_string());
            out.push(String::new());
            for item in &unchecked {
                push_item_line(&mut out, item, false);
            }
            out.push(String::new());
        }

        if !checked.is_empty() {
            out.push("### Already Purchased".to_string());
            out.push(String::new());
            for item in &checked {
                push_item_line(&mut out, item, true);
            }
            out.push(String::new());
        }
    }

    out.join("\n")
}

/// A single shopping list with full item detail.
pub fn render_shopping_list_detail(list: &Value) -> String {
    let mut out = Vec::new();

    let name = list
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("Unnamed List");
    out.push(format!("# {}", name));
    out.push(String::new());

    if let Some(created) = list.get("createdAt").and_then(Value::as_str) {
        if !created.is_empty() {
            out.push(format!("**Created**: {}", created));
        }
    }
    if let Some(updated) = list.get("updateAt").and_then(Value::as_str) {
        if !updated.is_empty() {
            out.push(format!("**Last Updated**: {}", updated));
        }
    }
    out.push(String::new());

    let items = list
        .get("listItems")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    if items.is_empty() {
        out.push("*No items in this list*".to_string());
        return out.join("\n");
    }

    let checked: Vec<&Value> = items.iter().filter(|i| is_checked(i)).collect();
    let unchecked: Vec<&Value> = items.iter().filter(|i| !is_checked(i)).collect();

    out.push(format!(
        "**Progress**: {}/{} items completed",
        checked.len(),
        items.len()
    ));
    out.push(String::new());

    if !unchecked.is_empty() {
        out.push("## To Buy".to_string());
        out.push(String::new());
        for item in &unchecked {
            push_item_line(&mut out, item, false);
        }
        out.push(String::new());
    }

    if !checked.is_empty() {
        out.push("## Already Purchased".to_string());
        out.push(String::new());
        for item in &checked {
            push_item_line(&mut out, item, true);
        }
        out.push(String::new());
    }

    out.join("\n")
}

fn is_checked(item: &Value) -> bool {
    item.get("checked").and_then(Value::as_bool).unwrap_or(false)
}

fn push_item_line(out: &mut Vec<String>, item: &Value, checked: bool) {
    let marker = if checked { "x" } else { " " };
    out.push(format!("- [{}] {}", marker, item_display(item)));
    if let Some(note) = item.get("note").and_then(Value::as_str) {
        if !note.is_empty() {
            out.push(format!("  - *{}*", note));
        }
    }
}

/// Monday of the week containing `date`.
pub fn week_start_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}
