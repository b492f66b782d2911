//! @acp:module "MCP Tools"
//! @acp:summary "Tool definitions, parameter and response types"
//! @acp:domain brew
//! @acp:layer transport

use std::sync::Arc;

use rmcp::{model::Tool, schemars};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct DailyRecipeParams {
    /// Date key "YYYY-MM-DD" (default: today, local time)
    #[serde(default)]
    pub date: Option<String>,
    /// Output format: "markdown", "compact", or "json" (default: configured format)
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct SurpriseParams {
    /// Recipe currently on screen, never picked again when there is an alternative
    /// (default: the last shown recipe)
    #[serde(default)]
    pub current_recipe_id: Option<String>,
    /// Output format: "markdown", "compact", or "json"
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetRecipeParams {
    /// Recipe id (e.g., "classic-cold-brew")
    pub id: String,
    /// Output format: "markdown", "compact", or "json"
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SimilarRecipesParams {
    /// Recipe id to find related recipes for
    pub id: String,
    /// Maximum number of results (default: configured similar count)
    #[serde(default)]
    pub count: Option<usize>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListRecipesParams {
    /// Only recipes in this category (e.g., "cold-brew")
    #[serde(default)]
    pub category: Option<String>,
    /// Caffeine filter: "all", "caffeinated", or "decaf" (default: "all")
    #[serde(default)]
    pub caffeine: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ToggleFavoriteParams {
    /// Recipe id to add to or remove from favorites
    pub id: String,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct FormatParams {
    /// Output format: "markdown", "compact", or "json"
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct UpdatePreferencesParams {
    /// Preferred categories; an empty list allows every category
    #[serde(default)]
    pub preferred_categories: Option<Vec<String>>,
    /// Caffeine filter: "all", "caffeinated", or "decaf"
    #[serde(default)]
    pub caffeine_filter: Option<String>,
    /// Output format for the returned panel
    #[serde(default)]
    pub format: Option<String>,
}

/// A recipe pick rendered as a card
#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub recipe_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub cached: bool,
    pub full_catalog_fallback: bool,
    pub repeated: bool,
    pub is_favorite: bool,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct RecipeSummary {
    pub id: String,
    pub name: String,
    pub category: String,
    pub caffeinated: bool,
    pub brew_time: String,
}

#[derive(Debug, Serialize)]
pub struct CategorySummary {
    pub id: String,
    pub name: String,
    pub recipe_count: usize,
}

#[derive(Debug, Serialize)]
pub struct FavoriteToggled {
    pub id: String,
    pub is_favorite: bool,
}

#[derive(Debug, Serialize)]
pub struct PanelResponse<T: Serialize> {
    #[serde(flatten)]
    pub data: T,
    pub content: String,
}

/// Convert a schemars Schema to a JsonObject for rmcp Tool
fn schema_to_json_object<T: JsonSchema>() -> Arc<serde_json::Map<String, serde_json::Value>> {
    let schema = schemars::schema_for!(T);
    match serde_json::to_value(&schema) {
        Ok(serde_json::Value::Object(map)) => Arc::new(map),
        _ => Arc::new(serde_json::Map::new()),
    }
}

fn empty_schema() -> Arc<serde_json::Map<String, serde_json::Value>> {
    let mut map = serde_json::Map::new();
    map.insert(
        "type".to_string(),
        serde_json::Value::String("object".to_string()),
    );
    Arc::new(map)
}

pub fn build_tools() -> Vec<Tool> {
    vec![
        Tool::new(
            "brew_daily_recipe",
            "Get today's coffee recipe. The pick is fixed for a calendar date, respects the user's preferences, and avoids repeating the previously shown recipe.",
            schema_to_json_object::<DailyRecipeParams>(),
        ),
        Tool::new(
            "brew_surprise_me",
            "Pick a random recipe other than the one currently shown, within the user's preferences.",
            schema_to_json_object::<SurpriseParams>(),
        ),
        Tool::new(
            "brew_get_recipe",
            "Get the full recipe card (ingredients, method, related recipes) for a recipe id.",
            schema_to_json_object::<GetRecipeParams>(),
        ),
        Tool::new(
            "brew_similar_recipes",
            "List recipes related to a recipe: same category first, then shared tags.",
            schema_to_json_object::<SimilarRecipesParams>(),
        ),
        Tool::new(
            "brew_list_categories",
            "List the coffee categories present in the catalog with recipe counts.",
            empty_schema(),
        ),
        Tool::new(
            "brew_list_recipes",
            "List recipes, optionally filtered by category and caffeine.",
            schema_to_json_object::<ListRecipesParams>(),
        ),
        Tool::new(
            "brew_toggle_favorite",
            "Add a recipe to favorites, or remove it if it is already a favorite.",
            schema_to_json_object::<ToggleFavoriteParams>(),
        ),
        Tool::new(
            "brew_favorites",
            "Show the user's favorite recipes.",
            schema_to_json_object::<FormatParams>(),
        ),
        Tool::new(
            "brew_get_preferences",
            "Show the user's category and caffeine preferences.",
            schema_to_json_object::<FormatParams>(),
        ),
        Tool::new(
            "brew_update_preferences",
            "Update category and/or caffeine preferences. Omitted fields keep their current value.",
            schema_to_json_object::<UpdatePreferencesParams>(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_names_are_unique() {
        let tools = build_tools();
        let mut names: Vec<&str> = tools.iter().map(|t| t.name.as_ref()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), tools.len());
    }

    #[test]
    fn test_tool_schemas_are_objects() {
        for tool in build_tools() {
            assert_eq!(
                tool.input_schema.get("type").and_then(|v| v.as_str()),
                Some("object"),
                "{} schema",
                tool.name
            );
        }
    }
}
