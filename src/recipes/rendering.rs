//! @acp:module "Panel Rendering"
//! @acp:summary "Template rendering for the recipe card, favorites and preferences panels"
//! @acp:domain brew
//! @acp:layer service

use handlebars::Handlebars;
use serde::Serialize;
use serde_json::{json, Value};

use super::types::{CaffeineFilter, Category, OutputFormat, Recipe, UserPreferences};

const CARD_MARKDOWN: &str = "\
## {{name}}
_{{category_name}} · {{brew_time}}{{#if decaf}} · Decaf{{/if}}{{#if is_favorite}} · ★ Favorite{{/if}}_

{{description}}

### Ingredients
{{#each ingredients}}
- {{this}}
{{/each}}

### Method
{{#each steps}}
{{number}}. {{text}}
{{/each}}
{{#if tags}}

Tags: {{#each tags}}`{{this}}`{{#unless @last}} {{/unless}}{{/each}}
{{/if}}
{{#if similar}}

### You might also like
{{#each similar}}
- **{{name}}** ({{category_name}}) `{{id}}`
{{/each}}
{{/if}}";

const CARD_COMPACT: &str = "{{name}} [{{category_name}}, {{brew_time}}]{{#if decaf}} decaf{{/if}}{{#if is_favorite}} *{{/if}} ({{id}})";

const FAVORITES_MARKDOWN: &str = "\
## Favorites
{{#if recipes}}
{{#each recipes}}
- **{{name}}** ({{category_name}}) `{{id}}`
{{/each}}
{{else}}
No favorites yet. Star a recipe to save it here.
{{/if}}";

const FAVORITES_COMPACT: &str = "Favorites: {{#if recipes}}{{#each recipes}}{{name}}{{#unless @last}} | {{/unless}}{{/each}}{{else}}none{{/if}}";

const PREFERENCES_MARKDOWN: &str = "\
## Preferences

### Coffee categories
{{#each categories}}
- [{{#if selected}}x{{else}} {{/if}}] {{name}} (`{{id}}`)
{{/each}}
{{#unless any_selected}}
_No category selected: every category is eligible._
{{/unless}}

### Caffeine
{{#each caffeine}}
- ({{#if selected}}•{{else}} {{/if}}) {{label}}
{{/each}}";

const PREFERENCES_COMPACT: &str = "Categories: {{#if any_selected}}{{#each categories}}{{#if selected}}{{id}} {{/if}}{{/each}}{{else}}all {{/if}}| Caffeine: {{caffeine_filter}}";

/// Recipe card view: the shown recipe plus related suggestions
#[derive(Debug, Clone, Serialize)]
pub struct RecipeCard {
    pub recipe: Recipe,
    pub is_favorite: bool,
    pub similar: Vec<Recipe>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FavoritesView {
    pub recipes: Vec<Recipe>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreferencesView {
    pub preferences: UserPreferences,
}

/// Renderer for panel views
pub struct PanelRenderer<'a> {
    handlebars: Handlebars<'a>,
    format: OutputFormat,
}

impl<'a> PanelRenderer<'a> {
    pub fn new(format: OutputFormat) -> Self {
        let mut handlebars = Handlebars::new();
        // Output is Markdown or plain text, never HTML
        handlebars.register_escape_fn(handlebars::no_escape);

        Self { handlebars, format }
    }

    pub fn render_card(&self, card: &RecipeCard) -> Result<String, RenderError> {
        match self.format {
            OutputFormat::Json => to_json(card),
            OutputFormat::Markdown => self.render_template(CARD_MARKDOWN, &card_context(card)),
            OutputFormat::Compact => self.render_template(CARD_COMPACT, &card_context(card)),
        }
    }

    pub fn render_favorites(&self, view: &FavoritesView) -> Result<String, RenderError> {
        let context = json!({
            "recipes": view.recipes.iter().map(summary_context).collect::<Vec<_>>(),
        });

        match self.format {
            OutputFormat::Json => to_json(view),
            OutputFormat::Markdown => self.render_template(FAVORITES_MARKDOWN, &context),
            OutputFormat::Compact => self.render_template(FAVORITES_COMPACT, &context),
        }
    }

    pub fn render_preferences(&self, view: &PreferencesView) -> Result<String, RenderError> {
        let prefs = &view.preferences;
        let categories: Vec<Value> = Category::ALL
            .iter()
            .map(|c| {
                json!({
                    "id": c.as_str(),
                    "name": c.display_name(),
                    "selected": prefs.preferred_categories.contains(c),
                })
            })
            .collect();
        let caffeine: Vec<Value> = [
            (CaffeineFilter::All, "All"),
            (CaffeineFilter::Caffeinated, "Caffeinated only"),
            (CaffeineFilter::Decaf, "Decaf only"),
        ]
        .iter()
        .map(|(filter, label)| {
            json!({
                "label": label,
                "selected": *filter == prefs.caffeine_filter,
            })
        })
        .collect();

        let context = json!({
            "categories": categories,
            "any_selected": !prefs.preferred_categories.is_empty(),
            "caffeine": caffeine,
            "caffeine_filter": prefs.caffeine_filter.as_str(),
        });

        match self.format {
            OutputFormat::Json => to_json(view),
            OutputFormat::Markdown => self.render_template(PREFERENCES_MARKDOWN, &context),
            OutputFormat::Compact => self.render_template(PREFERENCES_COMPACT, &context),
        }
    }

    /// Render a handlebars template with data
    fn render_template(&self, template: &str, data: &Value) -> Result<String, RenderError> {
        self.handlebars
            .render_template(template, data)
            .map(|s| s.trim_end().to_string())
            .map_err(|e| RenderError::Template(e.to_string()))
    }
}

/// "12h", "4min", "1d": whole units, rounded
pub fn format_brew_time(minutes: u32) -> String {
    if minutes >= 1440 {
        format!("{}d", (f64::from(minutes) / 1440.0).round())
    } else if minutes >= 60 {
        format!("{}h", (f64::from(minutes) / 60.0).round())
    } else {
        format!("{}min", minutes)
    }
}

fn card_context(card: &RecipeCard) -> Value {
    let recipe = &card.recipe;
    let ingredients: Vec<String> = recipe
        .ingredients
        .iter()
        .map(|i| {
            let suffix = if i.optional { " (optional)" } else { "" };
            format!("{} {}{}", i.amount, i.name, suffix)
        })
        .collect();
    let steps: Vec<Value> = recipe
        .steps
        .iter()
        .enumerate()
        .map(|(i, text)| json!({ "number": i + 1, "text": text }))
        .collect();

    json!({
        "id": recipe.id,
        "name": recipe.name,
        "category_name": recipe.category.display_name(),
        "brew_time": format_brew_time(recipe.brew_time_minutes),
        "decaf": !recipe.caffeinated,
        "is_favorite": card.is_favorite,
        "description": recipe.description,
        "ingredients": ingredients,
        "steps": steps,
        "tags": recipe.tags,
        "similar": card.similar.iter().map(summary_context).collect::<Vec<_>>(),
    })
}

fn summary_context(recipe: &Recipe) -> Value {
    json!({
        "id": recipe.id,
        "name": recipe.name,
        "category_name": recipe.category.display_name(),
    })
}

fn to_json<T: Serialize>(value: &T) -> Result<String, RenderError> {
    serde_json::to_string_pretty(value).map_err(|e| RenderError::Serialize(e.to_string()))
}

/// Render error types
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(String),
    #[error("Failed to serialize view: {0}")]
    Serialize(String),
}
