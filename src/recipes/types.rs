//! @acp:module "Recipe Types"
//! @acp:summary "Core data structures for recipes and user preferences"
//! @acp:domain brew
//! @acp:layer model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format for panel rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Compact,
    Json,
}

impl OutputFormat {
    /// Lenient parse used by tool parameters; unknown values fall back to Markdown
    pub fn parse_lenient(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "compact" => Self::Compact,
            "json" => Self::Json,
            _ => Self::Markdown,
        }
    }
}

/// Closed set of recipe categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    ColdBrew,
    PourOver,
    Espresso,
    EspressoTonic,
    Latte,
    IcedCoffee,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Self::ColdBrew,
        Self::PourOver,
        Self::Espresso,
        Self::EspressoTonic,
        Self::Latte,
        Self::IcedCoffee,
    ];

    /// Wire identifier (e.g. "cold-brew")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ColdBrew => "cold-brew",
            Self::PourOver => "pour-over",
            Self::Espresso => "espresso",
            Self::EspressoTonic => "espresso-tonic",
            Self::Latte => "latte",
            Self::IcedCoffee => "iced-coffee",
        }
    }

    /// Human-readable label
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ColdBrew => "Cold Brew",
            Self::PourOver => "Pour Over",
            Self::Espresso => "Espresso",
            Self::EspressoTonic => "Espresso Tonic",
            Self::Latte => "Latte",
            Self::IcedCoffee => "Iced Coffee",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

/// Caffeine constraint applied when filtering the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaffeineFilter {
    #[default]
    All,
    Caffeinated,
    Decaf,
}

impl CaffeineFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Caffeinated => "caffeinated",
            Self::Decaf => "decaf",
        }
    }

    /// Whether a recipe with the given caffeine attribute passes this filter
    pub fn allows(&self, caffeinated: bool) -> bool {
        match self {
            Self::All => true,
            Self::Caffeinated => caffeinated,
            Self::Decaf => !caffeinated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown caffeine filter: {0} (expected all, caffeinated or decaf)")]
pub struct ParseCaffeineError(pub String);

impl FromStr for CaffeineFilter {
    type Err = ParseCaffeineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "caffeinated" => Ok(Self::Caffeinated),
            "decaf" => Ok(Self::Decaf),
            _ => Err(ParseCaffeineError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub amount: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
}

/// A recipe record. Only `id`, `category`, `tags` and `caffeinated` drive
/// selection; the rest is carried through for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub tags: Vec<String>,
    pub caffeinated: bool,
    #[serde(default)]
    pub brew_time_minutes: u32,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
}

/// User-controlled filters for the candidate pool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    /// Empty means no category restriction
    #[serde(default)]
    pub preferred_categories: Vec<Category>,
    #[serde(default)]
    pub caffeine_filter: CaffeineFilter,
}

impl UserPreferences {
    pub fn matches(&self, recipe: &Recipe) -> bool {
        if !self.preferred_categories.is_empty()
            && !self.preferred_categories.contains(&recipe.category)
        {
            return false;
        }
        self.caffeine_filter.allows(recipe.caffeinated)
    }
}
