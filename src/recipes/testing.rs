//! Test fixtures shared by the recipe modules.

use super::catalog::Catalog;
use super::types::{Category, Recipe};

pub fn recipe(id: &str, category: Category, tags: &[&str], caffeinated: bool) -> Recipe {
    Recipe {
        id: id.to_string(),
        name: id.to_string(),
        category,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        caffeinated,
        brew_time_minutes: 3,
        ingredients: vec![],
        steps: vec!["Step 1".to_string()],
        image: format!("images/{}.svg", category),
        description: id.to_string(),
    }
}

/// Four recipes: three caffeinated in distinct categories, one decaf latte
pub fn small_catalog() -> Catalog {
    Catalog::new(vec![
        recipe("recipe-a", Category::ColdBrew, &["iced"], true),
        recipe("recipe-b", Category::Espresso, &["hot", "strong"], true),
        recipe("recipe-c", Category::Latte, &["hot", "milk-based"], true),
        recipe("recipe-d", Category::Latte, &["hot", "decaf"], false),
    ])
}

/// Five recipes mirroring a realistic spread of categories and caffeine
pub fn mixed_catalog() -> Catalog {
    Catalog::new(vec![
        recipe("test-cold-brew", Category::ColdBrew, &["iced", "strong", "simple"], true),
        recipe("test-decaf-cold-brew", Category::ColdBrew, &["iced", "decaf", "smooth"], false),
        recipe("test-espresso", Category::Espresso, &["hot", "strong", "quick"], true),
        recipe("test-latte", Category::Latte, &["hot", "milk-based", "creamy"], true),
        recipe("test-decaf-latte", Category::Latte, &["hot", "milk-based", "decaf"], false),
    ])
}
