//! @acp:module "Recipe Scoring"
//! @acp:summary "Similarity scoring for related-recipe suggestions"
//! @acp:domain brew
//! @acp:layer service

use super::types::Recipe;

/// Points awarded when a candidate shares the reference recipe's category
pub const CATEGORY_MATCH_SCORE: u32 = 10;

/// Points awarded per candidate tag that also appears on the reference recipe
pub const TAG_MATCH_SCORE: u32 = 1;

/// Candidate recipe with its similarity score
#[derive(Debug, Clone, Copy)]
pub struct ScoredRecipe<'a> {
    pub recipe: &'a Recipe,
    pub score: u32,
}

/// Score a single candidate against the reference recipe.
///
/// Tag overlap counts occurrences on the candidate side, so a tag repeated on
/// the candidate scores once per repetition.
pub fn similarity_score(reference: &Recipe, candidate: &Recipe) -> u32 {
    let category = if candidate.category == reference.category {
        CATEGORY_MATCH_SCORE
    } else {
        0
    };

    let shared_tags = candidate
        .tags
        .iter()
        .filter(|tag| reference.tags.contains(tag))
        .count() as u32;

    category + shared_tags * TAG_MATCH_SCORE
}

/// Score every candidate except the reference itself, in catalog order
pub fn score_candidates<'a>(reference: &Recipe, candidates: &'a [Recipe]) -> Vec<ScoredRecipe<'a>> {
    candidates
        .iter()
        .filter(|r| r.id != reference.id)
        .map(|recipe| ScoredRecipe {
            recipe,
            score: similarity_score(reference, recipe),
        })
        .collect()
}

/// Sort by score descending. `sort_by` is stable, so equal scores keep
/// catalog order.
pub fn rank(scored: &mut [ScoredRecipe<'_>]) {
    scored.sort_by(|a, b| b.score.cmp(&a.score));
}
