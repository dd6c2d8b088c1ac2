use crate::db::{cuisines, ingredients, recipes, tags, DbPool};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

// Per-category caps for full-search suggestions (no shared global cap)
const SEARCH_TAG_CAP: i64 = 5;
const SEARCH_CUISINE_CAP: i64 = 3;
const SEARCH_INGREDIENT_CAP: i64 = 5;

// Instant suggestions: 3 per category, 6 total after merging
const INSTANT_CATEGORY_CAP: i64 = 3;
const INSTANT_TOTAL_CAP: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Tag,
    Cuisine,
    Ingredient,
}

/// An autocomplete/refinement hint offered alongside search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub suggestion: String,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
}

fn absorb(result: Result<Vec<String>>, kind: SuggestionKind) -> Vec<Suggestion> {
    match result {
        Ok(values) => values
            .into_iter()
            .map(|suggestion| Suggestion { suggestion, kind })
            .collect(),
        // A failing category degrades to no suggestions for that category
        // only; the parent search still succeeds
        Err(e) => {
            warn!("{:?} suggestions unavailable: {}", kind, e.log_safe());
            Vec::new()
        }
    }
}

/// Suggestions for the full paginated search: top matching tags, cuisines,
/// and ingredients by usage frequency, concatenated in that order. The
/// same string may legitimately appear under two different types.
pub async fn search_suggestions(pool: &DbPool, pattern: &str) -> Vec<Suggestion> {
    let (tag_values, cuisine_values, ingredient_values) = futures::join!(
        tags::top_tags_matching(pool, pattern, SEARCH_TAG_CAP),
        recipes::top_cuisines_matching(pool, pattern, SEARCH_CUISINE_CAP),
        ingredients::top_ingredients_matching(pool, pattern, SEARCH_INGREDIENT_CAP),
    );

    let mut suggestions = absorb(tag_values, SuggestionKind::Tag);
    suggestions.extend(absorb(cuisine_values, SuggestionKind::Cuisine));
    suggestions.extend(absorb(ingredient_values, SuggestionKind::Ingredient));
    suggestions
}

/// Quick suggestions for instant search. Cuisines come from the known
/// cuisine catalogue and lead the merge order; the merged list is capped
/// at six entries.
pub async fn instant_suggestions(pool: &DbPool, pattern: &str) -> Vec<Suggestion> {
    let (cuisine_values, tag_values, ingredient_values) = futures::join!(
        cuisines::cuisines_matching(pool, pattern, INSTANT_CATEGORY_CAP),
        tags::top_tags_matching(pool, pattern, INSTANT_CATEGORY_CAP),
        ingredients::top_ingredients_matching(pool, pattern, INSTANT_CATEGORY_CAP),
    );

    let mut suggestions = absorb(cuisine_values, SuggestionKind::Cuisine);
    suggestions.extend(absorb(tag_values, SuggestionKind::Tag));
    suggestions.extend(absorb(ingredient_values, SuggestionKind::Ingredient));
    suggestions.truncate(INSTANT_TOTAL_CAP);
    suggestions
}
