use crate::db::models::{RecipeIngredient, RecipeSearchRow};

/// Per-field contributions to a recipe's relevance score. Fixed bonuses
/// apply once per matching field; `per_ingredient` and `per_tag` apply
/// once per matching entry.
#[derive(Debug, Clone, Copy)]
pub struct ScoreWeights {
    pub title: i64,
    pub description: i64,
    pub cuisine: i64,
    pub per_ingredient: i64,
    pub per_tag: i64,
}

/// Weight table for the full paginated search
pub const RELEVANCE_WEIGHTS: ScoreWeights = ScoreWeights {
    title: 10,
    description: 5,
    cuisine: 0,
    per_ingredient: 1,
    per_tag: 1,
};

/// Weight table for instant search, tuned to front-load exact-looking
/// matches while typing
pub const INSTANT_WEIGHTS: ScoreWeights = ScoreWeights {
    title: 10,
    description: 2,
    cuisine: 8,
    per_ingredient: 3,
    per_tag: 0,
};

/// Case-insensitive substring test. `needle_lower` must already be
/// lowercased by the caller.
pub fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn opt_contains_ci(haystack: &Option<String>, needle_lower: &str) -> bool {
    haystack
        .as_deref()
        .is_some_and(|h| contains_ci(h, needle_lower))
}

/// Score a candidate recipe against a query. Pure function of its inputs;
/// absent fields simply contribute nothing.
pub fn score_recipe(
    row: &RecipeSearchRow,
    tags: &[String],
    ingredients: &[RecipeIngredient],
    needle_lower: &str,
    weights: &ScoreWeights,
) -> i64 {
    let mut score = 0;

    if contains_ci(&row.title, needle_lower) {
        score += weights.title;
    }
    if opt_contains_ci(&row.description, needle_lower) {
        score += weights.description;
    }
    if opt_contains_ci(&row.cuisine, needle_lower) {
        score += weights.cuisine;
    }

    let ingredient_matches = ingredients
        .iter()
        .filter(|i| contains_ci(&i.name, needle_lower))
        .count() as i64;
    score += ingredient_matches * weights.per_ingredient;

    let tag_matches = tags
        .iter()
        .filter(|t| contains_ci(t, needle_lower))
        .count() as i64;
    score += tag_matches * weights.per_tag;

    score
}

/// The subsequence of ingredient lines whose name matches the query,
/// attached to instant-search results
pub fn matched_ingredients(
    ingredients: &[RecipeIngredient],
    needle_lower: &str,
) -> Vec<RecipeIngredient> {
    ingredients
        .iter()
        .filter(|i| contains_ci(&i.name, needle_lower))
        .cloned()
        .collect()
}
