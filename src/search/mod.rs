//! The search core: a filter → score → rank → shape pipeline shared by
//! the full paginated search and the instant (type-ahead) variant.
//!
//! Filtering happens in the store as an escaped `LIKE` scan; scoring,
//! sorting and pagination run in application code so the ranking model is
//! an explicit function rather than a query-engine artifact. Everything
//! here is read-only and stateless between calls.

pub mod scoring;
pub mod suggest;

use crate::db::models::{RecipeIngredient, RecipeSearchRow};
use crate::db::{ingredients, like_pattern, recipes, tags, DbPool};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use scoring::{ScoreWeights, INSTANT_WEIGHTS, RELEVANCE_WEIGHTS};
pub use suggest::{Suggestion, SuggestionKind};

/// Queries shorter than this (after trimming) short-circuit instant
/// search to an empty response without touching the store
pub const INSTANT_MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Relevance,
    Newest,
    Oldest,
    Rating,
    Popular,
}

impl SortMode {
    /// Parse a wire-level sort value; unrecognized values fall back to
    /// relevance ordering
    pub fn parse(value: &str) -> SortMode {
        match value {
            "newest" => SortMode::Newest,
            "oldest" => SortMode::Oldest,
            "rating" => SortMode::Rating,
            "popular" => SortMode::Popular,
            _ => SortMode::Relevance,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub page: usize,
    pub limit: usize,
    pub category: Option<String>,
    pub sort: SortMode,
}

/// Author fields projected into results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub name: Option<String>,
    pub avatar: Option<String>,
}

/// A recipe with its computed relevance score, projected down to the
/// whitelisted result fields. Scores are only comparable within a single
/// request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredRecipe {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub prep_time: Option<i64>,
    pub cook_time: Option<i64>,
    pub servings: Option<i64>,
    pub difficulty: Option<String>,
    pub cuisine: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub average_rating: Option<f64>,
    pub likes_count: i64,
    pub created_at: DateTime<Utc>,
    pub author: Author,
    pub relevance_score: i64,
    /// Instant search only: the ingredient lines whose name matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_ingredients: Option<Vec<RecipeIngredient>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub recipes: Vec<ScoredRecipe>,
    pub pagination: Pagination,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstantResults {
    pub recipes: Vec<ScoredRecipe>,
    pub suggestions: Vec<Suggestion>,
}

/// A filtered recipe with its tag and ingredient detail loaded, ready for
/// scoring
struct Candidate {
    row: RecipeSearchRow,
    tags: Vec<String>,
    ingredients: Vec<RecipeIngredient>,
}

async fn load_candidates(
    pool: &DbPool,
    pattern: &str,
    category: Option<&str>,
) -> Result<Vec<Candidate>> {
    let rows = recipes::search_candidates(pool, pattern, category).await?;
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();

    // Tag and ingredient detail loads are independent
    let (mut tags_map, mut ingredients_map) = futures::try_join!(
        tags::get_tags_for_recipes(pool, &ids),
        ingredients::get_ingredients_for_recipes(pool, &ids),
    )?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let tags = tags_map.remove(&row.id).unwrap_or_default();
            let ingredients = ingredients_map.remove(&row.id).unwrap_or_default();
            Candidate {
                row,
                tags,
                ingredients,
            }
        })
        .collect())
}

/// Score candidates and project them into result shape. The same routine
/// serves both variants; only the weight table and the matched-ingredient
/// flag differ, so the two scoring models cannot drift structurally.
fn score_candidates(
    candidates: Vec<Candidate>,
    query_lower: &str,
    weights: &ScoreWeights,
    include_matched_ingredients: bool,
) -> Vec<ScoredRecipe> {
    candidates
        .into_iter()
        .map(|candidate| {
            let relevance_score = scoring::score_recipe(
                &candidate.row,
                &candidate.tags,
                &candidate.ingredients,
                query_lower,
                weights,
            );

            let matched_ingredients = include_matched_ingredients
                .then(|| scoring::matched_ingredients(&candidate.ingredients, query_lower));

            let row = candidate.row;
            ScoredRecipe {
                id: row.id,
                title: row.title,
                description: row.description,
                image: row.image,
                prep_time: row.prep_time_minutes,
                cook_time: row.cook_time_minutes,
                servings: row.servings,
                difficulty: row.difficulty,
                cuisine: row.cuisine,
                category: row.category,
                tags: candidate.tags,
                average_rating: row.average_rating,
                likes_count: row.likes_count,
                created_at: row.created_at,
                author: Author {
                    name: row.author_name,
                    avatar: row.author_avatar,
                },
                relevance_score,
                matched_ingredients,
            }
        })
        .collect()
}

// Null ratings rank below every real rating when sorting descending
fn rating_key(recipe: &ScoredRecipe) -> f64 {
    recipe.average_rating.unwrap_or(-1.0)
}

fn sort_results(results: &mut [ScoredRecipe], sort: SortMode) {
    match sort {
        SortMode::Relevance => results.sort_by(|a, b| {
            b.relevance_score
                .cmp(&a.relevance_score)
                .then_with(|| b.created_at.cmp(&a.created_at))
        }),
        SortMode::Newest => results.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortMode::Oldest => results.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortMode::Rating => results.sort_by(|a, b| {
            rating_key(b)
                .total_cmp(&rating_key(a))
                .then_with(|| b.created_at.cmp(&a.created_at))
        }),
        SortMode::Popular => results.sort_by(|a, b| {
            b.likes_count
                .cmp(&a.likes_count)
                .then_with(|| b.created_at.cmp(&a.created_at))
        }),
    }
}

/// Full paginated search: filter, score (relevance weights), sort by the
/// requested mode, slice the requested page, and attach suggestions.
///
/// The scan and the total count are independent store reads and run
/// concurrently; the count is never derived from the page window.
pub async fn search(pool: &DbPool, request: &SearchRequest) -> Result<SearchResults> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(Error::Validation("Search query is required".to_string()));
    }

    let page = request.page.max(1);
    let limit = request.limit.max(1);
    let pattern = like_pattern(query);
    let query_lower = query.to_lowercase();
    let category = request.category.as_deref();

    let (candidates, total) = futures::try_join!(
        load_candidates(pool, &pattern, category),
        recipes::count_search_matches(pool, &pattern, category),
    )?;

    let mut results = score_candidates(candidates, &query_lower, &RELEVANCE_WEIGHTS, false);
    sort_results(&mut results, request.sort);

    let total = total as usize;
    let total_pages = total.div_ceil(limit);
    // page and limit are caller-controlled; the window math must not overflow
    let offset = page.saturating_sub(1).saturating_mul(limit);
    let recipes: Vec<ScoredRecipe> = results.into_iter().skip(offset).take(limit).collect();

    let suggestions = suggest::search_suggestions(pool, &pattern).await;

    Ok(SearchResults {
        recipes,
        pagination: Pagination {
            page,
            limit,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        },
        suggestions,
    })
}

/// Instant search: small fixed result cap, instant weight table, fixed
/// sort (score, then rating, then recency), matched ingredients attached,
/// no pagination metadata. Sub-2-character queries return the empty shape
/// without any store access.
pub async fn instant_search(pool: &DbPool, query: &str, limit: usize) -> Result<InstantResults> {
    let trimmed = query.trim();
    if trimmed.chars().count() < INSTANT_MIN_QUERY_CHARS {
        return Ok(InstantResults {
            recipes: Vec::new(),
            suggestions: Vec::new(),
        });
    }

    let pattern = like_pattern(trimmed);
    let query_lower = trimmed.to_lowercase();

    let candidates = load_candidates(pool, &pattern, None).await?;
    let mut results = score_candidates(candidates, &query_lower, &INSTANT_WEIGHTS, true);

    results.sort_by(|a, b| {
        b.relevance_score
            .cmp(&a.relevance_score)
            .then_with(|| rating_key(b).total_cmp(&rating_key(a)))
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    results.truncate(limit.max(1));

    let suggestions = suggest::instant_suggestions(pool, &pattern).await;

    Ok(InstantResults {
        recipes: results,
        suggestions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_mode_parse_falls_back_to_relevance() {
        assert_eq!(SortMode::parse("newest"), SortMode::Newest);
        assert_eq!(SortMode::parse("popular"), SortMode::Popular);
        assert_eq!(SortMode::parse("relevance"), SortMode::Relevance);
        assert_eq!(SortMode::parse("bogus"), SortMode::Relevance);
        assert_eq!(SortMode::parse(""), SortMode::Relevance);
    }

    fn scored(id: i64, score: i64, rating: Option<f64>, likes: i64, ts: i64) -> ScoredRecipe {
        ScoredRecipe {
            id,
            title: format!("recipe-{id}"),
            description: None,
            image: None,
            prep_time: None,
            cook_time: None,
            servings: None,
            difficulty: None,
            cuisine: None,
            category: None,
            tags: Vec::new(),
            average_rating: rating,
            likes_count: likes,
            created_at: DateTime::from_timestamp(ts, 0).unwrap(),
            author: Author {
                name: None,
                avatar: None,
            },
            relevance_score: score,
            matched_ingredients: None,
        }
    }

    #[test]
    fn test_relevance_sort_breaks_ties_by_recency() {
        let mut results = vec![
            scored(1, 5, None, 0, 100),
            scored(2, 10, None, 0, 100),
            scored(3, 5, None, 0, 200),
        ];
        sort_results(&mut results, SortMode::Relevance);
        let ids: Vec<i64> = results.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_rating_sort_places_unrated_last() {
        let mut results = vec![
            scored(1, 0, None, 0, 300),
            scored(2, 0, Some(4.5), 0, 100),
            scored(3, 0, Some(3.0), 0, 200),
        ];
        sort_results(&mut results, SortMode::Rating);
        let ids: Vec<i64> = results.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_oldest_sort_is_ascending() {
        let mut results = vec![scored(1, 0, None, 0, 300), scored(2, 0, None, 0, 100)];
        sort_results(&mut results, SortMode::Oldest);
        let ids: Vec<i64> = results.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_popular_sort_uses_likes() {
        let mut results = vec![
            scored(1, 0, None, 3, 100),
            scored(2, 0, None, 7, 100),
            scored(3, 0, None, 3, 200),
        ];
        sort_results(&mut results, SortMode::Popular);
        let ids: Vec<i64> = results.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
