use crate::search::{Pagination, ScoredRecipe, Suggestion};
use serde::{Deserialize, Serialize};

/// Full search request parameters
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
}

/// Instant search request parameters
#[derive(Debug, Clone, Deserialize)]
pub struct InstantSearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

fn default_page() -> usize {
    1
}

/// Full search response envelope
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub data: SearchData,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchData {
    pub recipes: Vec<ScoredRecipe>,
    pub pagination: Pagination,
    pub query: String,
    pub suggestions: Vec<Suggestion>,
}

/// Instant search response envelope
#[derive(Debug, Clone, Serialize)]
pub struct InstantSearchResponse {
    pub success: bool,
    pub data: InstantSearchData,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstantSearchData {
    pub recipes: Vec<ScoredRecipe>,
    pub suggestions: Vec<Suggestion>,
    pub query: String,
}

/// Cuisine catalogue response
#[derive(Debug, Clone, Serialize)]
pub struct CuisinesResponse {
    pub success: bool,
    pub data: Vec<String>,
}

/// System statistics
#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub total_recipes: i64,
    pub total_users: i64,
    pub total_tags: i64,
    pub total_ingredients: i64,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub database: String,
}
