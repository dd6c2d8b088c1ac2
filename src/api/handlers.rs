use axum::{
    extract::{Query, State},
    Json,
};
use tracing::debug;

use crate::{
    api::models::*,
    db,
    search::{self, SearchRequest, SortMode},
    Result,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: db::DbPool,
    pub settings: crate::config::Settings,
}

/// GET /api/search - Full paginated recipe search
pub async fn search_recipes(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>> {
    debug!("Search request: {:?}", params);

    let limit = params
        .limit
        .unwrap_or(state.settings.pagination.default_limit)
        .min(state.settings.pagination.api_max_limit);

    let request = SearchRequest {
        query: params.q.clone(),
        page: params.page,
        limit,
        category: params.category,
        sort: SortMode::parse(params.sort.as_deref().unwrap_or_default()),
    };

    // An empty query is rejected by the core before any store access
    let results = search::search(&state.pool, &request).await?;

    Ok(Json(SearchResponse {
        success: true,
        data: SearchData {
            recipes: results.recipes,
            pagination: results.pagination,
            query: params.q,
            suggestions: results.suggestions,
        },
    }))
}

/// GET /api/search/instant - Type-ahead search. Sub-2-character queries
/// always get a 200 with the empty shape.
pub async fn instant_search(
    State(state): State<AppState>,
    Query(params): Query<InstantSearchParams>,
) -> Result<Json<InstantSearchResponse>> {
    debug!("Instant search request: {:?}", params);

    let limit = params
        .limit
        .unwrap_or(state.settings.search.instant_limit)
        .min(state.settings.pagination.api_max_limit);

    let results = search::instant_search(&state.pool, &params.q, limit).await?;

    Ok(Json(InstantSearchResponse {
        success: true,
        data: InstantSearchData {
            recipes: results.recipes,
            suggestions: results.suggestions,
            query: params.q,
        },
    }))
}

/// GET /api/cuisines - The known-cuisine catalogue
pub async fn list_cuisines(State(state): State<AppState>) -> Result<Json<CuisinesResponse>> {
    let cuisines = db::cuisines::all_cuisines(&state.pool).await?;

    Ok(Json(CuisinesResponse {
        success: true,
        data: cuisines,
    }))
}

/// GET /api/stats - Get system statistics
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Stats>> {
    debug!("Get stats request");

    let total_recipes = db::recipes::count_all_recipes(&state.pool).await?;
    let total_users = db::users::count_users(&state.pool).await?;
    let total_tags = db::tags::count_tags(&state.pool).await?;
    let total_ingredients = db::ingredients::count_ingredients(&state.pool).await?;

    Ok(Json(Stats {
        total_recipes,
        total_users,
        total_tags,
        total_ingredients,
    }))
}

/// GET /health - Health check endpoint
pub async fn health_check() -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}

/// GET /ready - Readiness check endpoint
pub async fn readiness_check(State(state): State<AppState>) -> Result<Json<ReadinessResponse>> {
    let db_healthy = sqlx::query("SELECT 1").fetch_one(&state.pool).await.is_ok();

    Ok(Json(ReadinessResponse {
        ready: db_healthy,
        database: if db_healthy { "ok" } else { "error" }.to_string(),
    }))
}
