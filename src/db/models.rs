use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: i64,
    pub user_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub prep_time_minutes: Option<i64>,
    pub cook_time_minutes: Option<i64>,
    pub servings: Option<i64>,
    pub difficulty: Option<String>,
    pub cuisine: Option<String>,
    pub category: Option<String>,
    pub average_rating: Option<f64>,
    pub likes_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecipe {
    pub user_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub prep_time_minutes: Option<i64>,
    pub cook_time_minutes: Option<i64>,
    pub servings: Option<i64>,
    pub difficulty: Option<String>,
    pub cuisine: Option<String>,
    pub category: Option<String>,
    pub average_rating: Option<f64>,
    pub likes_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A recipe's ingredient line: name plus optional quantity and unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RecipeIngredient {
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
}

/// One row of the search candidate scan: recipe columns joined with the
/// author projection (name and avatar only)
#[derive(Debug, Clone, FromRow)]
pub struct RecipeSearchRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub prep_time_minutes: Option<i64>,
    pub cook_time_minutes: Option<i64>,
    pub servings: Option<i64>,
    pub difficulty: Option<String>,
    pub cuisine: Option<String>,
    pub category: Option<String>,
    pub average_rating: Option<f64>,
    pub likes_count: i64,
    pub created_at: DateTime<Utc>,
    pub author_name: Option<String>,
    pub author_avatar: Option<String>,
}
