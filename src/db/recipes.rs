use crate::db::{models::*, DbPool};
use crate::error::{Error, Result};
use chrono::Utc;

/// Shared filter predicate for both the candidate scan and the count
/// query: the pattern (`?1`) substring-matches any of the searchable
/// fields, and the optional category filter (`?2`) is an exact match.
const SEARCH_PREDICATE: &str = r#"
    (
        r.title LIKE ?1 ESCAPE '\'
        OR r.description LIKE ?1 ESCAPE '\'
        OR r.cuisine LIKE ?1 ESCAPE '\'
        OR r.category LIKE ?1 ESCAPE '\'
        OR EXISTS (
            SELECT 1 FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = r.id AND i.name LIKE ?1 ESCAPE '\'
        )
        OR EXISTS (
            SELECT 1 FROM recipe_tags rt
            JOIN tags t ON t.id = rt.tag_id
            WHERE rt.recipe_id = r.id AND t.name LIKE ?1 ESCAPE '\'
        )
    )
    AND (?2 IS NULL OR r.category = ?2)
"#;

/// Create a new recipe
pub async fn create_recipe(pool: &DbPool, new_recipe: &NewRecipe) -> Result<Recipe> {
    let now = Utc::now();

    let recipe = sqlx::query_as::<_, Recipe>(
        r#"
        INSERT INTO recipes (
            user_id, title, description, image, prep_time_minutes,
            cook_time_minutes, servings, difficulty, cuisine, category,
            average_rating, likes_count, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(new_recipe.user_id)
    .bind(&new_recipe.title)
    .bind(&new_recipe.description)
    .bind(&new_recipe.image)
    .bind(new_recipe.prep_time_minutes)
    .bind(new_recipe.cook_time_minutes)
    .bind(new_recipe.servings)
    .bind(&new_recipe.difficulty)
    .bind(&new_recipe.cuisine)
    .bind(&new_recipe.category)
    .bind(new_recipe.average_rating)
    .bind(new_recipe.likes_count)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(recipe)
}

/// Get recipe by ID
pub async fn get_recipe(pool: &DbPool, recipe_id: i64) -> Result<Recipe> {
    let recipe = sqlx::query_as::<_, Recipe>("SELECT * FROM recipes WHERE id = ?")
        .bind(recipe_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Recipe {recipe_id} not found")))?;

    Ok(recipe)
}

/// Scan recipes matching the search pattern, joined with author columns.
///
/// Rows come back in a deterministic base order (newest first, id as the
/// final key) so repeated identical calls produce identical output after
/// the in-memory ranking pass.
pub async fn search_candidates(
    pool: &DbPool,
    pattern: &str,
    category: Option<&str>,
) -> Result<Vec<RecipeSearchRow>> {
    let query = format!(
        r#"
        SELECT
            r.id, r.title, r.description, r.image, r.prep_time_minutes,
            r.cook_time_minutes, r.servings, r.difficulty, r.cuisine,
            r.category, r.average_rating, r.likes_count, r.created_at,
            u.name AS author_name, u.avatar AS author_avatar
        FROM recipes r
        LEFT JOIN users u ON u.id = r.user_id
        WHERE {SEARCH_PREDICATE}
        ORDER BY r.created_at DESC, r.id DESC
        "#
    );

    let rows = sqlx::query_as::<_, RecipeSearchRow>(&query)
        .bind(pattern)
        .bind(category)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Count recipes matching the search pattern, with the same predicate as
/// [`search_candidates`] but independent of any page window
pub async fn count_search_matches(
    pool: &DbPool,
    pattern: &str,
    category: Option<&str>,
) -> Result<i64> {
    let query = format!("SELECT COUNT(*) FROM recipes r WHERE {SEARCH_PREDICATE}");

    let count: (i64,) = sqlx::query_as(&query)
        .bind(pattern)
        .bind(category)
        .fetch_one(pool)
        .await?;

    Ok(count.0)
}

/// Most frequent cuisine values among recipes whose cuisine matches the
/// pattern, for suggestion ranking
pub async fn top_cuisines_matching(
    pool: &DbPool,
    pattern: &str,
    limit: i64,
) -> Result<Vec<String>> {
    let cuisines: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT cuisine
        FROM recipes
        WHERE cuisine IS NOT NULL AND cuisine LIKE ?1 ESCAPE '\'
        GROUP BY cuisine
        ORDER BY COUNT(*) DESC, cuisine
        LIMIT ?2
        "#,
    )
    .bind(pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(cuisines)
}

/// Count all recipes
pub async fn count_all_recipes(pool: &DbPool) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipes")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

/// Delete recipe
pub async fn delete_recipe(pool: &DbPool, recipe_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM recipes WHERE id = ?")
        .bind(recipe_id)
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_pool, like_pattern, run_migrations, tags, users};

    async fn test_pool() -> DbPool {
        let pool = init_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    fn bare_recipe(title: &str) -> NewRecipe {
        NewRecipe {
            user_id: None,
            title: title.to_string(),
            description: None,
            image: None,
            prep_time_minutes: None,
            cook_time_minutes: None,
            servings: None,
            difficulty: None,
            cuisine: None,
            category: None,
            average_rating: None,
            likes_count: 0,
        }
    }

    #[tokio::test]
    async fn test_recipe_create_get_delete() {
        let pool = test_pool().await;

        let user = users::create_user(
            &pool,
            &NewUser {
                name: "Alice".to_string(),
                avatar: None,
            },
        )
        .await
        .unwrap();

        let mut new_recipe = bare_recipe("Test Recipe");
        new_recipe.user_id = Some(user.id);
        new_recipe.description = Some("A test recipe".to_string());

        let recipe = create_recipe(&pool, &new_recipe).await.unwrap();
        assert_eq!(recipe.title, "Test Recipe");
        assert_eq!(recipe.likes_count, 0);

        let retrieved = get_recipe(&pool, recipe.id).await.unwrap();
        assert_eq!(retrieved.id, recipe.id);

        delete_recipe(&pool, recipe.id).await.unwrap();
        assert!(get_recipe(&pool, recipe.id).await.is_err());
    }

    #[tokio::test]
    async fn test_search_candidates_matches_all_fields() {
        let pool = test_pool().await;

        let mut curry = bare_recipe("Spicy Thai Green Curry");
        curry.cuisine = Some("Thai".to_string());
        let curry = create_recipe(&pool, &curry).await.unwrap();
        tags::set_recipe_tags(&pool, curry.id, &["thai".to_string(), "spicy".to_string()])
            .await
            .unwrap();

        create_recipe(&pool, &bare_recipe("Plain Rice")).await.unwrap();

        // Title match
        let rows = search_candidates(&pool, &like_pattern("curry"), None)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Spicy Thai Green Curry");

        // Tag match
        let rows = search_candidates(&pool, &like_pattern("spicy"), None)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);

        // No match
        let rows = search_candidates(&pool, &like_pattern("noodle"), None)
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_category_filter_is_exact() {
        let pool = test_pool().await;

        let mut soup = bare_recipe("Chicken Soup");
        soup.category = Some("Dinner".to_string());
        create_recipe(&pool, &soup).await.unwrap();

        let mut salad = bare_recipe("Chicken Salad");
        salad.category = Some("Lunch".to_string());
        create_recipe(&pool, &salad).await.unwrap();

        let pattern = like_pattern("chicken");
        let rows = search_candidates(&pool, &pattern, Some("Dinner"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Chicken Soup");

        // Category filter is exact, not a substring match
        let rows = search_candidates(&pool, &pattern, Some("Din"))
            .await
            .unwrap();
        assert!(rows.is_empty());

        let total = count_search_matches(&pool, &pattern, None).await.unwrap();
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn test_like_wildcards_match_literally() {
        let pool = test_pool().await;

        create_recipe(&pool, &bare_recipe("100% Whole Wheat Bread"))
            .await
            .unwrap();
        create_recipe(&pool, &bare_recipe("1000 Layer Cake"))
            .await
            .unwrap();

        // Unescaped, "100%" would also match "1000 Layer Cake"
        let rows = search_candidates(&pool, &like_pattern("100%"), None)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "100% Whole Wheat Bread");
    }
}
