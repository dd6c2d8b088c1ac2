use crate::db::{models::Tag, DbPool};
use crate::error::Result;
use std::collections::HashMap;

/// Get or create a tag by name
pub async fn get_or_create_tag(pool: &DbPool, name: &str) -> Result<Tag> {
    // Normalize tag name (lowercase, trim)
    let normalized = name.trim().to_lowercase();

    let existing = sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE name = ?")
        .bind(&normalized)
        .fetch_optional(pool)
        .await?;

    if let Some(tag) = existing {
        Ok(tag)
    } else {
        let tag = sqlx::query_as::<_, Tag>("INSERT INTO tags (name) VALUES (?) RETURNING *")
            .bind(&normalized)
            .fetch_one(pool)
            .await?;

        Ok(tag)
    }
}

/// Set recipe tags (replaces existing tags)
pub async fn set_recipe_tags(pool: &DbPool, recipe_id: i64, tag_names: &[String]) -> Result<()> {
    sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = ?")
        .bind(recipe_id)
        .execute(pool)
        .await?;

    for tag_name in tag_names {
        let tag = get_or_create_tag(pool, tag_name).await?;
        sqlx::query("INSERT OR IGNORE INTO recipe_tags (recipe_id, tag_id) VALUES (?, ?)")
            .bind(recipe_id)
            .bind(tag.id)
            .execute(pool)
            .await?;
    }

    Ok(())
}

/// Get tags for multiple recipes in a single query (batch loading to avoid N+1)
pub async fn get_tags_for_recipes(
    pool: &DbPool,
    recipe_ids: &[i64],
) -> Result<HashMap<i64, Vec<String>>> {
    if recipe_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let placeholders = recipe_ids
        .iter()
        .enumerate()
        .map(|(i, _)| format!("?{}", i + 1))
        .collect::<Vec<_>>()
        .join(",");

    let query_str = format!(
        r#"
        SELECT rt.recipe_id, t.name
        FROM recipe_tags rt
        JOIN tags t ON rt.tag_id = t.id
        WHERE rt.recipe_id IN ({placeholders})
        ORDER BY rt.recipe_id, t.name
        "#
    );

    let mut query = sqlx::query_as::<_, (i64, String)>(&query_str);
    for id in recipe_ids {
        query = query.bind(id);
    }

    let results: Vec<(i64, String)> = query.fetch_all(pool).await?;

    let mut tags_map: HashMap<i64, Vec<String>> = HashMap::new();
    for (recipe_id, tag_name) in results {
        tags_map.entry(recipe_id).or_default().push(tag_name);
    }

    Ok(tags_map)
}

/// Most frequently used tags matching the pattern, for suggestion ranking.
/// Frequency counts recipe usages, so unused tags never surface.
pub async fn top_tags_matching(pool: &DbPool, pattern: &str, limit: i64) -> Result<Vec<String>> {
    let tags: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT t.name
        FROM tags t
        JOIN recipe_tags rt ON rt.tag_id = t.id
        WHERE t.name LIKE ?1 ESCAPE '\'
        GROUP BY t.id, t.name
        ORDER BY COUNT(rt.recipe_id) DESC, t.name
        LIMIT ?2
        "#,
    )
    .bind(pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(tags)
}

/// Count total tags
pub async fn count_tags(pool: &DbPool) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tags")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::NewRecipe;
    use crate::db::{init_pool, like_pattern, recipes, run_migrations};

    async fn create_tagged_recipe(pool: &DbPool, title: &str, tags: &[&str]) -> i64 {
        let recipe = recipes::create_recipe(
            pool,
            &NewRecipe {
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
            },
        )
        .await
        .unwrap();

        let names: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
        set_recipe_tags(pool, recipe.id, &names).await.unwrap();
        recipe.id
    }

    #[tokio::test]
    async fn test_set_and_batch_get_tags() {
        let pool = init_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();

        let id = create_tagged_recipe(&pool, "Cookies", &["Dessert", "cookies"]).await;

        let tags_map = get_tags_for_recipes(&pool, &[id]).await.unwrap();
        let tags = tags_map.get(&id).unwrap();
        assert_eq!(tags.len(), 2);
        // Tags are normalized on write
        assert!(tags.contains(&"dessert".to_string()));
    }

    #[tokio::test]
    async fn test_top_tags_ordered_by_usage() {
        let pool = init_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();

        create_tagged_recipe(&pool, "A", &["vegan", "vegetarian"]).await;
        create_tagged_recipe(&pool, "B", &["vegan"]).await;
        create_tagged_recipe(&pool, "C", &["vegan"]).await;

        let top = top_tags_matching(&pool, &like_pattern("veg"), 5)
            .await
            .unwrap();
        assert_eq!(top, vec!["vegan".to_string(), "vegetarian".to_string()]);

        let capped = top_tags_matching(&pool, &like_pattern("veg"), 1)
            .await
            .unwrap();
        assert_eq!(capped.len(), 1);
    }
}
