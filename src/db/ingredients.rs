use crate::db::{
    models::{Ingredient, RecipeIngredient},
    DbPool,
};
use crate::error::Result;
use std::collections::HashMap;

/// Get or create an ingredient by name
pub async fn get_or_create_ingredient(pool: &DbPool, name: &str) -> Result<Ingredient> {
    let normalized = name.trim().to_lowercase();

    let existing = sqlx::query_as::<_, Ingredient>("SELECT * FROM ingredients WHERE name = ?")
        .bind(&normalized)
        .fetch_optional(pool)
        .await?;

    if let Some(ingredient) = existing {
        Ok(ingredient)
    } else {
        let ingredient = sqlx::query_as::<_, Ingredient>(
            "INSERT INTO ingredients (name) VALUES (?) RETURNING *",
        )
        .bind(&normalized)
        .fetch_one(pool)
        .await?;

        Ok(ingredient)
    }
}

/// Set recipe ingredients (replaces existing lines, preserving order)
pub async fn set_recipe_ingredients(
    pool: &DbPool,
    recipe_id: i64,
    lines: &[RecipeIngredient],
) -> Result<()> {
    sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = ?")
        .bind(recipe_id)
        .execute(pool)
        .await?;

    for (position, line) in lines.iter().enumerate() {
        let ingredient = get_or_create_ingredient(pool, &line.name).await?;
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO recipe_ingredients
                (recipe_id, ingredient_id, quantity, unit, position)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(recipe_id)
        .bind(ingredient.id)
        .bind(line.quantity)
        .bind(&line.unit)
        .bind(position as i64)
        .execute(pool)
        .await?;
    }

    Ok(())
}

/// Get ingredient lines for multiple recipes in a single query, in recipe
/// order (batch loading to avoid N+1)
pub async fn get_ingredients_for_recipes(
    pool: &DbPool,
    recipe_ids: &[i64],
) -> Result<HashMap<i64, Vec<RecipeIngredient>>> {
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
        SELECT ri.recipe_id, i.name, ri.quantity, ri.unit
        FROM recipe_ingredients ri
        JOIN ingredients i ON i.id = ri.ingredient_id
        WHERE ri.recipe_id IN ({placeholders})
        ORDER BY ri.recipe_id, ri.position
        "#
    );

    let mut query = sqlx::query_as::<_, (i64, String, Option<f64>, Option<String>)>(&query_str);
    for id in recipe_ids {
        query = query.bind(id);
    }

    let results = query.fetch_all(pool).await?;

    let mut map: HashMap<i64, Vec<RecipeIngredient>> = HashMap::new();
    for (recipe_id, name, quantity, unit) in results {
        map.entry(recipe_id).or_default().push(RecipeIngredient {
            name,
            quantity,
            unit,
        });
    }

    Ok(map)
}

/// Most frequently used ingredient names matching the pattern, for
/// suggestion ranking
pub async fn top_ingredients_matching(
    pool: &DbPool,
    pattern: &str,
    limit: i64,
) -> Result<Vec<String>> {
    let ingredients: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT i.name
        FROM ingredients i
        JOIN recipe_ingredients ri ON ri.ingredient_id = i.id
        WHERE i.name LIKE ?1 ESCAPE '\'
        GROUP BY i.id, i.name
        ORDER BY COUNT(ri.recipe_id) DESC, i.name
        LIMIT ?2
        "#,
    )
    .bind(pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(ingredients)
}

/// Count total ingredients
pub async fn count_ingredients(pool: &DbPool) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ingredients")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}
