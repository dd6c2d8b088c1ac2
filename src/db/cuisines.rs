use crate::db::DbPool;
use crate::error::Result;

/// List the full cuisine catalogue
pub async fn all_cuisines(pool: &DbPool) -> Result<Vec<String>> {
    let cuisines: Vec<String> = sqlx::query_scalar("SELECT name FROM cuisines ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(cuisines)
}

/// Catalogue cuisines matching the pattern, used by instant-search
/// suggestions (distinct known values, not grouped recipe rows)
pub async fn cuisines_matching(pool: &DbPool, pattern: &str, limit: i64) -> Result<Vec<String>> {
    let cuisines: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT name FROM cuisines
        WHERE name LIKE ?1 ESCAPE '\'
        ORDER BY name
        LIMIT ?2
        "#,
    )
    .bind(pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(cuisines)
}
