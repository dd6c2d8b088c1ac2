use crate::db::{models::*, DbPool};
use crate::error::{Error, Result};

/// Create a new user
pub async fn create_user(pool: &DbPool, new_user: &NewUser) -> Result<User> {
    let user =
        sqlx::query_as::<_, User>("INSERT INTO users (name, avatar) VALUES (?, ?) RETURNING *")
            .bind(&new_user.name)
            .bind(&new_user.avatar)
            .fetch_one(pool)
            .await?;

    Ok(user)
}

/// Get user by ID
pub async fn get_user(pool: &DbPool, user_id: i64) -> Result<User> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("User {user_id} not found")))?;

    Ok(user)
}

/// Count all users
pub async fn count_users(pool: &DbPool) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_pool, run_migrations};

    #[tokio::test]
    async fn test_user_crud() {
        let pool = init_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();

        let user = create_user(
            &pool,
            &NewUser {
                name: "Alice".to_string(),
                avatar: Some("https://example.com/alice.png".to_string()),
            },
        )
        .await
        .unwrap();

        let retrieved = get_user(&pool, user.id).await.unwrap();
        assert_eq!(retrieved.name, "Alice");
        assert_eq!(count_users(&pool).await.unwrap(), 1);
    }
}
