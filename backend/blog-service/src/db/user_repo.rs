use crate::models::{ProfileInput, User};
use sqlx::PgPool;

pub async fn get_user_by_id(pool: &PgPool, user_id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, first_name, last_name, email FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn get_user_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, first_name, last_name, email FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

/// Update the profile fields a user may edit themselves
pub async fn update_user(
    pool: &PgPool,
    user_id: i64,
    input: &ProfileInput,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET username = $1, first_name = $2, last_name = $3, email = $4
        WHERE id = $5
        RETURNING id, username, first_name, last_name, email
        "#,
    )
    .bind(&input.username)
    .bind(&input.first_name)
    .bind(&input.last_name)
    .bind(&input.email)
    .bind(user_id)
    .fetch_one(pool)
    .await
}
