use crate::models::{Comment, CommentCard};
use sqlx::PgPool;

/// Create a new comment on a post
pub async fn create_comment(
    pool: &PgPool,
    post_id: i64,
    author_id: i64,
    text: &str,
) -> Result<Comment, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (post_id, author_id, text)
        VALUES ($1, $2, $3)
        RETURNING id, text, created_at, post_id, author_id
        "#,
    )
    .bind(post_id)
    .bind(author_id)
    .bind(text)
    .fetch_one(pool)
    .await
}

/// Get all comments for a post, oldest first
pub async fn get_comments_by_post(
    pool: &PgPool,
    post_id: i64,
) -> Result<Vec<CommentCard>, sqlx::Error> {
    sqlx::query_as::<_, CommentCard>(
        r#"
        SELECT cm.id, cm.text, cm.created_at, cm.post_id, cm.author_id,
               u.username AS author_username
        FROM comments cm
        JOIN users u ON u.id = cm.author_id
        WHERE cm.post_id = $1
        ORDER BY cm.created_at ASC, cm.id ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
}

/// Get a comment by ID, scoped to the post it was left on
pub async fn get_comment_on_post(
    pool: &PgPool,
    post_id: i64,
    comment_id: i64,
) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, text, created_at, post_id, author_id
        FROM comments
        WHERE id = $1 AND post_id = $2
        "#,
    )
    .bind(comment_id)
    .bind(post_id)
    .fetch_optional(pool)
    .await
}

/// Update comment text
pub async fn update_comment(
    pool: &PgPool,
    comment_id: i64,
    text: &str,
) -> Result<Comment, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        UPDATE comments
        SET text = $1
        WHERE id = $2
        RETURNING id, text, created_at, post_id, author_id
        "#,
    )
    .bind(text)
    .bind(comment_id)
    .fetch_one(pool)
    .await
}

pub async fn delete_comment(pool: &PgPool, comment_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
