use crate::models::{Post, PostCard, PostInput};
use crate::services::visibility::PostFilter;
use sqlx::{PgPool, Row};

const POST_COLUMNS: &str =
    "id, title, text, pub_date, is_published, created_at, author_id, category_id, location_id";

/// Joined select shared by list and detail queries. Parameters are bound by
/// the callers, so the `WHERE` clause is appended after this prefix.
const POST_CARD_SELECT: &str = r#"
    SELECT p.id, p.title, p.text, p.pub_date, p.is_published, p.created_at,
           p.author_id, u.username AS author_username,
           p.category_id, c.title AS category_title, c.slug AS category_slug,
           c.is_published AS category_is_published,
           p.location_id, l.name AS location_name,
           (SELECT COUNT(*) FROM comments cm WHERE cm.post_id = p.id) AS comment_count
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN categories c ON c.id = p.category_id
    LEFT JOIN locations l ON l.id = p.location_id
"#;

/// SQL form of the visibility rule plus the optional scopes.
///
/// $1 viewer, $2 now, $3 category scope, $4 author scope.
const VISIBLE_POSTS_WHERE: &str = r#"
    WHERE (
        ($1::BIGINT IS NOT NULL AND p.author_id = $1)
        OR (p.is_published AND COALESCE(c.is_published, FALSE) AND p.pub_date <= $2)
    )
    AND ($3::BIGINT IS NULL OR p.category_id = $3)
    AND ($4::BIGINT IS NULL OR p.author_id = $4)
"#;

/// Count posts passing the filter
pub async fn count_posts(pool: &PgPool, filter: &PostFilter) -> Result<i64, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT COUNT(*) AS count
        FROM posts p
        LEFT JOIN categories c ON c.id = p.category_id
        {VISIBLE_POSTS_WHERE}
        "#
    );

    let row = sqlx::query(&sql)
        .bind(filter.viewer)
        .bind(filter.now)
        .bind(filter.category_id)
        .bind(filter.author_id)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i64, _>("count"))
}

/// Page of posts passing the filter, newest publication date first
pub async fn list_posts(
    pool: &PgPool,
    filter: &PostFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostCard>, sqlx::Error> {
    let sql = format!(
        "{POST_CARD_SELECT} {VISIBLE_POSTS_WHERE} ORDER BY p.pub_date DESC, p.id DESC LIMIT $5 OFFSET $6"
    );

    sqlx::query_as::<_, PostCard>(&sql)
        .bind(filter.viewer)
        .bind(filter.now)
        .bind(filter.category_id)
        .bind(filter.author_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// Get a joined post by ID, whatever its publication state
pub async fn get_post_card(pool: &PgPool, post_id: i64) -> Result<Option<PostCard>, sqlx::Error> {
    let sql = format!("{POST_CARD_SELECT} WHERE p.id = $1");

    sqlx::query_as::<_, PostCard>(&sql)
        .bind(post_id)
        .fetch_optional(pool)
        .await
}

/// Get a post row by ID
pub async fn get_post_by_id(pool: &PgPool, post_id: i64) -> Result<Option<Post>, sqlx::Error> {
    let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");

    sqlx::query_as::<_, Post>(&sql)
        .bind(post_id)
        .fetch_optional(pool)
        .await
}

/// Create a new post; new posts start published
pub async fn create_post(
    pool: &PgPool,
    author_id: i64,
    input: &PostInput,
) -> Result<Post, sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO posts (title, text, pub_date, is_published, author_id, category_id, location_id)
        VALUES ($1, $2, $3, TRUE, $4, $5, $6)
        RETURNING {POST_COLUMNS}
        "#
    );

    sqlx::query_as::<_, Post>(&sql)
        .bind(&input.title)
        .bind(&input.text)
        .bind(input.pub_date)
        .bind(author_id)
        .bind(input.category_id)
        .bind(input.location_id)
        .fetch_one(pool)
        .await
}

/// Overwrite the editable fields of a post
pub async fn update_post(
    pool: &PgPool,
    post_id: i64,
    input: &PostInput,
) -> Result<Post, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE posts
        SET title = $1, text = $2, pub_date = $3, category_id = $4, location_id = $5
        WHERE id = $6
        RETURNING {POST_COLUMNS}
        "#
    );

    sqlx::query_as::<_, Post>(&sql)
        .bind(&input.title)
        .bind(&input.text)
        .bind(input.pub_date)
        .bind(input.category_id)
        .bind(input.location_id)
        .bind(post_id)
        .fetch_one(pool)
        .await
}

/// Delete a post; comments go with it via ON DELETE CASCADE
pub async fn delete_post(pool: &PgPool, post_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
