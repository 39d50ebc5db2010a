/// Database access layer
///
/// - `pool`: connection pool construction and migrations
/// - `*_repo`: SQL for each table, as free functions over a `PgPool`
/// - [`BlogRepository`]: the storage seam services are written against
/// - [`PgBlogRepository`]: the PostgreSQL implementation of that seam
pub mod catalog_repo;
pub mod comment_repo;
pub mod pool;
pub mod post_repo;
pub mod user_repo;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::Result;
use crate::models::{
    Category, Comment, CommentCard, Location, Post, PostCard, PostInput, ProfileInput, User,
};
use crate::services::visibility::PostFilter;

pub use pool::{create_pool, run_migrations};

/// Everything the blog reads from and writes to storage.
#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// Cheap round-trip used by the readiness probe
    async fn ping(&self) -> Result<()>;

    async fn find_user(&self, user_id: i64) -> Result<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn update_user(&self, user_id: i64, input: &ProfileInput) -> Result<User>;

    async fn find_category(&self, category_id: i64) -> Result<Option<Category>>;

    async fn find_category_by_slug(&self, slug: &str) -> Result<Option<Category>>;

    async fn find_location(&self, location_id: i64) -> Result<Option<Location>>;

    /// Number of posts passing `filter`
    async fn count_posts(&self, filter: &PostFilter) -> Result<i64>;

    /// Posts passing `filter`, newest `pub_date` first, with comment counts
    async fn list_posts(&self, filter: &PostFilter, limit: i64, offset: i64)
        -> Result<Vec<PostCard>>;

    async fn find_post(&self, post_id: i64) -> Result<Option<Post>>;

    /// A single post with joins and comment count, regardless of visibility
    async fn find_post_card(&self, post_id: i64) -> Result<Option<PostCard>>;

    async fn create_post(&self, author_id: i64, input: &PostInput) -> Result<Post>;

    async fn update_post(&self, post_id: i64, input: &PostInput) -> Result<Post>;

    /// Delete a post and, through the schema, its comments
    async fn delete_post(&self, post_id: i64) -> Result<bool>;

    /// Comments on a post, oldest first
    async fn list_comments(&self, post_id: i64) -> Result<Vec<CommentCard>>;

    /// A comment, only if it belongs to `post_id`
    async fn find_comment(&self, post_id: i64, comment_id: i64) -> Result<Option<Comment>>;

    async fn create_comment(&self, post_id: i64, author_id: i64, text: &str) -> Result<Comment>;

    async fn update_comment(&self, comment_id: i64, text: &str) -> Result<Comment>;

    async fn delete_comment(&self, comment_id: i64) -> Result<bool>;
}

/// PostgreSQL-backed [`BlogRepository`].
#[derive(Clone)]
pub struct PgBlogRepository {
    pool: PgPool,
}

impl PgBlogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlogRepository for PgBlogRepository {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_user(&self, user_id: i64) -> Result<Option<User>> {
        Ok(user_repo::get_user_by_id(&self.pool, user_id).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(user_repo::get_user_by_username(&self.pool, username).await?)
    }

    async fn update_user(&self, user_id: i64, input: &ProfileInput) -> Result<User> {
        Ok(user_repo::update_user(&self.pool, user_id, input).await?)
    }

    async fn find_category(&self, category_id: i64) -> Result<Option<Category>> {
        Ok(catalog_repo::get_category_by_id(&self.pool, category_id).await?)
    }

    async fn find_category_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        Ok(catalog_repo::get_category_by_slug(&self.pool, slug).await?)
    }

    async fn find_location(&self, location_id: i64) -> Result<Option<Location>> {
        Ok(catalog_repo::get_location_by_id(&self.pool, location_id).await?)
    }

    async fn count_posts(&self, filter: &PostFilter) -> Result<i64> {
        Ok(post_repo::count_posts(&self.pool, filter).await?)
    }

    async fn list_posts(
        &self,
        filter: &PostFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostCard>> {
        Ok(post_repo::list_posts(&self.pool, filter, limit, offset).await?)
    }

    async fn find_post(&self, post_id: i64) -> Result<Option<Post>> {
        Ok(post_repo::get_post_by_id(&self.pool, post_id).await?)
    }

    async fn find_post_card(&self, post_id: i64) -> Result<Option<PostCard>> {
        Ok(post_repo::get_post_card(&self.pool, post_id).await?)
    }

    async fn create_post(&self, author_id: i64, input: &PostInput) -> Result<Post> {
        Ok(post_repo::create_post(&self.pool, author_id, input).await?)
    }

    async fn update_post(&self, post_id: i64, input: &PostInput) -> Result<Post> {
        Ok(post_repo::update_post(&self.pool, post_id, input).await?)
    }

    async fn delete_post(&self, post_id: i64) -> Result<bool> {
        Ok(post_repo::delete_post(&self.pool, post_id).await?)
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<CommentCard>> {
        Ok(comment_repo::get_comments_by_post(&self.pool, post_id).await?)
    }

    async fn find_comment(&self, post_id: i64, comment_id: i64) -> Result<Option<Comment>> {
        Ok(comment_repo::get_comment_on_post(&self.pool, post_id, comment_id).await?)
    }

    async fn create_comment(&self, post_id: i64, author_id: i64, text: &str) -> Result<Comment> {
        Ok(comment_repo::create_comment(&self.pool, post_id, author_id, text).await?)
    }

    async fn update_comment(&self, comment_id: i64, text: &str) -> Result<Comment> {
        Ok(comment_repo::update_comment(&self.pool, comment_id, text).await?)
    }

    async fn delete_comment(&self, comment_id: i64) -> Result<bool> {
        Ok(comment_repo::delete_comment(&self.pool, comment_id).await?)
    }
}
