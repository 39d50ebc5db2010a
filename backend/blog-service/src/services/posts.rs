/// Post service - listing, detail, and authoring of posts
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::db::BlogRepository;
use crate::error::{AppError, Result};
use crate::middleware::permissions::{check_post_deletion, check_post_update};
use crate::models::{Category, CommentCard, Post, PostCard, PostInput, User};
use crate::services::pagination::{Page, PageRequest, Paginator, PAGE_SIZE};
use crate::services::visibility::{is_visible_to, PostFilter};

/// A post as its detail page shows it.
#[derive(Debug, Serialize)]
pub struct PostDetail {
    pub post: PostCard,
    pub comments: Vec<CommentCard>,
}

pub struct PostService {
    repo: Arc<dyn BlogRepository>,
}

impl PostService {
    pub fn new(repo: Arc<dyn BlogRepository>) -> Self {
        Self { repo }
    }

    async fn paginate(&self, filter: PostFilter, request: PageRequest) -> Result<Page<PostCard>> {
        let count = self.repo.count_posts(&filter).await?;
        let paginator = Paginator::new(count, PAGE_SIZE);
        let number = paginator.resolve(request)?;

        let posts = self
            .repo
            .list_posts(&filter, paginator.per_page(), paginator.offset(number))
            .await?;

        Ok(Page::new(posts, number, &paginator))
    }

    /// Front page: every post the viewer may see
    pub async fn list_index(
        &self,
        viewer: Option<i64>,
        request: PageRequest,
    ) -> Result<Page<PostCard>> {
        self.paginate(PostFilter::for_viewer(viewer, Utc::now()), request)
            .await
    }

    /// Posts in a published category
    pub async fn list_category(
        &self,
        slug: &str,
        viewer: Option<i64>,
        request: PageRequest,
    ) -> Result<(Category, Page<PostCard>)> {
        let category = self
            .repo
            .find_category_by_slug(slug)
            .await?
            .filter(|c| c.is_published)
            .ok_or_else(|| AppError::NotFound(format!("Category '{slug}' not found")))?;

        let filter = PostFilter::for_viewer(viewer, Utc::now()).in_category(category.id);
        let page = self.paginate(filter, request).await?;
        Ok((category, page))
    }

    /// A user's posts: all of them for the owner, the visible ones for others
    pub async fn list_profile(
        &self,
        username: &str,
        viewer: Option<i64>,
        request: PageRequest,
    ) -> Result<(User, Page<PostCard>)> {
        let profile = self
            .repo
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User '{username}' not found")))?;

        let filter = PostFilter::for_viewer(viewer, Utc::now()).by_author(profile.id);
        let page = self.paginate(filter, request).await?;
        Ok((profile, page))
    }

    /// A single post with its comments; not-found when hidden from the viewer
    pub async fn get_detail(&self, post_id: i64, viewer: Option<i64>) -> Result<PostDetail> {
        let post = self
            .repo
            .find_post_card(post_id)
            .await?
            .filter(|post| is_visible_to(post, viewer, Utc::now()))
            .ok_or_else(|| AppError::NotFound(format!("Post {post_id} not found")))?;

        let comments = self.repo.list_comments(post_id).await?;
        Ok(PostDetail { post, comments })
    }

    async fn validate_references(&self, input: &PostInput) -> Result<()> {
        if let Some(category_id) = input.category_id {
            if self.repo.find_category(category_id).await?.is_none() {
                return Err(AppError::field("category", "Select a valid choice."));
            }
        }
        if let Some(location_id) = input.location_id {
            if self.repo.find_location(location_id).await?.is_none() {
                return Err(AppError::field("location", "Select a valid choice."));
            }
        }
        Ok(())
    }

    async fn find_post(&self, post_id: i64) -> Result<Post> {
        self.repo
            .find_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {post_id} not found")))
    }

    async fn find_author(&self, user_id: i64) -> Result<User> {
        self.repo
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized(format!("Unknown user {user_id}")))
    }

    /// Create a post authored by `author_id`; returns it with its author
    pub async fn create_post(&self, author_id: i64, input: PostInput) -> Result<(Post, User)> {
        let author = self.find_author(author_id).await?;
        self.validate_references(&input).await?;

        let post = self.repo.create_post(author_id, &input).await?;
        tracing::info!(post_id = post.id, author_id, "post created");

        Ok((post, author))
    }

    /// Load a post for its edit form; `Forbidden` for anyone but the author
    pub async fn post_for_update(&self, post_id: i64, user_id: i64) -> Result<Post> {
        let post = self.find_post(post_id).await?;
        check_post_update(user_id, &post)?;
        Ok(post)
    }

    pub async fn update_post(&self, post_id: i64, user_id: i64, input: PostInput) -> Result<Post> {
        self.post_for_update(post_id, user_id).await?;
        self.validate_references(&input).await?;

        let post = self.repo.update_post(post_id, &input).await?;
        tracing::info!(post_id, author_id = user_id, "post updated");
        Ok(post)
    }

    /// Load a post for its delete confirmation; `Forbidden` for anyone but the author
    pub async fn post_for_deletion(&self, post_id: i64, user_id: i64) -> Result<Post> {
        let post = self.find_post(post_id).await?;
        check_post_deletion(user_id, &post)?;
        Ok(post)
    }

    /// Delete a post and its comments; returns the author for the redirect
    pub async fn delete_post(&self, post_id: i64, user_id: i64) -> Result<User> {
        self.post_for_deletion(post_id, user_id).await?;
        let author = self.find_author(user_id).await?;

        if !self.repo.delete_post(post_id).await? {
            return Err(AppError::NotFound(format!("Post {post_id} not found")));
        }
        tracing::info!(post_id, author_id = user_id, "post deleted");
        Ok(author)
    }
}
