/// Comment service - handles comment creation and author-only changes
use chrono::Utc;
use std::sync::Arc;

use crate::db::BlogRepository;
use crate::error::{AppError, Result};
use crate::middleware::permissions::{check_comment_deletion, check_comment_update};
use crate::models::Comment;
use crate::services::visibility::is_visible_to;

pub struct CommentService {
    repo: Arc<dyn BlogRepository>,
}

impl CommentService {
    pub fn new(repo: Arc<dyn BlogRepository>) -> Self {
        Self { repo }
    }

    /// Ensure the post exists and the commenter can see it
    pub async fn ensure_post_visible(&self, post_id: i64, viewer: i64) -> Result<()> {
        self.repo
            .find_post_card(post_id)
            .await?
            .filter(|post| is_visible_to(post, Some(viewer), Utc::now()))
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Post {post_id} not found")))
    }

    /// Leave a comment on a post
    pub async fn add_comment(&self, post_id: i64, author_id: i64, text: &str) -> Result<Comment> {
        self.ensure_post_visible(post_id, author_id).await?;

        let comment = self.repo.create_comment(post_id, author_id, text).await?;
        tracing::info!(comment_id = comment.id, post_id, author_id, "comment added");
        Ok(comment)
    }

    async fn find_comment(&self, post_id: i64, comment_id: i64) -> Result<Comment> {
        self.repo
            .find_comment(post_id, comment_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Comment {comment_id} on post {post_id} not found"))
            })
    }

    pub async fn comment_for_update(
        &self,
        post_id: i64,
        comment_id: i64,
        user_id: i64,
    ) -> Result<Comment> {
        let comment = self.find_comment(post_id, comment_id).await?;
        check_comment_update(user_id, &comment)?;
        Ok(comment)
    }

    pub async fn update_comment(
        &self,
        post_id: i64,
        comment_id: i64,
        user_id: i64,
        text: &str,
    ) -> Result<Comment> {
        self.comment_for_update(post_id, comment_id, user_id).await?;

        let comment = self.repo.update_comment(comment_id, text).await?;
        tracing::info!(comment_id, post_id, "comment updated");
        Ok(comment)
    }

    pub async fn comment_for_deletion(
        &self,
        post_id: i64,
        comment_id: i64,
        user_id: i64,
    ) -> Result<Comment> {
        let comment = self.find_comment(post_id, comment_id).await?;
        check_comment_deletion(user_id, &comment)?;
        Ok(comment)
    }

    pub async fn delete_comment(&self, post_id: i64, comment_id: i64, user_id: i64) -> Result<()> {
        self.comment_for_deletion(post_id, comment_id, user_id)
            .await?;

        if !self.repo.delete_comment(comment_id).await? {
            return Err(AppError::NotFound(format!(
                "Comment {comment_id} on post {post_id} not found"
            )));
        }
        tracing::info!(comment_id, post_id, "comment deleted");
        Ok(())
    }
}
