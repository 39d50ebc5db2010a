/// Authorization module for the blog service
///
/// Ownership-based permission checks: only the author of a post or comment may
/// edit or delete it.
use crate::error::{AppError, Result};
use crate::models::{Comment, Post};

/// Anything with an author.
pub trait Authored {
    fn author_id(&self) -> i64;
}

impl Authored for Post {
    fn author_id(&self) -> i64 {
        self.author_id
    }
}

impl Authored for Comment {
    fn author_id(&self) -> i64 {
        self.author_id
    }
}

/// True when `user_id` wrote `entity`.
pub fn is_author<T: Authored + ?Sized>(user_id: i64, entity: &T) -> bool {
    entity.author_id() == user_id
}

fn check_ownership<T: Authored + ?Sized>(user_id: i64, entity: &T, message: &str) -> Result<()> {
    if is_author(user_id, entity) {
        Ok(())
    } else {
        Err(AppError::Forbidden(message.to_string()))
    }
}

/// Verify user has access to update a post
pub fn check_post_update(user_id: i64, post: &Post) -> Result<()> {
    check_ownership(user_id, post, "You don't have permission to edit this post")
}

/// Verify user has access to delete a post
pub fn check_post_deletion(user_id: i64, post: &Post) -> Result<()> {
    check_ownership(user_id, post, "You don't have permission to delete this post")
}

pub fn check_comment_update(user_id: i64, comment: &Comment) -> Result<()> {
    check_ownership(user_id, comment, "You don't have permission to edit this comment")
}

pub fn check_comment_deletion(user_id: i64, comment: &Comment) -> Result<()> {
    check_ownership(
        user_id,
        comment,
        "You don't have permission to delete this comment",
    )
}
