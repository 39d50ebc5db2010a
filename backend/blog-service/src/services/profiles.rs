use std::sync::Arc;

use crate::db::BlogRepository;
use crate::error::{AppError, Result};
use crate::models::{ProfileInput, User};

/// Reads and edits the signed-in user's own profile.
pub struct ProfileService {
    repo: Arc<dyn BlogRepository>,
}

impl ProfileService {
    pub fn new(repo: Arc<dyn BlogRepository>) -> Self {
        Self { repo }
    }

    pub async fn current_user(&self, user_id: i64) -> Result<User> {
        self.repo
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized(format!("Unknown user {user_id}")))
    }

    pub async fn update_profile(&self, user_id: i64, input: ProfileInput) -> Result<User> {
        self.current_user(user_id).await?;

        if let Some(existing) = self.repo.find_user_by_username(&input.username).await? {
            if existing.id != user_id {
                return Err(AppError::field(
                    "username",
                    "A user with that username already exists.",
                ));
            }
        }

        let user = self.repo.update_user(user_id, &input).await?;
        tracing::info!(user_id, username = %user.username, "profile updated");
        Ok(user)
    }
}
