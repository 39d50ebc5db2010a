use actix_web::{web, HttpResponse};
use serde_json::json;

use super::forms::ProfileForm;
use super::{profile_url, redirect, AppState};
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::services::ProfileService;

/// GET /profile/user/edit/
pub async fn edit_profile_form(state: web::Data<AppState>, user: AuthUser) -> Result<HttpResponse> {
    let current = ProfileService::new(state.repo.clone())
        .current_user(user.id)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "form": ProfileForm::from_user(&current) })))
}

/// POST /profile/user/edit/
pub async fn edit_profile(
    state: web::Data<AppState>,
    user: AuthUser,
    form: web::Form<ProfileForm>,
) -> Result<HttpResponse> {
    let input = form.into_inner().clean()?;
    let updated = ProfileService::new(state.repo.clone())
        .update_profile(user.id, input)
        .await?;

    Ok(redirect(profile_url(&updated.username)))
}
