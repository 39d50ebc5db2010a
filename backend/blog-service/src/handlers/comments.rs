/// Comment handlers - HTTP endpoints for comment operations
use actix_web::{web, HttpResponse};
use serde_json::json;

use super::forms::CommentForm;
use super::{post_detail_url, redirect, AppState};
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::services::CommentService;

fn service(state: &AppState) -> CommentService {
    CommentService::new(state.repo.clone())
}

/// POST /posts/{id}/comment/
///
/// Invalid text is dropped; the response is the same redirect either way.
pub async fn add_comment(
    state: web::Data<AppState>,
    user: AuthUser,
    post_id: web::Path<i64>,
    form: web::Form<CommentForm>,
) -> Result<HttpResponse> {
    let post_id = post_id.into_inner();
    let service = service(&state);

    match form.into_inner().clean() {
        Ok(text) => {
            service.add_comment(post_id, user.id, &text).await?;
        }
        Err(e) => {
            service.ensure_post_visible(post_id, user.id).await?;
            tracing::debug!(post_id, user_id = user.id, error = %e, "comment rejected");
        }
    }

    Ok(redirect(post_detail_url(post_id)))
}

/// GET /posts/{post_id}/edit_comment/{id}/
pub async fn edit_comment_form(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = service(&state)
        .comment_for_update(post_id, comment_id, user.id)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "form": CommentForm::from_comment(&comment),
        "comment": comment,
    })))
}

/// POST /posts/{post_id}/edit_comment/{id}/
pub async fn edit_comment(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<(i64, i64)>,
    form: web::Form<CommentForm>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let service = service(&state);

    service
        .comment_for_update(post_id, comment_id, user.id)
        .await?;
    let text = form.into_inner().clean()?;
    service
        .update_comment(post_id, comment_id, user.id, &text)
        .await?;

    Ok(redirect(post_detail_url(post_id)))
}

/// GET /posts/{post_id}/delete_comment/{id}/
pub async fn delete_comment_form(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = service(&state)
        .comment_for_deletion(post_id, comment_id, user.id)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "comment": comment })))
}

/// POST /posts/{post_id}/delete_comment/{id}/
pub async fn delete_comment(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    service(&state)
        .delete_comment(post_id, comment_id, user.id)
        .await?;

    Ok(redirect(post_detail_url(post_id)))
}
