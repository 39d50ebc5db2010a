/// Post handlers - HTTP endpoints for post pages and post forms
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;

use super::forms::{CommentForm, PostForm};
use super::{post_detail_url, profile_url, redirect, AppState};
use crate::error::{AppError, Result};
use crate::middleware::{AuthUser, Viewer};
use crate::services::{PageQuery, PageRequest, PostService};

fn service(state: &AppState) -> PostService {
    PostService::new(state.repo.clone())
}

/// GET / - the front page
pub async fn index(
    state: web::Data<AppState>,
    viewer: Viewer,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let request = PageRequest::try_from(&*query)?;
    let page = service(&state).list_index(viewer.user_id(), request).await?;

    Ok(HttpResponse::Ok().json(json!({ "page_obj": page })))
}

/// GET /category/{slug}/
pub async fn category_posts(
    state: web::Data<AppState>,
    viewer: Viewer,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let request = PageRequest::try_from(&*query)?;
    let (category, page) = service(&state)
        .list_category(&slug, viewer.user_id(), request)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "category": category, "page_obj": page })))
}

/// GET /profile/{username}/
pub async fn profile_posts(
    state: web::Data<AppState>,
    viewer: Viewer,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let request = PageRequest::try_from(&*query)?;
    let (profile, page) = service(&state)
        .list_profile(&username, viewer.user_id(), request)
        .await?;

    let display_name = profile.display_name();
    Ok(HttpResponse::Ok().json(json!({
        "profile": profile,
        "display_name": display_name,
        "page_obj": page,
    })))
}

/// GET /posts/{id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    viewer: Viewer,
    post_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let detail = service(&state)
        .get_detail(*post_id, viewer.user_id())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "post": detail.post,
        "comments": detail.comments,
        "form": CommentForm::default(),
    })))
}

/// GET /posts/create/
pub async fn create_post_form(_user: AuthUser) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({ "form": PostForm::blank(Utc::now()) })))
}

/// POST /posts/create/
pub async fn create_post(
    state: web::Data<AppState>,
    user: AuthUser,
    form: web::Form<PostForm>,
) -> Result<HttpResponse> {
    let input = form.into_inner().clean()?;
    let (_post, author) = service(&state).create_post(user.id, input).await?;

    Ok(redirect(profile_url(&author.username)))
}

/// GET /posts/{id}/edit/
///
/// Anyone but the author is sent back to the post.
pub async fn edit_post_form(
    state: web::Data<AppState>,
    user: AuthUser,
    post_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let post_id = post_id.into_inner();
    match service(&state).post_for_update(post_id, user.id).await {
        Ok(post) => Ok(HttpResponse::Ok().json(json!({
            "form": PostForm::from_post(&post),
            "post": post,
        }))),
        Err(AppError::Forbidden(_)) => Ok(redirect(post_detail_url(post_id))),
        Err(e) => Err(e),
    }
}

/// POST /posts/{id}/edit/
pub async fn edit_post(
    state: web::Data<AppState>,
    user: AuthUser,
    post_id: web::Path<i64>,
    form: web::Form<PostForm>,
) -> Result<HttpResponse> {
    let post_id = post_id.into_inner();
    let service = service(&state);

    // Permission comes before form validation so strangers never see field errors.
    match service.post_for_update(post_id, user.id).await {
        Ok(_) => {}
        Err(AppError::Forbidden(_)) => {
            tracing::warn!(post_id, user_id = user.id, "edit by non-author redirected");
            return Ok(redirect(post_detail_url(post_id)));
        }
        Err(e) => return Err(e),
    }

    let input = form.into_inner().clean()?;
    let post = service.update_post(post_id, user.id, input).await?;

    Ok(redirect(post_detail_url(post.id)))
}

/// GET /posts/{id}/delete/
pub async fn delete_post_form(
    state: web::Data<AppState>,
    user: AuthUser,
    post_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let post = service(&state)
        .post_for_deletion(*post_id, user.id)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "form": PostForm::from_post(&post),
        "post": post,
    })))
}

/// POST /posts/{id}/delete/
pub async fn delete_post(
    state: web::Data<AppState>,
    user: AuthUser,
    post_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let author = service(&state).delete_post(*post_id, user.id).await?;

    Ok(redirect(profile_url(&author.username)))
}
