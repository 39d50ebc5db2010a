/// HTTP handlers for the blog
///
/// - Posts: index, category and profile lists, detail, create/edit/delete
/// - Comments: add, edit, delete
/// - Profiles: editing the signed-in user's profile
/// - Health: liveness and readiness probes
///
/// Page handlers answer with the JSON context a template would render.
/// Successful form submissions answer `303 See Other`.
pub mod comments;
pub mod forms;
pub mod health;
pub mod posts;
pub mod profiles;

use actix_web::{http::header, web, HttpResponse};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::sync::Arc;

use crate::db::BlogRepository;
use crate::error::AppError;
use crate::middleware::JwtAuthMiddleware;

/// Characters a username may keep verbatim inside a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'@')
    .remove(b'+');

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn BlogRepository>,
}

impl AppState {
    pub fn new(repo: Arc<dyn BlogRepository>) -> Self {
        Self { repo }
    }
}

pub fn post_detail_url(post_id: i64) -> String {
    format!("/posts/{post_id}/")
}

pub fn profile_url(username: &str) -> String {
    format!("/profile/{}/", utf8_percent_encode(username, PATH_SEGMENT))
}

pub(crate) fn redirect(location: impl Into<String>) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.into()))
        .finish()
}

/// Register every blog route on an app.
///
/// Health probes sit outside the token check so a stale `Authorization`
/// header never fails them; everything else goes through [`JwtAuthMiddleware`].
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::FormConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Malformed form: {err}")).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Malformed query string: {err}")).into()
    }))
    .route("/health", web::get().to(health::liveness))
    .route("/health/ready", web::get().to(health::readiness))
    .service(
        web::scope("")
            .wrap(JwtAuthMiddleware)
            .configure(blog_routes),
    );
}

fn blog_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(posts::index))
    .route("/category/{slug}/", web::get().to(posts::category_posts))
    .service(
        web::resource("/posts/create/")
            .route(web::get().to(posts::create_post_form))
            .route(web::post().to(posts::create_post)),
    )
    .route("/posts/{id:\\d+}/", web::get().to(posts::post_detail))
    .service(
        web::resource("/posts/{id:\\d+}/edit/")
            .route(web::get().to(posts::edit_post_form))
            .route(web::post().to(posts::edit_post)),
    )
    .service(
        web::resource("/posts/{id:\\d+}/delete/")
            .route(web::get().to(posts::delete_post_form))
            .route(web::post().to(posts::delete_post)),
    )
    .route("/posts/{id:\\d+}/comment/", web::post().to(comments::add_comment))
    .service(
        web::resource("/posts/{post_id:\\d+}/edit_comment/{id:\\d+}/")
            .route(web::get().to(comments::edit_comment_form))
            .route(web::post().to(comments::edit_comment)),
    )
    .service(
        web::resource("/posts/{post_id:\\d+}/delete_comment/{id:\\d+}/")
            .route(web::get().to(comments::delete_comment_form))
            .route(web::post().to(comments::delete_comment)),
    )
    .service(
        web::resource("/profile/user/edit/")
            .route(web::get().to(profiles::edit_profile_form))
            .route(web::post().to(profiles::edit_profile)),
    )
    .route("/profile/{username}/", web::get().to(posts::profile_posts));
}
