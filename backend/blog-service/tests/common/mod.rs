#![allow(dead_code)]

pub mod memory_repo;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{http::header, web, App};
use blog_service::models::User;
use blog_service::{auth, configure, AppState};
use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Once};

pub use memory_repo::MemoryBlogRepository;

const TEST_SECRET: &str = "integration-test-secret";

fn init_secret() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        auth::initialize_jwt_secret(TEST_SECRET).expect("initialize test secret");
    });
}

/// Authorization header for `user`
pub fn bearer(user: &User) -> (header::HeaderName, String) {
    init_secret();
    let token = auth::generate_token(user.id, &user.username, 3600).expect("mint token");
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

/// The blog app wired the way `main` wires it, minus CORS and request logging
pub fn blog_app(
    repo: Arc<MemoryBlogRepository>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    init_secret();
    App::new()
        .app_data(web::Data::new(AppState::new(repo)))
        .configure(configure)
}

pub fn location_of<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .expect("Location header")
        .to_str()
        .expect("ascii Location")
        .to_string()
}

pub fn hours_ago(hours: i64) -> DateTime<Utc> {
    Utc::now() - Duration::hours(hours)
}

pub fn days_ahead(days: i64) -> DateTime<Utc> {
    Utc::now() + Duration::days(days)
}

/// Blog seeded with an author, a reader and one published category
pub struct Fixture {
    pub repo: Arc<MemoryBlogRepository>,
    pub author: User,
    pub reader: User,
    pub category: blog_service::models::Category,
}

impl Fixture {
    pub fn new() -> Self {
        let repo = Arc::new(MemoryBlogRepository::new());
        let author = repo.add_user("author");
        let reader = repo.add_user("reader");
        let category = repo.add_category("travel", true);
        Self {
            repo,
            author,
            reader,
            category,
        }
    }

    /// A post everyone may see
    pub fn public_post(&self) -> blog_service::models::Post {
        self.repo
            .add_post(&self.author, Some(&self.category), true, hours_ago(1))
    }
}
