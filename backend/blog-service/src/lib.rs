/// Blog Service Library
///
/// Posts, categories, comments and profiles for the blog, with publication
/// gating and author-only editing.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route table
/// - `models`: Rows and read models for users, categories, locations, posts, comments
/// - `services`: Visibility rules, pagination and the business logic layer
/// - `db`: Repository trait and its PostgreSQL implementation
/// - `middleware`: Bearer token authentication and ownership checks
/// - `auth`: Token minting and verification
/// - `error`: Error types and HTTP mapping
/// - `config`: Configuration management
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
pub use handlers::{configure, AppState};
