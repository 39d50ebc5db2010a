/// Business logic layer for the blog service
///
/// - Visibility: who may see which post
/// - Pagination: page parsing and metadata for list pages
/// - Post service: lists, detail, create/edit/delete
/// - Comment service: add/edit/delete comments
/// - Profile service: the signed-in user's own profile
pub mod comments;
pub mod pagination;
pub mod posts;
pub mod profiles;
pub mod visibility;

pub use comments::CommentService;
pub use pagination::{Page, PageQuery, PageRequest, Paginator, PAGE_SIZE};
pub use posts::{PostDetail, PostService};
pub use profiles::ProfileService;
pub use visibility::{is_visible_to, PostFilter, Publishable};
