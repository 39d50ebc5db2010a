//! Post visibility rules
//!
//! A post is visible to a viewer when the viewer wrote it, or when the post is
//! published, sits in a published category, and its publication date has
//! passed. Posts without a category are only visible to their author.
//!
//! [`is_visible_to`] is the in-process form of the rule. The SQL form lives in
//! `db::post_repo` and is driven by a [`PostFilter`]; the two must agree.

use chrono::{DateTime, Utc};

use crate::models::PostCard;

/// The fields the visibility rule looks at.
pub trait Publishable {
    fn author_id(&self) -> i64;
    fn is_published(&self) -> bool;
    /// `None` when the post has no category.
    fn category_is_published(&self) -> Option<bool>;
    fn pub_date(&self) -> DateTime<Utc>;
}

impl Publishable for PostCard {
    fn author_id(&self) -> i64 {
        self.author_id
    }

    fn is_published(&self) -> bool {
        self.is_published
    }

    fn category_is_published(&self) -> Option<bool> {
        self.category_is_published
    }

    fn pub_date(&self) -> DateTime<Utc> {
        self.pub_date
    }
}

/// True when the post is out in public: published, in a published category,
/// and not scheduled for the future.
pub fn is_public<P: Publishable + ?Sized>(post: &P, now: DateTime<Utc>) -> bool {
    post.is_published() && post.category_is_published().unwrap_or(false) && post.pub_date() <= now
}

/// True when `viewer` may see `post` at `now`.
pub fn is_visible_to<P: Publishable + ?Sized>(
    post: &P,
    viewer: Option<i64>,
    now: DateTime<Utc>,
) -> bool {
    viewer == Some(post.author_id()) || is_public(post, now)
}

/// Which posts a list query should return.
#[derive(Debug, Clone, PartialEq)]
pub struct PostFilter {
    /// Who is looking; `None` for anonymous viewers
    pub viewer: Option<i64>,
    /// Restrict to one category
    pub category_id: Option<i64>,
    /// Restrict to one author
    pub author_id: Option<i64>,
    /// Instant the publication date is compared against
    pub now: DateTime<Utc>,
}

impl PostFilter {
    pub fn for_viewer(viewer: Option<i64>, now: DateTime<Utc>) -> Self {
        Self {
            viewer,
            category_id: None,
            author_id: None,
            now,
        }
    }

    pub fn in_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn by_author(mut self, author_id: i64) -> Self {
        self.author_id = Some(author_id);
        self
    }

    /// Whether a single post passes this filter, scopes included.
    pub fn matches(&self, post: &PostCard) -> bool {
        if let Some(category_id) = self.category_id {
            if post.category_id != Some(category_id) {
                return false;
            }
        }
        if let Some(author_id) = self.author_id {
            if post.author_id != author_id {
                return false;
            }
        }
        is_visible_to(post, self.viewer, self.now)
    }
}
