//! In-memory BlogRepository for integration tests
//!
//! Keeps every table in a `Vec` behind a mutex and applies the same
//! visibility rule the SQL repository encodes, so handler tests run without a
//! database.

use async_trait::async_trait;
use blog_service::db::BlogRepository;
use blog_service::error::{AppError, Result};
use blog_service::models::{
    Category, Comment, CommentCard, Location, Post, PostCard, PostInput, ProfileInput, User,
};
use blog_service::services::PostFilter;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Default)]
struct Store {
    next_id: i64,
    users: Vec<User>,
    categories: Vec<Category>,
    locations: Vec<Location>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn card(&self, post: &Post) -> PostCard {
        let author = self.users.iter().find(|u| u.id == post.author_id);
        let category = post
            .category_id
            .and_then(|id| self.categories.iter().find(|c| c.id == id));
        let location = post
            .location_id
            .and_then(|id| self.locations.iter().find(|l| l.id == id));

        PostCard {
            id: post.id,
            title: post.title.clone(),
            text: post.text.clone(),
            pub_date: post.pub_date,
            is_published: post.is_published,
            created_at: post.created_at,
            author_id: post.author_id,
            author_username: author.map(|u| u.username.clone()).unwrap_or_default(),
            category_id: post.category_id,
            category_title: category.map(|c| c.title.clone()),
            category_slug: category.map(|c| c.slug.clone()),
            category_is_published: category.map(|c| c.is_published),
            location_id: post.location_id,
            location_name: location.map(|l| l.name.clone()),
            comment_count: self
                .comments
                .iter()
                .filter(|c| c.post_id == post.id)
                .count() as i64,
        }
    }

    fn visible_cards(&self, filter: &PostFilter) -> Vec<PostCard> {
        let mut cards: Vec<PostCard> = self
            .posts
            .iter()
            .map(|p| self.card(p))
            .filter(|card| filter.matches(card))
            .collect();
        cards.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
        cards
    }
}

#[derive(Default)]
pub struct MemoryBlogRepository {
    store: Mutex<Store>,
    lose_next_delete: AtomicBool,
}

impl MemoryBlogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, username: &str) -> User {
        let mut store = self.store.lock().unwrap();
        let user = User {
            id: store.next_id(),
            username: username.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: format!("{username}@example.com"),
        };
        store.users.push(user.clone());
        user
    }

    pub fn add_category(&self, slug: &str, is_published: bool) -> Category {
        let mut store = self.store.lock().unwrap();
        let category = Category {
            id: store.next_id(),
            title: slug.to_uppercase(),
            description: format!("Posts about {slug}"),
            slug: slug.to_string(),
            is_published,
            created_at: Utc::now(),
        };
        store.categories.push(category.clone());
        category
    }

    pub fn add_location(&self, name: &str) -> Location {
        let mut store = self.store.lock().unwrap();
        let location = Location {
            id: store.next_id(),
            name: name.to_string(),
            is_published: true,
            created_at: Utc::now(),
        };
        store.locations.push(location.clone());
        location
    }

    pub fn add_post(
        &self,
        author: &User,
        category: Option<&Category>,
        is_published: bool,
        pub_date: DateTime<Utc>,
    ) -> Post {
        let mut store = self.store.lock().unwrap();
        let id = store.next_id();
        let post = Post {
            id,
            title: format!("Post {id}"),
            text: format!("Body of post {id}"),
            pub_date,
            is_published,
            created_at: Utc::now(),
            author_id: author.id,
            category_id: category.map(|c| c.id),
            location_id: None,
        };
        store.posts.push(post.clone());
        post
    }

    pub fn add_comment(&self, post: &Post, author: &User, text: &str) -> Comment {
        let mut store = self.store.lock().unwrap();
        let comment = Comment {
            id: store.next_id(),
            text: text.to_string(),
            created_at: Utc::now(),
            post_id: post.id,
            author_id: author.id,
        };
        store.comments.push(comment.clone());
        comment
    }

    pub fn post(&self, post_id: i64) -> Option<Post> {
        let store = self.store.lock().unwrap();
        store.posts.iter().find(|p| p.id == post_id).cloned()
    }

    pub fn comment(&self, comment_id: i64) -> Option<Comment> {
        let store = self.store.lock().unwrap();
        store.comments.iter().find(|c| c.id == comment_id).cloned()
    }

    pub fn comments_on(&self, post_id: i64) -> Vec<Comment> {
        let store = self.store.lock().unwrap();
        store
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect()
    }

    /// Make the next comment delete find its row already gone, as when another
    /// request deleted it between the lookup and the delete.
    pub fn lose_next_delete(&self) {
        self.lose_next_delete.store(true, Ordering::SeqCst);
    }

    pub fn user(&self, user_id: i64) -> Option<User> {
        let store = self.store.lock().unwrap();
        store.users.iter().find(|u| u.id == user_id).cloned()
    }
}

#[async_trait]
impl BlogRepository for MemoryBlogRepository {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn find_user(&self, user_id: i64) -> Result<Option<User>> {
        Ok(self.user(user_id))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let store = self.store.lock().unwrap();
        Ok(store.users.iter().find(|u| u.username == username).cloned())
    }

    async fn update_user(&self, user_id: i64, input: &ProfileInput) -> Result<User> {
        let mut store = self.store.lock().unwrap();
        let user = store
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| AppError::NotFound("row not found".into()))?;
        user.username = input.username.clone();
        user.first_name = input.first_name.clone();
        user.last_name = input.last_name.clone();
        user.email = input.email.clone();
        Ok(user.clone())
    }

    async fn find_category(&self, category_id: i64) -> Result<Option<Category>> {
        let store = self.store.lock().unwrap();
        Ok(store.categories.iter().find(|c| c.id == category_id).cloned())
    }

    async fn find_category_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        let store = self.store.lock().unwrap();
        Ok(store.categories.iter().find(|c| c.slug == slug).cloned())
    }

    async fn find_location(&self, location_id: i64) -> Result<Option<Location>> {
        let store = self.store.lock().unwrap();
        Ok(store.locations.iter().find(|l| l.id == location_id).cloned())
    }

    async fn count_posts(&self, filter: &PostFilter) -> Result<i64> {
        let store = self.store.lock().unwrap();
        Ok(store.visible_cards(filter).len() as i64)
    }

    async fn list_posts(
        &self,
        filter: &PostFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostCard>> {
        let store = self.store.lock().unwrap();
        Ok(store
            .visible_cards(filter)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn find_post(&self, post_id: i64) -> Result<Option<Post>> {
        Ok(self.post(post_id))
    }

    async fn find_post_card(&self, post_id: i64) -> Result<Option<PostCard>> {
        let store = self.store.lock().unwrap();
        Ok(store
            .posts
            .iter()
            .find(|p| p.id == post_id)
            .map(|p| store.card(p)))
    }

    async fn create_post(&self, author_id: i64, input: &PostInput) -> Result<Post> {
        let mut store = self.store.lock().unwrap();
        let post = Post {
            id: store.next_id(),
            title: input.title.clone(),
            text: input.text.clone(),
            pub_date: input.pub_date,
            is_published: true,
            created_at: Utc::now(),
            author_id,
            category_id: input.category_id,
            location_id: input.location_id,
        };
        store.posts.push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, post_id: i64, input: &PostInput) -> Result<Post> {
        let mut store = self.store.lock().unwrap();
        let post = store
            .posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| AppError::NotFound("row not found".into()))?;
        post.title = input.title.clone();
        post.text = input.text.clone();
        post.pub_date = input.pub_date;
        post.category_id = input.category_id;
        post.location_id = input.location_id;
        Ok(post.clone())
    }

    async fn delete_post(&self, post_id: i64) -> Result<bool> {
        let mut store = self.store.lock().unwrap();
        let before = store.posts.len();
        store.posts.retain(|p| p.id != post_id);
        store.comments.retain(|c| c.post_id != post_id);
        Ok(store.posts.len() < before)
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<CommentCard>> {
        let store = self.store.lock().unwrap();
        let mut comments: Vec<CommentCard> = store
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .map(|c| CommentCard {
                id: c.id,
                text: c.text.clone(),
                created_at: c.created_at,
                post_id: c.post_id,
                author_id: c.author_id,
                author_username: store
                    .users
                    .iter()
                    .find(|u| u.id == c.author_id)
                    .map(|u| u.username.clone())
                    .unwrap_or_default(),
            })
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn find_comment(&self, post_id: i64, comment_id: i64) -> Result<Option<Comment>> {
        Ok(self
            .comment(comment_id)
            .filter(|comment| comment.post_id == post_id))
    }

    async fn create_comment(&self, post_id: i64, author_id: i64, text: &str) -> Result<Comment> {
        let mut store = self.store.lock().unwrap();
        let comment = Comment {
            id: store.next_id(),
            text: text.to_string(),
            created_at: Utc::now(),
            post_id,
            author_id,
        };
        store.comments.push(comment.clone());
        Ok(comment)
    }

    async fn update_comment(&self, comment_id: i64, text: &str) -> Result<Comment> {
        let mut store = self.store.lock().unwrap();
        let comment = store
            .comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .ok_or_else(|| AppError::NotFound("row not found".into()))?;
        comment.text = text.to_string();
        Ok(comment.clone())
    }

    async fn delete_comment(&self, comment_id: i64) -> Result<bool> {
        let mut store = self.store.lock().unwrap();
        if self.lose_next_delete.swap(false, Ordering::SeqCst) {
            store.comments.retain(|c| c.id != comment_id);
        }
        let before = store.comments.len();
        store.comments.retain(|c| c.id != comment_id);
        Ok(store.comments.len() < before)
    }
}
