//! Form payloads for the HTML-style endpoints
//!
//! Forms arrive as `application/x-www-form-urlencoded`. Every field is read as
//! a string first so that a bad value becomes a per-field validation message
//! instead of a deserialization failure, then `clean()` turns the raw form
//! into the typed input the services accept.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail};

use crate::error::{AppError, FieldErrors, Result};
use crate::models::{Comment, Post, PostInput, ProfileInput, User};

const DATETIME_LOCAL_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

const REQUIRED: &str = "This field is required.";

fn add_error(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.into());
}

/// Merge validator output with errors found while parsing
fn finish(
    validated: std::result::Result<(), validator::ValidationErrors>,
    mut errors: FieldErrors,
) -> Result<()> {
    if let Err(validation) = validated {
        if let AppError::Validation(fields) = AppError::from(validation) {
            for (field, messages) in fields {
                errors.entry(field).or_default().extend(messages);
            }
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

/// Parse the HTML `datetime-local` format (taken as UTC) or RFC 3339.
pub fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    DATETIME_LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn format_pub_date(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_optional_id(raw: &str, field: &str, errors: &mut FieldErrors) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Some(id),
        _ => {
            add_error(errors, field, "Select a valid choice.");
            None
        }
    }
}

// =====================================================================
// Post
// =====================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PostForm {
    #[validate(length(min = 1, max = 256, message = "Title must be 1 to 256 characters."))]
    pub title: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub text: String,
    pub pub_date: String,
    pub category: String,
    pub location: String,
}

impl PostForm {
    /// Blank form for the create page, publication date defaulting to now
    pub fn blank(now: DateTime<Utc>) -> Self {
        Self {
            pub_date: format_pub_date(now),
            ..Self::default()
        }
    }

    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            text: post.text.clone(),
            pub_date: format_pub_date(post.pub_date),
            category: post.category_id.map(|id| id.to_string()).unwrap_or_default(),
            location: post.location_id.map(|id| id.to_string()).unwrap_or_default(),
        }
    }

    pub fn clean(mut self) -> Result<PostInput> {
        self.title = self.title.trim().to_string();
        self.text = self.text.trim().to_string();

        let mut errors = FieldErrors::new();
        let pub_date = if self.pub_date.trim().is_empty() {
            add_error(&mut errors, "pub_date", REQUIRED);
            None
        } else {
            let parsed = parse_pub_date(&self.pub_date);
            if parsed.is_none() {
                add_error(&mut errors, "pub_date", "Enter a valid date/time.");
            }
            parsed
        };
        let category_id = parse_optional_id(&self.category, "category", &mut errors);
        let location_id = parse_optional_id(&self.location, "location", &mut errors);

        finish(self.validate(), errors)?;

        match pub_date {
            Some(pub_date) => Ok(PostInput {
                title: self.title,
                text: self.text,
                pub_date,
                category_id,
                location_id,
            }),
            None => Err(AppError::field("pub_date", REQUIRED)),
        }
    }
}

// =====================================================================
// Comment
// =====================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CommentForm {
    #[validate(length(min = 1, message = "This field is required."))]
    pub text: String,
}

impl CommentForm {
    pub fn from_comment(comment: &Comment) -> Self {
        Self {
            text: comment.text.clone(),
        }
    }

    /// The trimmed comment text, if it is acceptable
    pub fn clean(mut self) -> Result<String> {
        self.text = self.text.trim().to_string();
        self.validate()?;
        Ok(self.text)
    }
}

// =====================================================================
// Profile
// =====================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ProfileForm {
    #[validate(length(min = 1, max = 150, message = "Username must be 1 to 150 characters."))]
    pub username: String,
    #[validate(length(max = 150))]
    pub first_name: String,
    #[validate(length(max = 150))]
    pub last_name: String,
    #[validate(length(max = 254))]
    pub email: String,
}

/// Letters, digits and `@.+-_`, as identity providers commonly allow.
fn is_valid_username(username: &str) -> bool {
    username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }

    pub fn clean(mut self) -> Result<ProfileInput> {
        self.username = self.username.trim().to_string();
        self.first_name = self.first_name.trim().to_string();
        self.last_name = self.last_name.trim().to_string();
        self.email = self.email.trim().to_string();

        let mut errors = FieldErrors::new();
        if !self.username.is_empty() && !is_valid_username(&self.username) {
            add_error(
                &mut errors,
                "username",
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            );
        }
        if !self.email.is_empty() && !self.email.validate_email() {
            add_error(&mut errors, "email", "Enter a valid email address.");
        }

        finish(self.validate(), errors)?;

        Ok(ProfileInput {
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn post_form() -> PostForm {
        PostForm {
            title: "  First snow ".into(),
            text: "It fell overnight.".into(),
            pub_date: "2025-02-12T15:30".into(),
            category: "2".into(),
            location: String::new(),
        }
    }

    #[test]
    fn test_post_form_cleans_into_input() {
        let input = post_form().clean().expect("valid form");
        assert_eq!(input.title, "First snow");
        assert_eq!(input.category_id, Some(2));
        assert_eq!(input.location_id, None);
        assert_eq!(input.pub_date.year(), 2025);
        assert_eq!(input.pub_date.hour(), 15);
        assert_eq!(input.pub_date.minute(), 30);
    }

    #[test]
    fn test_post_form_reports_every_bad_field() {
        let form = PostForm {
            title: String::new(),
            text: "   ".into(),
            pub_date: "yesterday".into(),
            category: "travel".into(),
            location: String::new(),
        };

        let Err(AppError::Validation(errors)) = form.clean() else {
            panic!("expected validation error");
        };
        for field in ["title", "text", "pub_date", "category"] {
            assert!(errors.contains_key(field), "missing error for {field}");
        }
        assert!(!errors.contains_key("location"));
    }

    #[test]
    fn test_post_form_requires_pub_date() {
        let mut form = post_form();
        form.pub_date = String::new();

        let Err(AppError::Validation(errors)) = form.clean() else {
            panic!("expected validation error");
        };
        assert_eq!(errors["pub_date"], vec![REQUIRED.to_string()]);
    }

    #[test]
    fn test_pub_date_accepts_rfc3339() {
        let parsed = parse_pub_date("2025-02-12T15:30:00+03:00").unwrap();
        assert_eq!(parsed.hour(), 12);
    }

    #[test]
    fn test_form_round_trips_post() {
        let input = post_form().clean().unwrap();
        let post = Post {
            id: 1,
            title: input.title.clone(),
            text: input.text.clone(),
            pub_date: input.pub_date,
            is_published: true,
            created_at: input.pub_date,
            author_id: 1,
            category_id: input.category_id,
            location_id: None,
        };
        assert_eq!(PostForm::from_post(&post).clean().unwrap(), input);
    }

    #[test]
    fn test_comment_form_rejects_blank_text() {
        assert!(CommentForm { text: "  ".into() }.clean().is_err());
        assert_eq!(
            CommentForm { text: " Congrats! ".into() }.clean().unwrap(),
            "Congrats!"
        );
    }

    #[test]
    fn test_profile_form_validation() {
        let form = ProfileForm {
            username: "leo tolstoy".into(),
            first_name: "Leo".into(),
            last_name: "Tolstoy".into(),
            email: "not-an-email".into(),
        };
        let Err(AppError::Validation(errors)) = form.clean() else {
            panic!("expected validation error");
        };
        assert!(errors.contains_key("username"));
        assert!(errors.contains_key("email"));

        let ok = ProfileForm {
            username: "leo.tolstoy".into(),
            first_name: "Leo".into(),
            last_name: String::new(),
            email: String::new(),
        };
        assert_eq!(ok.clean().unwrap().username, "leo.tolstoy");
    }
}
