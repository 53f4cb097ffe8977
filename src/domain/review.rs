use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Book;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

const MIN_USERNAME_LEN: usize = 2;
const MAX_USERNAME_LEN: usize = 50;
const MIN_TITLE_LEN: usize = 5;
const MAX_TITLE_LEN: usize = 100;
const MIN_COMMENT_LEN: usize = 10;
const MAX_COMMENT_LEN: usize = 1000;

/// A stored user review. `id` is unique for the lifetime of the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub book_key: String,
    pub book_title: String,
    pub book_author: String,
    /// 1 through 5 stars.
    pub rating: u8,
    pub title: String,
    pub comment: String,
    pub username: String,
    pub would_recommend: bool,
    pub date: DateTime<Utc>,
    pub helpful: u32,
}

/// User input for a new review, validated before a [`Review`] is built.
#[derive(Debug, Clone)]
pub struct ReviewDraft {
    pub rating: u8,
    pub title: String,
    pub comment: String,
    pub username: String,
    pub would_recommend: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewFieldError {
    UsernameRequired,
    UsernameTooShort,
    UsernameTooLong,
    TitleRequired,
    TitleTooShort,
    TitleTooLong,
    CommentRequired,
    CommentTooShort,
    CommentTooLong,
    RatingOutOfRange,
}

impl fmt::Display for ReviewFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            ReviewFieldError::UsernameRequired => "Username is required".into(),
            ReviewFieldError::UsernameTooShort => {
                format!("Username must be at least {MIN_USERNAME_LEN} characters")
            }
            ReviewFieldError::UsernameTooLong => {
                format!("Username must be at most {MAX_USERNAME_LEN} characters")
            }
            ReviewFieldError::TitleRequired => "Review title is required".into(),
            ReviewFieldError::TitleTooShort => {
                format!("Title must be at least {MIN_TITLE_LEN} characters")
            }
            ReviewFieldError::TitleTooLong => {
                format!("Title must be at most {MAX_TITLE_LEN} characters")
            }
            ReviewFieldError::CommentRequired => "Review comment is required".into(),
            ReviewFieldError::CommentTooShort => {
                format!("Comment must be at least {MIN_COMMENT_LEN} characters")
            }
            ReviewFieldError::CommentTooLong => {
                format!("Comment must be at most {MAX_COMMENT_LEN} characters")
            }
            ReviewFieldError::RatingOutOfRange => {
                format!("Rating must be between {MIN_RATING} and {MAX_RATING} stars")
            }
        };
        f.write_str(&message)
    }
}

impl ReviewDraft {
    /// Check every field, reporting all violations rather than the first.
    pub fn validate(&self) -> Result<(), Vec<ReviewFieldError>> {
        let mut errors = Vec::new();

        check_text(
            self.username.trim(),
            MIN_USERNAME_LEN,
            MAX_USERNAME_LEN,
            [
                ReviewFieldError::UsernameRequired,
                ReviewFieldError::UsernameTooShort,
                ReviewFieldError::UsernameTooLong,
            ],
            &mut errors,
        );
        check_text(
            self.title.trim(),
            MIN_TITLE_LEN,
            MAX_TITLE_LEN,
            [
                ReviewFieldError::TitleRequired,
                ReviewFieldError::TitleTooShort,
                ReviewFieldError::TitleTooLong,
            ],
            &mut errors,
        );
        check_text(
            self.comment.trim(),
            MIN_COMMENT_LEN,
            MAX_COMMENT_LEN,
            [
                ReviewFieldError::CommentRequired,
                ReviewFieldError::CommentTooShort,
                ReviewFieldError::CommentTooLong,
            ],
            &mut errors,
        );
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            errors.push(ReviewFieldError::RatingOutOfRange);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate the draft and attach it to `book` as a fresh review.
    pub fn into_review(self, book: &Book) -> Result<Review, Vec<ReviewFieldError>> {
        self.validate()?;

        Ok(Review {
            id: Uuid::new_v4(),
            book_key: book.key.clone(),
            book_title: book.title.clone(),
            book_author: book.primary_author().to_string(),
            rating: self.rating,
            title: self.title.trim().to_string(),
            comment: self.comment.trim().to_string(),
            username: self.username.trim().to_string(),
            would_recommend: self.would_recommend,
            date: Utc::now(),
            helpful: 0,
        })
    }
}

fn check_text(
    value: &str,
    min: usize,
    max: usize,
    [required, too_short, too_long]: [ReviewFieldError; 3],
    errors: &mut Vec<ReviewFieldError>,
) {
    let len = value.chars().count();
    if len == 0 {
        errors.push(required);
    } else if len < min {
        errors.push(too_short);
    } else if len > max {
        errors.push(too_long);
    }
}
