//! Input validation functions
//!
//! This module provides the validation rules for user input. The same rules
//! are enforced by the API and can be checked client-side before submitting.

use crate::errors::ValidationError;
use crate::models::LearningCategory;
use crate::types::{CreateLearningRequest, CreateUserRequest};
use once_cell::sync::Lazy;
use regex_lite::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_ -]{1,30}$").expect("username pattern compiles"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@]+@[^@]+\.[^@]{2,}$").expect("email pattern compiles"));
static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z -]{1,80}$").expect("name pattern compiles"));

/// Width of the `users.email` column
pub const EMAIL_MAX_CHARS: usize = 255;
pub const PASSWORD_MIN_CHARS: usize = 8;
pub const PASSWORD_MAX_CHARS: usize = 64;
pub const TOPIC_MAX_CHARS: usize = 100;
pub const TITLE_MAX_CHARS: usize = 100;

/// Validate username: 1-30 letters, digits, spaces, `_` or `-`
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if !USERNAME_RE.is_match(username) {
        return Err(ValidationError::new(
            "username",
            "must be 1-30 letters, digits, spaces, '_' or '-'",
        ));
    }
    Ok(())
}

/// Validate email format and length
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.chars().count() > EMAIL_MAX_CHARS {
        return Err(ValidationError::new(
            "email",
            format!("must be at most {} characters", EMAIL_MAX_CHARS),
        ));
    }
    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::new("email", "must look like name@domain.tld"));
    }
    Ok(())
}

/// Validate password length (counted in characters, not bytes)
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if len < PASSWORD_MIN_CHARS || len > PASSWORD_MAX_CHARS {
        return Err(ValidationError::new(
            "password",
            format!(
                "must be {}-{} characters",
                PASSWORD_MIN_CHARS, PASSWORD_MAX_CHARS
            ),
        ));
    }
    Ok(())
}

/// Validate a first or last name
pub fn validate_name(field: &'static str, name: &str) -> Result<(), ValidationError> {
    if !NAME_RE.is_match(name) {
        return Err(ValidationError::new(
            field,
            "must be 1-80 letters, spaces or '-'",
        ));
    }
    Ok(())
}

/// Validate a full registration request, reporting the first bad field
pub fn validate_create_user(req: &CreateUserRequest) -> Result<(), ValidationError> {
    validate_username(&req.user.username)?;
    validate_email(&req.email)?;
    validate_password(&req.password)?;
    validate_name("first_name", &req.user.first_name)?;
    validate_name("last_name", &req.user.last_name)?;
    Ok(())
}

/// Validate a skill topic
pub fn validate_topic(topic: &str) -> Result<(), ValidationError> {
    validate_text("topic", topic, TOPIC_MAX_CHARS)
}

/// Validate a learning item title
pub fn validate_learning_title(title: &str) -> Result<(), ValidationError> {
    validate_text("title", title, TITLE_MAX_CHARS)
}

/// Parse a learning category name
pub fn validate_learning_category(category: &str) -> Result<LearningCategory, ValidationError> {
    category
        .parse::<LearningCategory>()
        .map_err(|reason| ValidationError::new("category", reason))
}

/// Validate a learning item request, returning the parsed category
pub fn validate_create_learning(
    req: &CreateLearningRequest,
) -> Result<LearningCategory, ValidationError> {
    validate_learning_title(&req.title)?;
    validate_learning_category(&req.category)
}

fn validate_text(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "must not be blank"));
    }
    if trimmed.chars().count() > max_chars {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters", max_chars),
        ));
    }
    Ok(())
}
