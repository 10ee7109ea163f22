//! API request and response types

use crate::models::LearningCategory;
use serde::{Deserialize, Serialize};
use std::fmt;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Plain acknowledgement body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// User Types
// ============================================================================

/// Public part of a user record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserBase {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// Registration request
#[derive(Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    #[serde(flatten)]
    pub user: UserBase,
}

impl fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

/// Login request
///
/// `identifier` is either the email address or the username.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("identifier", &self.identifier)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// User as listed to anyone
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSummary {
    pub id: i64,
    #[serde(flatten)]
    pub user: UserBase,
}

/// User as shown to themselves
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentUser {
    pub email: String,
    #[serde(flatten)]
    pub summary: UserSummary,
}

/// Successful login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_info: CurrentUser,
}

/// Query parameters for `GET /user`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsersQuery {
    /// Kept as text so a malformed flag can be reported as a bad request
    pub current: Option<String>,
}

// ============================================================================
// Skill Types
// ============================================================================

/// Skill creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSkillRequest {
    pub topic: String,
}

/// Skill rename request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSkillRequest {
    pub old_topic: String,
    #[serde(alias = "newTopic")]
    pub updated_topic: String,
}

// ============================================================================
// Learning Item Types
// ============================================================================

/// Learning item creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLearningRequest {
    pub title: String,
    /// Validated against [`LearningCategory`] by the API
    pub category: String,
}

/// Learning item as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LearningItem {
    pub id: i64,
    pub title: String,
    pub category: LearningCategory,
}
