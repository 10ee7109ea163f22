//! User repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use software_slayer_shared::{CurrentUser, UserBase, UserSummary};
use sqlx::PgPool;

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    fn base(&self) -> UserBase {
        UserBase {
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }

    /// Public view, without email
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            user: self.base(),
        }
    }

    /// View returned to the user themselves
    pub fn current(&self) -> CurrentUser {
        CurrentUser {
            email: self.email.clone(),
            summary: self.summary(),
        }
    }
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    /// Insert a user; a duplicate email or username surfaces as a unique violation
    pub async fn create(pool: &PgPool, user: NewUser<'_>) -> Result<UserRecord> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (email, username, password_hash, first_name, last_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, username, password_hash, first_name, last_name, created_at
            "#,
        )
        .bind(user.email)
        .bind(user.username)
        .bind(user.password_hash)
        .bind(user.first_name)
        .bind(user.last_name)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Find user by email or username
    pub async fn find_by_identifier(pool: &PgPool, identifier: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, username, password_hash, first_name, last_name, created_at
            FROM users
            WHERE email = $1 OR username = $1
            LIMIT 1
            "#,
        )
        .bind(identifier)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, username, password_hash, first_name, last_name, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// List all users, oldest first
    pub async fn list(pool: &PgPool) -> Result<Vec<UserRecord>> {
        let users = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, username, password_hash, first_name, last_name, created_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }
}
