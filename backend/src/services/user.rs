//! User service for registration, login and user lookup
//!
//! Password hashing and verification run on the blocking thread pool.

use crate::auth::{CredentialError, PasswordService, TokenService};
use crate::error::{is_unique_violation, ApiError};
use crate::repositories::{NewUser, UserRepository};
use software_slayer_shared::{
    validation, CreateUserRequest, CurrentUser, LoginRequest, LoginResponse, UserSummary,
};
use sqlx::PgPool;
use tracing::{info, warn};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Register a new user
    pub async fn register(pool: &PgPool, req: CreateUserRequest) -> Result<i64, ApiError> {
        validation::validate_create_user(&req)?;

        let password_hash = PasswordService::hash_async(req.password).await?;

        let new_user = NewUser {
            email: &req.email,
            username: &req.user.username,
            password_hash: &password_hash,
            first_name: &req.user.first_name,
            last_name: &req.user.last_name,
        };
        let user = UserRepository::create(pool, new_user).await.map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict("Email or username already registered".to_string())
            } else {
                ApiError::Internal(e)
            }
        })?;

        info!(user_id = user.id, "User registered");
        Ok(user.id)
    }

    /// Log in with email or username and receive a session token
    pub async fn login(
        pool: &PgPool,
        tokens: &TokenService,
        req: LoginRequest,
    ) -> Result<LoginResponse, ApiError> {
        let Some(user) = UserRepository::find_by_identifier(pool, &req.identifier).await? else {
            PasswordService::verify_dummy_async(req.password).await;
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        let valid = match PasswordService::verify_async(req.password, user.password_hash.clone())
            .await
        {
            Ok(valid) => valid,
            Err(CredentialError::MalformedHash(reason)) => {
                warn!(user_id = user.id, "Stored password hash is unusable: {}", reason);
                false
            }
            Err(e) => return Err(e.into()),
        };

        if !valid {
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = tokens.issue_token(user.id)?;
        info!(user_id = user.id, "User logged in");

        Ok(LoginResponse {
            token,
            user_info: user.current(),
        })
    }

    /// Public listing of every user
    pub async fn list_users(pool: &PgPool) -> Result<Vec<UserSummary>, ApiError> {
        let users = UserRepository::list(pool).await?;
        Ok(users.iter().map(|u| u.summary()).collect())
    }

    /// The user a verified token was issued to
    ///
    /// A valid token can outlive its account, hence the 404.
    pub async fn current_user(pool: &PgPool, user_id: i64) -> Result<CurrentUser, ApiError> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
        Ok(user.current())
    }
}
