//! User routes
//!
//! Registration, login and user listing. These live at the root of the API.

use crate::auth::authorize;
use crate::error::{ApiError, ApiResult};
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use software_slayer_shared::{
    CreateUserRequest, LoginRequest, LoginResponse, MessageResponse, UsersQuery,
};

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user", post(register).get(get_users))
        .route("/login", post(login))
}

/// Register a new user
///
/// POST /user
async fn register(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    UserService::register(state.db(), req).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User created successfully")),
    ))
}

/// Log in with email or username
///
/// POST /login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let response = UserService::login(state.db(), state.tokens(), req).await?;
    Ok(Json(response))
}

/// List users, or return the caller when `current=true`
///
/// GET /user?current=bool
///
/// Only the `current=true` form requires a token.
async fn get_users(
    State(state): State<AppState>,
    Query(query): Query<UsersQuery>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let current = match query.current.as_deref() {
        None => false,
        Some(flag) => parse_flag(flag)
            .ok_or_else(|| ApiError::BadRequest("Invalid value for 'current'".to_string()))?,
    };

    if current {
        let user_id = authorize(state.tokens(), &headers)?;
        let user = UserService::current_user(state.db(), user_id).await?;
        Ok(Json(user).into_response())
    } else {
        let users = UserService::list_users(state.db()).await?;
        Ok(Json(users).into_response())
    }
}

/// Boolean query flag in the spellings existing clients send
fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}
