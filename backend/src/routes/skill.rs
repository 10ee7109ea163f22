//! Skill routes
//!
//! Reading a user's skills is public; changes apply to the caller's own list.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::routes::parse_id;
use crate::services::SkillService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use software_slayer_shared::{CreateSkillRequest, MessageResponse, UpdateSkillRequest};

/// Create skill routes
///
/// The single path segment is a user id for GET and a topic for DELETE.
pub fn skill_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(add_skill).put(rename_skill))
        .route("/:key", get(list_skills).delete(remove_skill))
}

/// GET /skill/{user_id}
async fn list_skills(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Vec<String>>> {
    let user_id = parse_id(&user_id, "user ID")?;
    let topics = SkillService::list(state.db(), user_id).await?;
    Ok(Json(topics))
}

/// POST /skill
async fn add_skill(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateSkillRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    SkillService::add(state.db(), auth.user_id, &req.topic).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Skill added successfully")),
    ))
}

/// PUT /skill
async fn rename_skill(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateSkillRequest>,
) -> ApiResult<StatusCode> {
    SkillService::rename(state.db(), auth.user_id, &req.old_topic, &req.updated_topic).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /skill/{topic}
async fn remove_skill(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(topic): Path<String>,
) -> ApiResult<StatusCode> {
    SkillService::remove(state.db(), auth.user_id, &topic).await?;
    Ok(StatusCode::NO_CONTENT)
}
