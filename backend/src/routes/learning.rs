//! Learning list routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::routes::parse_id;
use crate::services::LearningService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use software_slayer_shared::{
    CreateLearningRequest, LearningCategory, LearningItem, MessageResponse,
};

/// Create learning list routes
///
/// The id segment is a user id for GET and an item id for DELETE.
pub fn learning_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(add_item))
        .route("/categories", get(list_categories))
        .route("/:id", get(list_items).delete(remove_item))
}

/// GET /learning/categories
async fn list_categories() -> Json<[LearningCategory; 5]> {
    Json(LearningCategory::ALL)
}

/// GET /learning/{user_id}
async fn list_items(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Vec<LearningItem>>> {
    let user_id = parse_id(&user_id, "user ID")?;
    let items = LearningService::list(state.db(), user_id).await?;
    Ok(Json(items))
}

/// POST /learning
async fn add_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateLearningRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    LearningService::add(state.db(), auth.user_id, &req).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Learning item added successfully")),
    ))
}

/// DELETE /learning/{id}
async fn remove_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id, "learning item ID")?;
    LearningService::remove(state.db(), auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
