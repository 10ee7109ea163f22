//! Learning list service

use crate::error::{is_unique_violation, ApiError};
use crate::repositories::LearningRepository;
use software_slayer_shared::{validation, CreateLearningRequest, LearningItem};
use sqlx::PgPool;
use tracing::info;

/// Learning list service
pub struct LearningService;

impl LearningService {
    pub async fn list(pool: &PgPool, user_id: i64) -> Result<Vec<LearningItem>, ApiError> {
        Ok(LearningRepository::list_by_user(pool, user_id).await?)
    }

    pub async fn add(
        pool: &PgPool,
        user_id: i64,
        req: &CreateLearningRequest,
    ) -> Result<i64, ApiError> {
        let category = validation::validate_create_learning(req)?;
        let title = req.title.trim();

        let record = LearningRepository::create(pool, user_id, title, category)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ApiError::Conflict(format!("'{}' is already on the learning list", title))
                } else {
                    ApiError::Internal(e)
                }
            })?;

        info!(user_id, item_id = record.id, "Learning item added");
        Ok(record.id)
    }

    /// Delete an item; only its owner may do so
    pub async fn remove(pool: &PgPool, user_id: i64, id: i64) -> Result<(), ApiError> {
        let owner = LearningRepository::find_owner(pool, id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Learning item not found".to_string()))?;
        if owner != user_id {
            return Err(ApiError::Forbidden(
                "Learning item belongs to another user".to_string(),
            ));
        }

        // Deleted concurrently between the two queries
        if !LearningRepository::delete(pool, id, user_id).await? {
            return Err(ApiError::NotFound("Learning item not found".to_string()));
        }

        info!(user_id, item_id = id, "Learning item removed");
        Ok(())
    }
}
