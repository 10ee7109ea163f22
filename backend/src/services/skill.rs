//! Skill service

use crate::error::{is_unique_violation, ApiError};
use crate::repositories::SkillRepository;
use software_slayer_shared::validation;
use sqlx::PgPool;
use tracing::info;

/// Skill service; every mutation is scoped to the authenticated user
pub struct SkillService;

impl SkillService {
    pub async fn list(pool: &PgPool, user_id: i64) -> Result<Vec<String>, ApiError> {
        Ok(SkillRepository::list_topics(pool, user_id).await?)
    }

    pub async fn add(pool: &PgPool, user_id: i64, topic: &str) -> Result<(), ApiError> {
        validation::validate_topic(topic)?;
        let topic = topic.trim();

        SkillRepository::create(pool, user_id, topic)
            .await
            .map_err(|e| duplicate_or_internal(e, topic))?;

        info!(user_id, topic, "Skill added");
        Ok(())
    }

    pub async fn rename(
        pool: &PgPool,
        user_id: i64,
        old_topic: &str,
        new_topic: &str,
    ) -> Result<(), ApiError> {
        validation::validate_topic(new_topic)?;
        let new_topic = new_topic.trim();

        let renamed = SkillRepository::rename(pool, user_id, old_topic.trim(), new_topic)
            .await
            .map_err(|e| duplicate_or_internal(e, new_topic))?;
        if !renamed {
            return Err(ApiError::NotFound("Skill not found".to_string()));
        }

        info!(user_id, topic = new_topic, "Skill renamed");
        Ok(())
    }

    pub async fn remove(pool: &PgPool, user_id: i64, topic: &str) -> Result<(), ApiError> {
        if !SkillRepository::delete(pool, user_id, topic.trim()).await? {
            return Err(ApiError::NotFound("Skill not found".to_string()));
        }

        info!(user_id, topic, "Skill removed");
        Ok(())
    }
}

fn duplicate_or_internal(err: anyhow::Error, topic: &str) -> ApiError {
    if is_unique_violation(&err) {
        ApiError::Conflict(format!("Skill '{}' already exists", topic))
    } else {
        ApiError::Internal(err)
    }
}
