//! Learning list repository for database operations

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use software_slayer_shared::{LearningCategory, LearningItem};
use sqlx::PgPool;

/// Learning list record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LearningRecord {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<LearningRecord> for LearningItem {
    type Error = anyhow::Error;

    fn try_from(record: LearningRecord) -> Result<Self> {
        let category = record
            .category
            .parse::<LearningCategory>()
            .map_err(|e| anyhow!("learning item {} has bad category: {}", record.id, e))?;
        Ok(LearningItem {
            id: record.id,
            title: record.title,
            category,
        })
    }
}

/// Learning list repository for database operations
pub struct LearningRepository;

impl LearningRepository {
    /// Add an item; a duplicate title for the same user surfaces as a unique violation
    pub async fn create(
        pool: &PgPool,
        user_id: i64,
        title: &str,
        category: LearningCategory,
    ) -> Result<LearningRecord> {
        let record = sqlx::query_as::<_, LearningRecord>(
            r#"
            INSERT INTO user_learning_list (user_id, title, category)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, title, category, created_at
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(category.as_str())
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Items of a user, oldest first
    pub async fn list_by_user(pool: &PgPool, user_id: i64) -> Result<Vec<LearningItem>> {
        let records = sqlx::query_as::<_, LearningRecord>(
            r#"
            SELECT id, user_id, title, category, created_at
            FROM user_learning_list
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        records.into_iter().map(LearningItem::try_from).collect()
    }

    /// Owner of an item, if the item exists
    pub async fn find_owner(pool: &PgPool, id: i64) -> Result<Option<i64>> {
        let owner = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT user_id
            FROM user_learning_list
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(owner)
    }

    /// Delete an item owned by `user_id`
    pub async fn delete(pool: &PgPool, id: i64, user_id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM user_learning_list
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
