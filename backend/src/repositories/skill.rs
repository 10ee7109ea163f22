//! Skill repository for database operations

use anyhow::Result;
use sqlx::PgPool;

/// Skill repository; a skill is a free-text topic owned by one user
pub struct SkillRepository;

impl SkillRepository {
    /// Add a topic; a duplicate surfaces as a unique violation
    pub async fn create(pool: &PgPool, user_id: i64, topic: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_skills (user_id, topic)
            VALUES ($1, $2)
            "#,
        )
        .bind(user_id)
        .bind(topic)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Topics of a user in insertion order
    pub async fn list_topics(pool: &PgPool, user_id: i64) -> Result<Vec<String>> {
        let topics = sqlx::query_scalar::<_, String>(
            r#"
            SELECT topic
            FROM user_skills
            WHERE user_id = $1
            ORDER BY created_at, topic
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(topics)
    }

    /// Rename a topic, returning whether the old one existed
    pub async fn rename(
        pool: &PgPool,
        user_id: i64,
        old_topic: &str,
        new_topic: &str,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE user_skills
            SET topic = $3
            WHERE user_id = $1 AND topic = $2
            "#,
        )
        .bind(user_id)
        .bind(old_topic)
        .bind(new_topic)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a topic, returning whether it existed
    pub async fn delete(pool: &PgPool, user_id: i64, topic: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM user_skills
            WHERE user_id = $1 AND topic = $2
            "#,
        )
        .bind(user_id)
        .bind(topic)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
