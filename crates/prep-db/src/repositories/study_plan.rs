use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::StudyPlan;

pub async fn insert<'e, E>(
    executor: E,
    user_id: Uuid,
    title: &str,
    duration: i32,
    daily_hours: i32,
    subjects: &[String],
    plan: &serde_json::Value,
) -> Result<StudyPlan, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO study_plans (user_id, title, duration, daily_hours, subjects, plan)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, title, duration, daily_hours, subjects, plan, created_at
        "#,
    )
    .bind(user_id)
    .bind(title)
    .bind(duration)
    .bind(daily_hours)
    .bind(subjects)
    .bind(plan)
    .fetch_one(executor)
    .await
}

/// Latest plans first.
pub async fn list_for_user<'e, E>(
    executor: E,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<StudyPlan>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, user_id, title, duration, daily_hours, subjects, plan, created_at
            FROM study_plans
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(executor)
    .await
}
