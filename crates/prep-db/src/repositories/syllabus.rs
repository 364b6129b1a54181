use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::SyllabusProgress;

/// Location of a topic inside the syllabus tree
#[derive(Debug, Clone, Copy)]
pub struct SyllabusTopic<'a> {
    pub class_type: &'a str,
    pub subject_id: &'a str,
    pub chapter_id: &'a str,
    pub topic_id: &'a str,
}

pub async fn upsert_status<'e, E>(
    executor: E,
    user_id: Uuid,
    topic: SyllabusTopic<'_>,
    status: &str,
) -> Result<SyllabusProgress, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO syllabus_progress (user_id, class_type, subject_id, chapter_id, topic_id, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id, class_type, subject_id, chapter_id, topic_id)
            DO UPDATE SET status = EXCLUDED.status, updated_at = NOW()
            RETURNING id, user_id, class_type, subject_id, chapter_id, topic_id, status, updated_at
        "#,
    )
    .bind(user_id)
    .bind(topic.class_type)
    .bind(topic.subject_id)
    .bind(topic.chapter_id)
    .bind(topic.topic_id)
    .bind(status)
    .fetch_one(executor)
    .await
}

pub async fn list_for_user<'e, E>(
    executor: E,
    user_id: Uuid,
) -> Result<Vec<SyllabusProgress>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, user_id, class_type, subject_id, chapter_id, topic_id, status, updated_at
            FROM syllabus_progress
            WHERE user_id = $1
            ORDER BY class_type, subject_id, chapter_id, topic_id
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}
