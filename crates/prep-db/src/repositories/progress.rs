use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::TopicProgress;

/// Add a practice submission to the stored counters of a topic.
///
/// Creates the row on first practice. On conflict the counters are
/// incremented in place, so two concurrent submissions never lose an update.
/// The derived `accuracy` / `classification` columns of the returned row are
/// only valid for a fresh insert; callers recompute them from the merged
/// counters and store them with [`set_derived`] in the same transaction.
#[allow(clippy::too_many_arguments)]
pub async fn increment_counters<'e, E>(
    executor: E,
    user_id: Uuid,
    subject: &str,
    chapter: &str,
    topic: &str,
    correct: i32,
    total: i32,
    accuracy: f64,
    classification: &str,
) -> Result<TopicProgress, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO topic_progress (user_id, subject, chapter, topic,
                                        total_attempts, correct_attempts,
                                        accuracy, classification)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id, subject, chapter, topic)
            DO UPDATE SET
                total_attempts = topic_progress.total_attempts + EXCLUDED.total_attempts,
                correct_attempts = topic_progress.correct_attempts + EXCLUDED.correct_attempts,
                last_practiced = NOW(),
                updated_at = NOW()
            RETURNING user_id, subject, chapter, topic, total_attempts, correct_attempts,
                      accuracy, classification, last_practiced, updated_at
        "#,
    )
    .bind(user_id)
    .bind(subject)
    .bind(chapter)
    .bind(topic)
    .bind(total)
    .bind(correct)
    .bind(accuracy)
    .bind(classification)
    .fetch_one(executor)
    .await
}

pub async fn set_derived<'e, E>(
    executor: E,
    user_id: Uuid,
    subject: &str,
    chapter: &str,
    topic: &str,
    accuracy: f64,
    classification: &str,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            UPDATE topic_progress
            SET accuracy = $5, classification = $6
            WHERE user_id = $1 AND subject = $2 AND chapter = $3 AND topic = $4
        "#,
    )
    .bind(user_id)
    .bind(subject)
    .bind(chapter)
    .bind(topic)
    .bind(accuracy)
    .bind(classification)
    .execute(executor)
    .await?;
    Ok(())
}

/// All topic progress of a user, optionally restricted to one classification.
pub async fn list_for_user<'e, E>(
    executor: E,
    user_id: Uuid,
    classification: Option<&str>,
) -> Result<Vec<TopicProgress>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT user_id, subject, chapter, topic, total_attempts, correct_attempts,
                   accuracy, classification, last_practiced, updated_at
            FROM topic_progress
            WHERE user_id = $1
              AND ($2::text IS NULL OR classification = $2)
            ORDER BY subject, chapter, topic
        "#,
    )
    .bind(user_id)
    .bind(classification)
    .fetch_all(executor)
    .await
}
