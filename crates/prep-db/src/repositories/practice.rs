use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{NewPracticeSession, PracticeSession};

pub async fn insert<'e, E>(
    executor: E,
    session: &NewPracticeSession,
) -> Result<PracticeSession, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO practice_sessions (user_id, subject, chapter, questions_attempted,
                                           questions_correct, time_spent)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, subject, chapter, questions_attempted,
                      questions_correct, time_spent, created_at
        "#,
    )
    .bind(session.user_id)
    .bind(&session.subject)
    .bind(&session.chapter)
    .bind(session.questions_attempted)
    .bind(session.questions_correct)
    .bind(session.time_spent)
    .fetch_one(executor)
    .await
}

/// Most recent sessions first.
pub async fn list_for_user<'e, E>(
    executor: E,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<PracticeSession>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, user_id, subject, chapter, questions_attempted,
                   questions_correct, time_spent, created_at
            FROM practice_sessions
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
