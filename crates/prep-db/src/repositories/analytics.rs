use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{SubjectPracticeTotals, TestTotals};

/// Practice counters summed per subject.
pub async fn practice_totals_by_subject<'e, E>(
    executor: E,
    user_id: Uuid,
) -> Result<Vec<SubjectPracticeTotals>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT
                subject,
                COALESCE(SUM(questions_attempted), 0)::bigint as attempted,
                COALESCE(SUM(questions_correct), 0)::bigint as correct,
                COALESCE(SUM(time_spent), 0)::bigint as time_spent
            FROM practice_sessions
            WHERE user_id = $1
            GROUP BY subject
            ORDER BY subject
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

pub async fn test_totals<'e, E>(executor: E, user_id: Uuid) -> Result<TestTotals, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT
                COUNT(*)::bigint as tests_attempted,
                COALESCE(AVG(score), 0.0)::float8 as avg_score,
                COALESCE(SUM(time_spent), 0)::bigint as time_spent
            FROM mock_tests
            WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(executor)
    .await
}
