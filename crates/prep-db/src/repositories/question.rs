use chrono::NaiveDate;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{NewQuestion, Question};

/// Serve every question of a (subject, chapter, topic) key.
///
/// Each returned question has its `usage_count` bumped. Rows come back in
/// insertion order so repeated reads of an unchanged key are identical.
pub async fn serve_by_key<'e, E>(
    executor: E,
    subject: &str,
    chapter: &str,
    topic: &str,
) -> Result<Vec<Question>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            WITH served AS (
                UPDATE questions
                SET usage_count = usage_count + 1
                WHERE subject = $1 AND chapter = $2 AND topic = $3
                RETURNING id, subject, chapter, topic, difficulty, question,
                          option_a, option_b, option_c, option_d,
                          correct, explanation, usage_count, created_at
            )
            SELECT * FROM served
            ORDER BY created_at, id
        "#,
    )
    .bind(subject)
    .bind(chapter)
    .bind(topic)
    .fetch_all(executor)
    .await
}

/// Serve `count` questions of a chapter, least used first, bumping their
/// `usage_count`. Serves nothing unless the chapter holds at least `count`.
pub async fn serve_by_chapter<'e, E>(
    executor: E,
    subject: &str,
    chapter: &str,
    count: i64,
) -> Result<Vec<Question>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            WITH picked AS (
                SELECT id
                FROM questions
                WHERE subject = $1 AND chapter = $2
                ORDER BY usage_count, created_at, id
                LIMIT $3
            ),
            served AS (
                UPDATE questions
                SET usage_count = usage_count + 1
                WHERE id IN (SELECT id FROM picked)
                  AND (SELECT count(*) FROM picked) >= $3
                RETURNING id, subject, chapter, topic, difficulty, question,
                          option_a, option_b, option_c, option_d,
                          correct, explanation, usage_count, created_at
            )
            SELECT * FROM served
            ORDER BY created_at, id
        "#,
    )
    .bind(subject)
    .bind(chapter)
    .bind(count)
    .fetch_all(executor)
    .await
}

pub async fn list_all<'e, E>(executor: E) -> Result<Vec<Question>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, subject, chapter, topic, difficulty, question,
                   option_a, option_b, option_c, option_d,
                   correct, explanation, usage_count, created_at
            FROM questions
            ORDER BY created_at, id
        "#,
    )
    .fetch_all(executor)
    .await
}

pub async fn find_random<'e, E>(executor: E) -> Result<Option<Question>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, subject, chapter, topic, difficulty, question,
                   option_a, option_b, option_c, option_d,
                   correct, explanation, usage_count, created_at
            FROM questions
            ORDER BY random()
            LIMIT 1
        "#,
    )
    .fetch_optional(executor)
    .await
}

/// Insert a question, returning the already stored row when the same text
/// exists for the same (subject, chapter, topic).
pub async fn insert<'e, E>(executor: E, question: &NewQuestion) -> Result<Question, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO questions (subject, chapter, topic, difficulty, question,
                                   option_a, option_b, option_c, option_d,
                                   correct, explanation)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (subject, chapter, topic, md5(question))
            DO UPDATE SET question = EXCLUDED.question
            RETURNING id, subject, chapter, topic, difficulty, question,
                      option_a, option_b, option_c, option_d,
                      correct, explanation, usage_count, created_at
        "#,
    )
    .bind(&question.subject)
    .bind(&question.chapter)
    .bind(&question.topic)
    .bind(&question.difficulty)
    .bind(&question.question)
    .bind(&question.options.a)
    .bind(&question.options.b)
    .bind(&question.options.c)
    .bind(&question.options.d)
    .bind(&question.correct)
    .bind(&question.explanation)
    .fetch_one(executor)
    .await
}

pub async fn find_daily<'e, E>(
    executor: E,
    date: NaiveDate,
) -> Result<Option<Question>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT q.id, q.subject, q.chapter, q.topic, q.difficulty, q.question,
                   q.option_a, q.option_b, q.option_c, q.option_d,
                   q.correct, q.explanation, q.usage_count, q.created_at
            FROM daily_questions dq
            JOIN questions q ON q.id = dq.question_id
            WHERE dq.question_date = $1
        "#,
    )
    .bind(date)
    .fetch_optional(executor)
    .await
}

/// Pin a question for the given day. The first writer wins; returns whether
/// this call stored the pick.
pub async fn set_daily<'e, E>(
    executor: E,
    date: NaiveDate,
    question_id: Uuid,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO daily_questions (question_date, question_id)
            VALUES ($1, $2)
            ON CONFLICT (question_date) DO NOTHING
        "#,
    )
    .bind(date)
    .bind(question_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}
