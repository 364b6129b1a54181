use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::ChatMessage;

pub async fn insert<'e, E>(
    executor: E,
    user_id: Uuid,
    message: &str,
    response: &str,
) -> Result<ChatMessage, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO chat_messages (user_id, message, response)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, message, response, created_at
        "#,
    )
    .bind(user_id)
    .bind(message)
    .bind(response)
    .fetch_one(executor)
    .await
}

/// Newest messages first.
pub async fn history<'e, E>(
    executor: E,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<ChatMessage>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, user_id, message, response, created_at
            FROM chat_messages
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
